//! Logical control units.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{NodeId, UnitId};

/// The two unit variants of the four-step method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitVariant {
    /// A set of switches controlling a set of loads.
    Controlled {
        switches: BTreeSet<NodeId>,
        loads: BTreeSet<NodeId>,
    },
    /// A standalone device fed directly, with no switch in between.
    Uncontrolled { node: NodeId },
}

/// A logical control relationship between nodes of one circuit.
///
/// The user-facing identifier (`C-UT<n>` / `U-UT<n>`) is not stored; it is
/// derived from the unit's position among same-variant siblings in creation
/// order, so deleting a unit compacts the namespace without touching the
/// survivors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Store-assigned stable handle.
    pub id: UnitId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub variant: UnitVariant,
}

impl Unit {
    pub fn controlled(
        switches: impl IntoIterator<Item = NodeId>,
        loads: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            id: UnitId(0),
            label: None,
            variant: UnitVariant::Controlled {
                switches: switches.into_iter().collect(),
                loads: loads.into_iter().collect(),
            },
        }
    }

    pub fn uncontrolled(node: NodeId) -> Self {
        Self {
            id: UnitId(0),
            label: None,
            variant: UnitVariant::Uncontrolled { node },
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.variant, UnitVariant::Controlled { .. })
    }

    /// Identifier prefix of the variant's numbering namespace.
    pub fn prefix(&self) -> &'static str {
        if self.is_controlled() {
            "C-UT"
        } else {
            "U-UT"
        }
    }

    /// All member nodes: switches first, then loads, each ascending by id.
    pub fn members(&self) -> Vec<NodeId> {
        match &self.variant {
            UnitVariant::Controlled { switches, loads } => {
                switches.iter().chain(loads.iter()).copied().collect()
            }
            UnitVariant::Uncontrolled { node } => vec![*node],
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        match &self.variant {
            UnitVariant::Controlled { switches, loads } => {
                switches.contains(&node) || loads.contains(&node)
            }
            UnitVariant::Uncontrolled { node: n } => *n == node,
        }
    }

    /// Detach a node from the unit. Returns true if the unit is left with no
    /// members at all and should be dissolved by the caller.
    pub(crate) fn detach(&mut self, node: NodeId) -> bool {
        match &mut self.variant {
            UnitVariant::Controlled { switches, loads } => {
                switches.remove(&node);
                loads.remove(&node);
                switches.is_empty() && loads.is_empty()
            }
            UnitVariant::Uncontrolled { node: n } => *n == node,
        }
    }
}
