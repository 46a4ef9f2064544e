//! Circuits: one distribution box, its members, units and conduits.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CircuitId, Conduit, ConduitId, Node, NodeId, NodeKind, Unit, UnitId};

/// Pipeline state of a circuit's derived wiring.
///
/// The four derivation steps advance the state in order; any structural edit
/// resets it to `Unvalidated`, forcing a full recomputation instead of an
/// incremental patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringPhase {
    #[default]
    Unvalidated,
    BaseLaid,
    UncontrolledPowerLaid,
    ControlLaid,
    Complete,
}

impl fmt::Display for WiringPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringPhase::Unvalidated => write!(f, "unvalidated"),
            WiringPhase::BaseLaid => write!(f, "base laid"),
            WiringPhase::UncontrolledPowerLaid => write!(f, "uncontrolled power laid"),
            WiringPhase::ControlLaid => write!(f, "control laid"),
            WiringPhase::Complete => write!(f, "complete"),
        }
    }
}

/// One circuit: a distribution-box root plus member nodes, units, conduits
/// and the wiring derived from them.
///
/// Nodes, conduits and units live in creation-order arenas. Display numbers
/// (node numbering, `C-UT<n>` / `U-UT<n>` unit identifiers) are derived from
/// arena positions on demand, which keeps every namespace contiguous across
/// deletions by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    pub id: CircuitId,
    pub label: String,

    pub(crate) nodes: Vec<Node>,
    pub(crate) conduits: Vec<Conduit>,
    pub(crate) units: Vec<Unit>,

    #[serde(default)]
    pub(crate) phase: WiringPhase,
}

impl Circuit {
    pub(crate) fn new(id: CircuitId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            nodes: Vec::new(),
            conduits: Vec::new(),
            units: Vec::new(),
            phase: WiringPhase::Unvalidated,
        }
    }

    // --- Nodes ---

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// 1-based display number of a node, contiguous per circuit in creation
    /// order.
    pub fn node_number(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id).map(|p| p + 1)
    }

    /// The circuit's root, if a distribution box has been placed.
    pub fn distribution_box(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeKind::DistributionBox)
            .map(|n| n.id)
    }

    // --- Conduits ---

    pub fn conduits(&self) -> impl Iterator<Item = &Conduit> {
        self.conduits.iter()
    }

    pub fn conduit(&self, id: ConduitId) -> Option<&Conduit> {
        self.conduits.iter().find(|c| c.id == id)
    }

    pub(crate) fn conduit_mut(&mut self, id: ConduitId) -> Option<&mut Conduit> {
        self.conduits.iter_mut().find(|c| c.id == id)
    }

    pub fn conduit_between(&self, a: NodeId, b: NodeId) -> Option<&Conduit> {
        self.conduits.iter().find(|c| c.connects(a, b))
    }

    // --- Units ---

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// The unit a node belongs to, if any.
    pub fn unit_of(&self, node: NodeId) -> Option<&Unit> {
        self.units.iter().find(|u| u.contains(node))
    }

    /// Derived display identifier of a unit: `C-UT<n>` or `U-UT<n>`, where
    /// `n` is the unit's 1-based position among same-variant siblings in
    /// creation order. Contiguous and gapless at all times.
    pub fn unit_label(&self, id: UnitId) -> Option<String> {
        let unit = self.unit(id)?;
        let ordinal = self
            .units
            .iter()
            .filter(|u| u.is_controlled() == unit.is_controlled())
            .position(|u| u.id == id)?
            + 1;
        Some(format!("{}{}", unit.prefix(), ordinal))
    }

    // --- Wiring state ---

    pub fn phase(&self) -> WiringPhase {
        self.phase
    }

    /// True when the stored wires reflect the current graph.
    pub fn wiring_current(&self) -> bool {
        self.phase == WiringPhase::Complete
    }

    pub(crate) fn mark_stale(&mut self) {
        self.phase = WiringPhase::Unvalidated;
    }

    pub(crate) fn clear_wires(&mut self) {
        for conduit in &mut self.conduits {
            conduit.wires.clear();
        }
        self.phase = WiringPhase::Unvalidated;
    }

    /// Detach a node from its unit, dissolving the unit if it ends up with no
    /// members. Returns the dissolved unit's handle, if any.
    pub(crate) fn detach_from_unit(&mut self, node: NodeId) -> Option<UnitId> {
        let idx = self.units.iter().position(|u| u.contains(node))?;
        if self.units[idx].detach(node) {
            let unit = self.units.remove(idx);
            return Some(unit.id);
        }
        None
    }
}
