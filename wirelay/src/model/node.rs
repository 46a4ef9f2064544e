//! Placed electrical nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::NodeId;

/// Kind of a placed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Power origin and root of a circuit.
    DistributionBox,
    /// Control point; member of a controlled unit.
    Switch,
    /// Controlled device (a luminaire or similar).
    Load,
    /// Uncontrolled device.
    Socket,
    /// Pure connection point; routes wires but owns none.
    Junction,
}

impl NodeKind {
    /// Device nodes draw current and must belong to a unit.
    pub fn is_device(&self) -> bool {
        matches!(self, NodeKind::Load | NodeKind::Socket)
    }

    /// Nodes exempt from unit membership: the circuit root and junctions.
    pub fn is_passive(&self) -> bool {
        matches!(self, NodeKind::DistributionBox | NodeKind::Junction)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::DistributionBox => write!(f, "distribution box"),
            NodeKind::Switch => write!(f, "switch"),
            NodeKind::Load => write!(f, "load"),
            NodeKind::Socket => write!(f, "socket"),
            NodeKind::Junction => write!(f, "junction"),
        }
    }
}

/// Planar position in metres, used by the default conduit cost metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A placed electrical node.
///
/// Construct with [`Node::new`] and the `with_*` builders; the entity store
/// assigns the identity when the node is added to a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Store-assigned identity; unique within the owning circuit.
    pub id: NodeId,

    pub kind: NodeKind,

    /// Free-form display label ("kitchen ceiling light").
    pub label: String,

    pub position: Position,

    /// Gang count for switches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gangs: Option<u8>,

    /// Rated current in amperes; feeds the per-wire current estimate.
    #[serde(default)]
    pub rated_current: f64,

    /// Free-form parameters (mounting height, usage notes, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Node {
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: NodeId(0),
            kind,
            label: label.into(),
            position: Position::default(),
            gangs: None,
            rated_current: 0.0,
            params: BTreeMap::new(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_gangs(mut self, gangs: u8) -> Self {
        self.gangs = Some(gangs);
        self
    }

    pub fn with_rated_current(mut self, amperes: f64) -> Self {
        self.rated_current = amperes;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
