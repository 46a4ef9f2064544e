//! Physical conduits between nodes.

use serde::{Deserialize, Serialize};

use super::{ConduitId, NodeId, UnitId, Wire, WireType};

/// An undirected physical channel between two nodes of one circuit.
///
/// Owns the ordered list of wires pulled through it; the order is the order
/// in which the four derivation steps laid them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conduit {
    pub id: ConduitId,
    pub a: NodeId,
    pub b: NodeId,

    /// Physical length in metres, derived from the endpoint positions when
    /// the conduit is created.
    #[serde(default)]
    pub length: f64,

    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Conduit {
    pub fn new(id: ConduitId, a: NodeId, b: NodeId, length: f64) -> Self {
        Self {
            id,
            a,
            b,
            length,
            wires: Vec::new(),
        }
    }

    /// True if this conduit joins the given unordered pair.
    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }

    /// Fetch the wire for a (type, owning unit) pair, laying a fresh one if
    /// the pair is not present yet. One entry per pair per conduit: wires are
    /// never merged across units.
    pub(crate) fn lay(&mut self, wire_type: WireType, unit: Option<UnitId>) -> &mut Wire {
        let pos = match self
            .wires
            .iter()
            .position(|w| w.wire_type == wire_type && w.unit == unit)
        {
            Some(pos) => pos,
            None => {
                self.wires.push(Wire::new(wire_type, unit));
                self.wires.len() - 1
            }
        };
        &mut self.wires[pos]
    }
}
