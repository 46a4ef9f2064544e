//! Core data model for wiring layouts.
//!
//! The entities follow electrical design practice:
//! - [`Node`]: a placed electrical point (distribution box, switch, load, ...)
//! - [`Conduit`]: a physical channel between two nodes, carrying wires
//! - [`Wire`]: a derived record of one wire pulled through a conduit
//! - [`Unit`]: a logical control relationship (controlled or uncontrolled)
//! - [`Circuit`]: one distribution box plus its members, units and conduits
//!
//! All types serialize losslessly with serde so a project document can be
//! round-tripped without losing numbering state.

pub mod circuit;
pub mod conduit;
pub mod node;
pub mod unit;
pub mod wire;

pub use circuit::{Circuit, WiringPhase};
pub use conduit::Conduit;
pub use node::{Node, NodeKind, Position};
pub use unit::{Unit, UnitVariant};
pub use wire::{Wire, WireType};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a circuit. Allocated once, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CircuitId(pub u32);

/// Stable identity of a node. Unique within its circuit (the allocator is
/// global, so uniqueness survives reassignment between circuits).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Stable identity of a conduit. The ordering of conduit identifiers is the
/// tie-break used by deterministic path selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConduitId(pub u32);

/// Stable handle of a unit. The user-facing identifier (`C-UT3`, `U-UT1`) is
/// derived from creation order on demand, never stored; see
/// [`Circuit::unit_label`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-C{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for ConduitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}
