//! Error taxonomy of the wiring core.
//!
//! Every failure is local to the operation that raised it: mutations are
//! all-or-nothing, so after correcting the reported condition the caller can
//! simply retry. Nothing here is fatal.

use thiserror::Error;

use crate::model::{CircuitId, ConduitId, NodeId, NodeKind, UnitId};

pub type Result<T> = std::result::Result<T, WirelayError>;

/// An invariant violation detected while validating a mutation.
///
/// Carries the offending identifiers so a caller (UI or test) can point at
/// the exact entities involved. The mutation that produced this error has
/// not been committed, not even partially.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("node {node} already exists in circuit {circuit}")]
    DuplicateNodeId { circuit: CircuitId, node: NodeId },

    #[error("nodes {a} and {b} belong to different circuits; a conduit cannot cross a circuit boundary")]
    CrossCircuitConduit { a: NodeId, b: NodeId },

    #[error("a conduit needs two distinct endpoints, got {node} twice")]
    SelfLoop { node: NodeId },

    #[error("nodes {a} and {b} are already connected by conduit {existing}")]
    DuplicateConduit {
        a: NodeId,
        b: NodeId,
        existing: ConduitId,
    },

    #[error("node {node} is not a member of circuit {circuit}")]
    ForeignNode { circuit: CircuitId, node: NodeId },

    #[error("node {node} already belongs to unit {unit}")]
    NodeAlreadyInUnit { node: NodeId, unit: String },

    #[error("circuit {circuit} already has distribution box {existing}")]
    SecondDistributionBox {
        circuit: CircuitId,
        existing: NodeId,
    },

    #[error("node {node} is a {kind}, expected a {expected}")]
    UnitMemberKind {
        node: NodeId,
        kind: NodeKind,
        expected: &'static str,
    },

    #[error("a unit needs at least one switch and one load (controlled) or one device (uncontrolled)")]
    EmptyUnit,

    #[error("distribution box {node} is the root of its circuit and cannot be reassigned")]
    ImmovableDistributionBox { node: NodeId },
}

/// Top-level error of the library.
#[derive(Debug, Error)]
pub enum WirelayError {
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// Topology requested for a circuit with fewer than two nodes.
    #[error("circuit {0} has fewer than two nodes; no topology to generate")]
    EmptyTopology(CircuitId),

    /// The conduit graph does not connect the distribution box to every node.
    #[error("conduit graph of circuit {circuit} leaves nodes unreachable from the distribution box: {unreachable:?}")]
    IncompleteTopology {
        circuit: CircuitId,
        unreachable: Vec<NodeId>,
    },

    /// A node that must belong to a unit does not, at wiring time.
    #[error("node {node} in circuit {circuit} is not assigned to any unit")]
    UnassignedNode { circuit: CircuitId, node: NodeId },

    #[error("circuit {circuit} has no distribution box")]
    MissingDistributionBox { circuit: CircuitId },

    #[error("unknown circuit {0}")]
    UnknownCircuit(CircuitId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown conduit {0}")]
    UnknownConduit(ConduitId),

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}
