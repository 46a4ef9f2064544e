//! Wirelay - electrical wiring layout computation library
//!
//! This library models placed electrical nodes (distribution boxes,
//! switches, loads, sockets), the physical conduits connecting them, and
//! derives, for every conduit, the exact set of wires that must be pulled
//! through it, following the four-step method used in electrical design
//! practice.
//!
//! # Quick Start
//!
//! ```no_run
//! use wirelay::prelude::*;
//!
//! let mut system = CircuitSystem::new();
//! let circuit = system.define_circuit("ground floor");
//!
//! let _box = system
//!     .add_node(circuit, Node::new(NodeKind::DistributionBox, "box").with_position(0.0, 0.0))
//!     .unwrap();
//! let switch = system
//!     .add_node(circuit, Node::new(NodeKind::Switch, "hall switch").with_position(2.0, 1.0))
//!     .unwrap();
//! let lamp = system
//!     .add_node(
//!         circuit,
//!         Node::new(NodeKind::Load, "hall lamp")
//!             .with_position(4.0, 0.0)
//!             .with_rated_current(0.5),
//!     )
//!     .unwrap();
//! system.define_unit(circuit, Unit::controlled([switch], [lamp])).unwrap();
//!
//! system.request_topology(circuit, TopologyMode::Replace).unwrap();
//! let report = system.compute_wiring(circuit).unwrap();
//! println!("{} wires laid", report.stats.total());
//! ```
//!
//! # Features
//!
//! - **Entity store**: circuits, nodes, conduits and units with invariant
//!   enforcement and cascading deletes
//! - **Topology generation**: deterministic minimum-spanning-tree conduit
//!   layouts with a pluggable cost metric
//! - **Four-step wiring**: base circuit, uncontrolled power, control layout,
//!   power backfeed, with per-wire current estimates
//! - **Validation**: targeted, typed checks for edit-time feedback

pub mod error;
pub mod model;
pub mod project;
pub mod system;
pub mod topology;
pub mod validate;
pub mod wiring;

// Re-export main types
pub use error::{ConsistencyError, Result, WirelayError};
pub use model::{
    Circuit, CircuitId, Conduit, ConduitId, Node, NodeId, NodeKind, Position, Unit, UnitId,
    UnitVariant, Wire, WireType, WiringPhase,
};
pub use project::{ProjectDocument, ProjectMetadata};
pub use system::{CircuitSystem, ConduitReport, WireInfo};
pub use topology::{CostMetric, EuclideanCost, TopologyMode};
pub use wiring::{WiringReport, WiringStats};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CircuitSystem, ConsistencyError, Node, NodeKind, ProjectDocument, TopologyMode, Unit,
        UnitVariant, WireType, WirelayError, WiringPhase, WiringReport,
    };
}
