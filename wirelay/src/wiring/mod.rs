//! Four-step wiring derivation.
//!
//! Given a circuit whose nodes, units and conduits are established, the
//! engine derives every wire in four ordered steps rooted at the
//! distribution box:
//!
//! 1. **Base circuit** — one neutral and one protective-earth wire on every
//!    conduit that lies on any node's root path, deduplicated.
//! 2. **Uncontrolled power** — per uncontrolled unit, a unit-owned power
//!    line along the root path to the unit's device.
//! 3. **Control layout** — per controlled unit, a unit-owned control line
//!    along the root path to each of its switches.
//! 4. **Power backfeed** — per controlled unit, a unit-owned power line from
//!    each load's nearest switch to the load, closing the switch loop.
//!
//! Preconditions are checked before anything is written; on failure no wire
//! changes are made. A successful run replaces the circuit's wire set
//! wholesale and is idempotent up to ordering.

mod graph;

pub(crate) use graph::{ConduitGraph, PathTree};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Result, WirelayError};
use crate::model::{
    Circuit, CircuitId, ConduitId, NodeId, UnitId, UnitVariant, WireType, WiringPhase,
};
use crate::validate;

/// Wire counts per type after a completed run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WiringStats {
    pub neutral: usize,
    pub protective_earth: usize,
    pub power_line: usize,
    pub control_line: usize,
}

impl WiringStats {
    pub fn total(&self) -> usize {
        self.neutral + self.protective_earth + self.power_line + self.control_line
    }
}

/// Summary of one wiring computation.
#[derive(Debug, Clone, Serialize)]
pub struct WiringReport {
    pub circuit: CircuitId,
    pub stats: WiringStats,
}

/// Per-unit routing decisions for steps 3 and 4, resolved before any wire is
/// laid so both steps agree on the switch each load hangs off.
struct ControlledPlan {
    unit: UnitId,
    switches: Vec<NodeId>,
    /// (load, nearest switch), nearest by hop count, ties to the lower
    /// switch id.
    assignments: Vec<(NodeId, NodeId)>,
    trees: BTreeMap<NodeId, PathTree>,
}

pub(crate) fn compute(circuit: &mut Circuit) -> Result<WiringReport> {
    let circuit_id = circuit.id;
    let root = circuit
        .distribution_box()
        .ok_or(WirelayError::MissingDistributionBox {
            circuit: circuit_id,
        })?;

    validate::check_units_assigned(circuit)?;

    let graph = ConduitGraph::build(circuit);
    let root_tree = graph.bfs_tree(root);
    let unreachable: Vec<NodeId> = circuit
        .nodes()
        .map(|n| n.id)
        .filter(|&id| !root_tree.reaches(id))
        .collect();
    if !unreachable.is_empty() {
        return Err(WirelayError::IncompleteTopology {
            circuit: circuit_id,
            unreachable,
        });
    }

    // Snapshot everything the steps need, then mutate conduits freely.
    let rated: BTreeMap<NodeId, f64> = circuit
        .nodes()
        .map(|n| (n.id, n.rated_current))
        .collect();
    let mut node_ids: Vec<NodeId> = circuit.nodes().map(|n| n.id).collect();
    node_ids.sort();
    let mut device_ids: Vec<NodeId> = circuit
        .nodes()
        .filter(|n| n.kind.is_device())
        .map(|n| n.id)
        .collect();
    device_ids.sort();
    let units: Vec<crate::model::Unit> = circuit.units().cloned().collect();
    let plans = resolve_controlled_plans(&units, &graph);

    circuit.clear_wires();

    // Step 1: base circuit.
    for &node in &node_ids {
        if node == root {
            continue;
        }
        if let Some(path) = root_tree.conduit_path(node) {
            for cid in path {
                lay_on(circuit, cid, WireType::Neutral, None, 0.0);
                lay_on(circuit, cid, WireType::ProtectiveEarth, None, 0.0);
            }
        }
    }
    for &device in &device_ids {
        if let Some(path) = root_tree.conduit_path(device) {
            for cid in path {
                lay_on(circuit, cid, WireType::Neutral, None, rated[&device]);
            }
        }
    }
    circuit.phase = WiringPhase::BaseLaid;
    tracing::debug!("circuit {}: base neutral/earth laid", circuit_id);

    // Step 2: uncontrolled power.
    for unit in &units {
        let UnitVariant::Uncontrolled { node } = &unit.variant else {
            continue;
        };
        if let Some(path) = root_tree.conduit_path(*node) {
            for cid in path {
                lay_on(circuit, cid, WireType::PowerLine, Some(unit.id), rated[node]);
            }
        }
    }
    circuit.phase = WiringPhase::UncontrolledPowerLaid;

    // Step 3: control layout. The control line for a switch carries the sum
    // of the loads hanging off that switch; where two switch paths share a
    // trunk conduit the single per-unit wire accumulates both sums.
    for plan in &plans {
        for &switch in &plan.switches {
            let downstream: f64 = plan
                .assignments
                .iter()
                .filter(|(_, s)| *s == switch)
                .map(|(load, _)| rated[load])
                .sum();
            if let Some(path) = root_tree.conduit_path(switch) {
                for cid in path {
                    lay_on(circuit, cid, WireType::ControlLine, Some(plan.unit), downstream);
                }
            }
        }
    }
    circuit.phase = WiringPhase::ControlLaid;

    // Step 4: power backfeed, switch to load.
    for plan in &plans {
        for &(load, switch) in &plan.assignments {
            if let Some(path) = plan.trees[&switch].conduit_path(load) {
                for cid in path {
                    lay_on(circuit, cid, WireType::PowerLine, Some(plan.unit), rated[&load]);
                }
            }
        }
    }
    circuit.phase = WiringPhase::Complete;

    let stats = count_wires(circuit);
    tracing::info!(
        "circuit {}: wiring complete, {} wires across {} conduits",
        circuit_id,
        stats.total(),
        circuit.conduits().filter(|c| !c.wires.is_empty()).count(),
    );
    Ok(WiringReport {
        circuit: circuit_id,
        stats,
    })
}

fn resolve_controlled_plans(units: &[crate::model::Unit], graph: &ConduitGraph) -> Vec<ControlledPlan> {
    let mut plans = Vec::new();
    for unit in units {
        let UnitVariant::Controlled { switches, loads } = &unit.variant else {
            continue;
        };
        let switches: Vec<NodeId> = switches.iter().copied().collect();
        let trees: BTreeMap<NodeId, PathTree> = switches
            .iter()
            .map(|&s| (s, graph.bfs_tree(s)))
            .collect();
        let mut assignments = Vec::new();
        for &load in loads {
            let mut best: Option<(usize, NodeId)> = None;
            for &switch in &switches {
                if let Some(hops) = trees[&switch].depth(load) {
                    // Strict less keeps the first (lowest-id) switch on ties.
                    if best.map_or(true, |(b, _)| hops < b) {
                        best = Some((hops, switch));
                    }
                }
            }
            if let Some((_, switch)) = best {
                assignments.push((load, switch));
            }
        }
        plans.push(ControlledPlan {
            unit: unit.id,
            switches,
            assignments,
            trees,
        });
    }
    plans
}

fn lay_on(
    circuit: &mut Circuit,
    conduit: ConduitId,
    wire_type: WireType,
    unit: Option<UnitId>,
    add_current: f64,
) {
    if let Some(conduit) = circuit.conduit_mut(conduit) {
        let wire = conduit.lay(wire_type, unit);
        wire.current += add_current;
    }
}

fn count_wires(circuit: &Circuit) -> WiringStats {
    let mut stats = WiringStats::default();
    for conduit in circuit.conduits() {
        for wire in &conduit.wires {
            match wire.wire_type {
                WireType::Neutral => stats.neutral += 1,
                WireType::ProtectiveEarth => stats.protective_earth += 1,
                WireType::PowerLine => stats.power_line += 1,
                WireType::ControlLine => stats.control_line += 1,
            }
        }
    }
    stats
}
