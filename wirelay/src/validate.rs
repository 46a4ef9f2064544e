//! Stateless constraint checks.
//!
//! Invoked by the entity store and the wiring engine before they commit to
//! anything, and available standalone so an editing surface can show
//! targeted feedback while the user is still drawing. Every check returns
//! its own error kind; there is no generic failure.

use crate::error::{ConsistencyError, WirelayError};
use crate::model::{Circuit, NodeId};
use crate::wiring::ConduitGraph;

/// Node identifiers must be unique within the circuit. The store's global
/// allocator makes this structural; the check matters for documents loaded
/// from external sources.
pub fn check_duplicate_node_ids(circuit: &Circuit) -> Result<(), ConsistencyError> {
    let mut seen = std::collections::BTreeSet::new();
    for node in circuit.nodes() {
        if !seen.insert(node.id) {
            return Err(ConsistencyError::DuplicateNodeId {
                circuit: circuit.id,
                node: node.id,
            });
        }
    }
    Ok(())
}

/// Every conduit endpoint must be a member of the circuit that owns the
/// conduit; a conduit never crosses a circuit boundary.
pub fn check_conduit_endpoints(circuit: &Circuit) -> Result<(), ConsistencyError> {
    for conduit in circuit.conduits() {
        for endpoint in [conduit.a, conduit.b] {
            if !circuit.contains_node(endpoint) {
                return Err(ConsistencyError::ForeignNode {
                    circuit: circuit.id,
                    node: endpoint,
                });
            }
        }
    }
    Ok(())
}

/// Switches and device nodes must belong to a unit before wiring can be
/// derived. The distribution box and junction nodes are exempt: junctions
/// route wires but own none.
pub fn check_units_assigned(circuit: &Circuit) -> Result<(), WirelayError> {
    match unassigned_nodes(circuit).first() {
        Some(&node) => Err(WirelayError::UnassignedNode {
            circuit: circuit.id,
            node,
        }),
        None => Ok(()),
    }
}

/// All nodes that need a unit but have none, in ascending id order.
pub fn unassigned_nodes(circuit: &Circuit) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = circuit
        .nodes()
        .filter(|n| !n.kind.is_passive() && circuit.unit_of(n.id).is_none())
        .map(|n| n.id)
        .collect();
    nodes.sort();
    nodes
}

/// The conduit graph must connect the distribution box to every node.
pub fn check_connectivity(circuit: &Circuit) -> Result<(), WirelayError> {
    let root = circuit
        .distribution_box()
        .ok_or(WirelayError::MissingDistributionBox {
            circuit: circuit.id,
        })?;
    let tree = ConduitGraph::build(circuit).bfs_tree(root);
    let unreachable: Vec<NodeId> = circuit
        .nodes()
        .map(|n| n.id)
        .filter(|&id| !tree.reaches(id))
        .collect();
    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(WirelayError::IncompleteTopology {
            circuit: circuit.id,
            unreachable,
        })
    }
}

/// Every wire's owning unit must exist in the circuit that owns the host
/// conduit. Holds by construction for engine output; checked to catch
/// hand-edited documents.
pub fn check_wire_ownership(circuit: &Circuit) -> Result<(), WirelayError> {
    for conduit in circuit.conduits() {
        for wire in &conduit.wires {
            if let Some(unit) = wire.unit {
                if circuit.unit(unit).is_none() {
                    return Err(WirelayError::UnknownUnit(unit));
                }
            }
        }
    }
    Ok(())
}

/// Run every check and collect the findings, for edit-time feedback.
pub fn validate_circuit(circuit: &Circuit) -> Vec<WirelayError> {
    let mut findings = Vec::new();
    if let Err(e) = check_duplicate_node_ids(circuit) {
        findings.push(e.into());
    }
    if let Err(e) = check_conduit_endpoints(circuit) {
        findings.push(e.into());
    }
    for node in unassigned_nodes(circuit) {
        findings.push(WirelayError::UnassignedNode {
            circuit: circuit.id,
            node,
        });
    }
    if let Err(e) = check_connectivity(circuit) {
        findings.push(e);
    }
    if let Err(e) = check_wire_ownership(circuit) {
        findings.push(e);
    }
    findings
}
