//! The entity store: top-level owner of all circuits.
//!
//! Every mutation funnels through the operations here, which validate the
//! model invariants before committing and never leave a partial edit behind.
//! Operations are not reentrant; a mutation fully commits or fully fails
//! before the next one begins.

use serde::{Deserialize, Serialize};

use crate::error::{ConsistencyError, Result, WirelayError};
use crate::model::{
    Circuit, CircuitId, Conduit, ConduitId, Node, NodeId, NodeKind, Unit, UnitId, UnitVariant,
    WireType,
};
use crate::topology::{CostMetric, EuclideanCost, TopologyMode};
use crate::wiring::{self, WiringReport};

/// One wire of a conduit listing, with the owning unit resolved to its
/// display identifier.
#[derive(Debug, Clone, Serialize)]
pub struct WireInfo {
    pub wire_type: WireType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub current: f64,
    pub color: &'static str,
}

/// Per-conduit wire listing, the shape consumed by rendering surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct ConduitReport {
    pub conduit: ConduitId,
    pub from: NodeId,
    pub to: NodeId,
    pub length: f64,
    pub wires: Vec<WireInfo>,
}

/// Top-level owner of all circuits and the identity allocators.
///
/// Identity counters are monotonic and never reused, so a node keeps its id
/// across circuit reassignment and serialized documents stay stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitSystem {
    circuits: Vec<Circuit>,
    #[serde(default)]
    default_circuit: Option<CircuitId>,
    next_circuit: u32,
    next_node: u32,
    next_conduit: u32,
    next_unit: u32,
}

impl CircuitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Circuits ---

    /// Create a new, empty circuit.
    pub fn define_circuit(&mut self, label: impl Into<String>) -> CircuitId {
        self.next_circuit += 1;
        let id = CircuitId(self.next_circuit);
        self.circuits.push(Circuit::new(id, label));
        id
    }

    /// The implicit default circuit, created on first use. Nodes added by a
    /// surface that never defines circuits all land here, so no node is ever
    /// orphaned when a calculation is requested.
    pub fn default_circuit(&mut self) -> CircuitId {
        if let Some(id) = self.default_circuit {
            if self.circuit(id).is_some() {
                return id;
            }
        }
        let id = self.define_circuit("main");
        self.default_circuit = Some(id);
        id
    }

    pub fn circuits(&self) -> impl Iterator<Item = &Circuit> {
        self.circuits.iter()
    }

    pub fn circuit(&self, id: CircuitId) -> Option<&Circuit> {
        self.circuits.iter().find(|c| c.id == id)
    }

    fn circuit_mut(&mut self, id: CircuitId) -> Result<&mut Circuit> {
        self.circuits
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(WirelayError::UnknownCircuit(id))
    }

    /// The circuit a node currently belongs to.
    pub fn circuit_of(&self, node: NodeId) -> Option<&Circuit> {
        self.circuits.iter().find(|c| c.contains_node(node))
    }

    // --- Nodes ---

    /// Add a node to a circuit. At most one distribution box per circuit.
    pub fn add_node(&mut self, circuit: CircuitId, node: Node) -> Result<NodeId> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        if node.kind == NodeKind::DistributionBox {
            if let Some(existing) = target.distribution_box() {
                return Err(ConsistencyError::SecondDistributionBox { circuit, existing }.into());
            }
        }
        self.next_node += 1;
        let id = NodeId(self.next_node);
        let mut node = node;
        node.id = id;
        let target = self.circuit_mut(circuit)?;
        target.nodes.push(node);
        target.mark_stale();
        Ok(id)
    }

    /// Remove a node, cascading: the node leaves its unit (dissolving the
    /// unit if it empties), incident conduits are removed, and the circuit's
    /// wiring is marked stale.
    pub fn remove_node(&mut self, circuit: CircuitId, node: NodeId) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        if !target.contains_node(node) {
            return Err(WirelayError::UnknownNode(node));
        }
        if let Some(dissolved) = target.detach_from_unit(node) {
            tracing::debug!("node {} removal dissolved empty unit {}", node, dissolved);
        }
        target.conduits.retain(|c| c.other_end(node).is_none());
        target.nodes.retain(|n| n.id != node);
        target.mark_stale();
        Ok(())
    }

    /// Edit a node's display label. Labels never influence derived wiring,
    /// so the cached result stays valid.
    pub fn rename_node(&mut self, circuit: CircuitId, node: NodeId, label: impl Into<String>) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        let node = target
            .node_mut(node)
            .ok_or(WirelayError::UnknownNode(node))?;
        node.label = label.into();
        Ok(())
    }

    /// Move a node; incident conduit lengths are recomputed.
    pub fn move_node(&mut self, circuit: CircuitId, node: NodeId, x: f64, y: f64) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        {
            let n = target
                .node_mut(node)
                .ok_or(WirelayError::UnknownNode(node))?;
            n.position.x = x;
            n.position.y = y;
        }
        let positions: Vec<(ConduitId, f64)> = target
            .conduits()
            .filter(|c| c.other_end(node).is_some())
            .map(|c| {
                let length = match (target.node(c.a), target.node(c.b)) {
                    (Some(a), Some(b)) => a.position.distance_to(&b.position),
                    _ => c.length,
                };
                (c.id, length)
            })
            .collect();
        for (id, length) in positions {
            if let Some(conduit) = target.conduit_mut(id) {
                conduit.length = length;
            }
        }
        target.mark_stale();
        Ok(())
    }

    /// Move a node into another circuit. The node leaves its unit and loses
    /// its conduits (a conduit cannot cross a circuit boundary); both
    /// circuits' wiring goes stale.
    pub fn reassign_node_to_circuit(&mut self, node: NodeId, target: CircuitId) -> Result<()> {
        if self.circuit(target).is_none() {
            return Err(WirelayError::UnknownCircuit(target));
        }
        let source_id = self
            .circuit_of(node)
            .map(|c| c.id)
            .ok_or(WirelayError::UnknownNode(node))?;
        if source_id == target {
            return Ok(());
        }
        let source = self.circuit_mut(source_id)?;
        let moving = source
            .node(node)
            .ok_or(WirelayError::UnknownNode(node))?
            .clone();
        if moving.kind == NodeKind::DistributionBox {
            return Err(ConsistencyError::ImmovableDistributionBox { node }.into());
        }
        if let Some(dissolved) = source.detach_from_unit(node) {
            tracing::debug!("reassigning {} dissolved empty unit {}", node, dissolved);
        }
        source.conduits.retain(|c| c.other_end(node).is_none());
        source.nodes.retain(|n| n.id != node);
        source.mark_stale();

        let destination = self.circuit_mut(target)?;
        destination.nodes.push(moving);
        destination.mark_stale();
        Ok(())
    }

    // --- Conduits ---

    /// Connect two nodes of one circuit with a conduit. Rejects self-loops,
    /// duplicate pairs and endpoints from different circuits.
    pub fn add_conduit(&mut self, circuit: CircuitId, a: NodeId, b: NodeId) -> Result<ConduitId> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        if a == b {
            return Err(ConsistencyError::SelfLoop { node: a }.into());
        }
        for endpoint in [a, b] {
            if !target.contains_node(endpoint) {
                return Err(if self.circuit_of(endpoint).is_some() {
                    ConsistencyError::CrossCircuitConduit { a, b }.into()
                } else {
                    WirelayError::UnknownNode(endpoint)
                });
            }
        }
        if let Some(existing) = target.conduit_between(a, b) {
            return Err(ConsistencyError::DuplicateConduit {
                a,
                b,
                existing: existing.id,
            }
            .into());
        }
        let length = match (target.node(a), target.node(b)) {
            (Some(na), Some(nb)) => na.position.distance_to(&nb.position),
            _ => 0.0,
        };
        self.next_conduit += 1;
        let id = ConduitId(self.next_conduit);
        let target = self.circuit_mut(circuit)?;
        target.conduits.push(Conduit::new(id, a, b, length));
        target.mark_stale();
        Ok(id)
    }

    pub fn remove_conduit(&mut self, circuit: CircuitId, conduit: ConduitId) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        let before = target.conduits.len();
        target.conduits.retain(|c| c.id != conduit);
        if target.conduits.len() == before {
            return Err(WirelayError::UnknownConduit(conduit));
        }
        target.mark_stale();
        Ok(())
    }

    /// Drop every conduit of a circuit.
    pub fn clear_conduits(&mut self, circuit: CircuitId) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        target.conduits.clear();
        target.mark_stale();
        Ok(())
    }

    /// Drop every derived wire of a circuit, keeping the conduits.
    pub fn clear_wires(&mut self, circuit: CircuitId) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        target.clear_wires();
        Ok(())
    }

    // --- Units ---

    /// Define a unit over nodes of one circuit. Controlled units need at
    /// least one switch and one load; switches must be switch nodes and
    /// loads must be device nodes; no node may already belong to a unit.
    pub fn define_unit(&mut self, circuit: CircuitId, unit: Unit) -> Result<UnitId> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        match &unit.variant {
            UnitVariant::Controlled { switches, loads } => {
                if switches.is_empty() || loads.is_empty() {
                    return Err(ConsistencyError::EmptyUnit.into());
                }
                for &s in switches {
                    Self::check_switch_member(target, circuit, s)?;
                }
                for &l in loads {
                    Self::check_device_member(target, circuit, l)?;
                }
            }
            UnitVariant::Uncontrolled { node } => {
                Self::check_device_member(target, circuit, *node)?;
            }
        }
        self.next_unit += 1;
        let id = UnitId(self.next_unit);
        let mut unit = unit;
        unit.id = id;
        let target = self.circuit_mut(circuit)?;
        target.units.push(unit);
        target.mark_stale();
        Ok(id)
    }

    /// Delete a unit. Same-variant siblings created later renumber down by
    /// one, keeping the display namespace contiguous; this falls out of the
    /// derived numbering, nothing is rewritten.
    pub fn dissolve_unit(&mut self, circuit: CircuitId, unit: UnitId) -> Result<()> {
        let target = self.circuit_mut(circuit)?;
        let before = target.units.len();
        target.units.retain(|u| u.id != unit);
        if target.units.len() == before {
            return Err(WirelayError::UnknownUnit(unit));
        }
        target.mark_stale();
        tracing::debug!("unit {} dissolved in circuit {}", unit, circuit);
        Ok(())
    }

    fn check_switch_member(target: &Circuit, circuit: CircuitId, node: NodeId) -> Result<()> {
        let found = target
            .node(node)
            .ok_or(ConsistencyError::ForeignNode { circuit, node })?;
        if found.kind != NodeKind::Switch {
            return Err(ConsistencyError::UnitMemberKind {
                node,
                kind: found.kind,
                expected: "switch",
            }
            .into());
        }
        if let Some(owner) = target.unit_of(node) {
            let label = target
                .unit_label(owner.id)
                .unwrap_or_else(|| owner.id.to_string());
            return Err(ConsistencyError::NodeAlreadyInUnit { node, unit: label }.into());
        }
        Ok(())
    }

    fn check_device_member(target: &Circuit, circuit: CircuitId, node: NodeId) -> Result<()> {
        let found = target
            .node(node)
            .ok_or(ConsistencyError::ForeignNode { circuit, node })?;
        if !found.kind.is_device() {
            return Err(ConsistencyError::UnitMemberKind {
                node,
                kind: found.kind,
                expected: "load or socket",
            }
            .into());
        }
        if let Some(owner) = target.unit_of(node) {
            let label = target
                .unit_label(owner.id)
                .unwrap_or_else(|| owner.id.to_string());
            return Err(ConsistencyError::NodeAlreadyInUnit { node, unit: label }.into());
        }
        Ok(())
    }

    // --- Derivation ---

    /// Generate the conduit topology for a circuit with the default
    /// (Euclidean) cost metric.
    pub fn request_topology(
        &mut self,
        circuit: CircuitId,
        mode: TopologyMode,
    ) -> Result<Vec<ConduitId>> {
        self.request_topology_with(circuit, mode, &EuclideanCost)
    }

    /// Generate the conduit topology with a designer-supplied cost metric.
    pub fn request_topology_with(
        &mut self,
        circuit: CircuitId,
        mode: TopologyMode,
        metric: &dyn CostMetric,
    ) -> Result<Vec<ConduitId>> {
        let pos = self
            .circuits
            .iter()
            .position(|c| c.id == circuit)
            .ok_or(WirelayError::UnknownCircuit(circuit))?;
        let next_conduit = &mut self.next_conduit;
        let mut alloc = || {
            *next_conduit += 1;
            ConduitId(*next_conduit)
        };
        crate::topology::generate(&mut self.circuits[pos], mode, metric, &mut alloc)
    }

    /// Run the four-step wiring derivation for a circuit, replacing its wire
    /// set. No wires are written if a precondition fails.
    pub fn compute_wiring(&mut self, circuit: CircuitId) -> Result<WiringReport> {
        let target = self.circuit_mut(circuit)?;
        wiring::compute(target)
    }

    // --- Queries ---

    /// Members of a unit: switches first, then loads.
    pub fn unit_members(&self, circuit: CircuitId, unit: UnitId) -> Result<Vec<NodeId>> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        let unit = target.unit(unit).ok_or(WirelayError::UnknownUnit(unit))?;
        Ok(unit.members())
    }

    /// Wires of one conduit with owning units resolved to display labels.
    pub fn conduit_wires(&self, circuit: CircuitId, conduit: ConduitId) -> Result<Vec<WireInfo>> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        let conduit = target
            .conduit(conduit)
            .ok_or(WirelayError::UnknownConduit(conduit))?;
        Ok(Self::wires_of(target, conduit))
    }

    /// Full per-conduit listing for a circuit, in conduit id order.
    pub fn wire_report(&self, circuit: CircuitId) -> Result<Vec<ConduitReport>> {
        let target = self.circuit(circuit).ok_or(WirelayError::UnknownCircuit(circuit))?;
        let mut conduits: Vec<&Conduit> = target.conduits().collect();
        conduits.sort_by_key(|c| c.id);
        Ok(conduits
            .into_iter()
            .map(|c| ConduitReport {
                conduit: c.id,
                from: c.a,
                to: c.b,
                length: c.length,
                wires: Self::wires_of(target, c),
            })
            .collect())
    }

    fn wires_of(circuit: &Circuit, conduit: &Conduit) -> Vec<WireInfo> {
        conduit
            .wires
            .iter()
            .map(|w| WireInfo {
                wire_type: w.wire_type,
                unit: w.unit.and_then(|u| circuit.unit_label(u)),
                current: w.current,
                color: w.wire_type.color(),
            })
            .collect()
    }
}
