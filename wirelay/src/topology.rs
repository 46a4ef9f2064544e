//! Minimum-spanning-tree conduit topology generation.
//!
//! Builds the complete weighted graph over a circuit's nodes, computes a
//! minimum spanning tree with Kruskal's algorithm, and materializes one
//! conduit per tree edge. Equal-cost edges are consumed in ascending node
//! identifier order, so the output is deterministic even when several
//! minimal trees exist.

use petgraph::unionfind::UnionFind;

use crate::error::{Result, WirelayError};
use crate::model::{Circuit, Conduit, ConduitId, Node, NodeId};

/// How generated conduits combine with what the designer already drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopologyMode {
    /// Drop the previous conduit set and keep only the spanning tree.
    #[default]
    Replace,
    /// Additive union: existing conduits survive, and a tree edge whose
    /// endpoint pair is already connected reuses the existing conduit.
    Merge,
}

/// Designer-supplied cost of running a conduit between two nodes.
pub trait CostMetric {
    fn cost(&self, a: &Node, b: &Node) -> f64;
}

/// Default metric: straight-line distance between node positions.
pub struct EuclideanCost;

impl CostMetric for EuclideanCost {
    fn cost(&self, a: &Node, b: &Node) -> f64 {
        a.position.distance_to(&b.position)
    }
}

/// Generate the spanning conduit set for `circuit`. Returns the conduits
/// forming the tree (newly created ones, plus reused existing ones in merge
/// mode). The circuit's wiring is marked stale.
pub(crate) fn generate(
    circuit: &mut Circuit,
    mode: TopologyMode,
    metric: &dyn CostMetric,
    alloc: &mut dyn FnMut() -> ConduitId,
) -> Result<Vec<ConduitId>> {
    let nodes: Vec<&Node> = circuit.nodes().collect();
    if nodes.len() < 2 {
        return Err(WirelayError::EmptyTopology(circuit.id));
    }

    // Complete graph, edges keyed (cost, lower id, higher id) for the
    // deterministic Kruskal ordering.
    let mut edges: Vec<(f64, NodeId, NodeId)> = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in nodes.iter().skip(i + 1) {
            let (lo, hi) = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
            edges.push((metric.cost(a, b), lo, hi));
        }
    }
    edges.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

    let index_of = |id: NodeId| nodes.iter().position(|n| n.id == id);
    let mut forest: UnionFind<usize> = UnionFind::new(nodes.len());
    let mut tree: Vec<(NodeId, NodeId)> = Vec::new();
    for (_, a, b) in edges {
        let (Some(ia), Some(ib)) = (index_of(a), index_of(b)) else {
            continue;
        };
        if forest.union(ia, ib) {
            tree.push((a, b));
            if tree.len() == nodes.len() - 1 {
                break;
            }
        }
    }

    let lengths: Vec<f64> = tree
        .iter()
        .map(|&(a, b)| match (circuit.node(a), circuit.node(b)) {
            (Some(na), Some(nb)) => na.position.distance_to(&nb.position),
            _ => 0.0,
        })
        .collect();

    if mode == TopologyMode::Replace {
        circuit.conduits.clear();
    }

    let mut result = Vec::with_capacity(tree.len());
    for (&(a, b), &length) in tree.iter().zip(&lengths) {
        if let Some(existing) = circuit.conduit_between(a, b) {
            result.push(existing.id);
            continue;
        }
        let id = alloc();
        circuit.conduits.push(Conduit::new(id, a, b, length));
        result.push(id);
    }
    circuit.mark_stale();
    tracing::debug!(
        "circuit {}: topology generated, {} tree edges ({:?} mode)",
        circuit.id,
        result.len(),
        mode,
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircuitId, NodeKind};

    fn square() -> Circuit {
        let mut circuit = Circuit::new(CircuitId(1), "square");
        let positions = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        for (i, (x, y)) in positions.into_iter().enumerate() {
            let mut node = Node::new(NodeKind::Junction, format!("p{i}")).with_position(x, y);
            node.id = NodeId(i as u32 + 1);
            circuit.nodes.push(node);
        }
        circuit
    }

    fn alloc_from(start: u32) -> impl FnMut() -> ConduitId {
        let mut next = start;
        move || {
            let id = ConduitId(next);
            next += 1;
            id
        }
    }

    #[test]
    fn square_mst_is_deterministic() {
        // Unit square: four side edges of cost 1, two diagonals of cost √2.
        // The tree must take the three lowest-id sides.
        let mut circuit = square();
        let mut alloc = alloc_from(1);
        let conduits =
            generate(&mut circuit, TopologyMode::Replace, &EuclideanCost, &mut alloc).unwrap();
        assert_eq!(conduits.len(), 3);

        let pairs: Vec<(NodeId, NodeId)> = circuit.conduits().map(|c| (c.a, c.b)).collect();
        assert_eq!(
            pairs,
            vec![
                (NodeId(1), NodeId(2)),
                (NodeId(1), NodeId(4)),
                (NodeId(2), NodeId(3)),
            ]
        );
    }

    #[test]
    fn too_few_nodes_is_an_error() {
        let mut circuit = Circuit::new(CircuitId(1), "lonely");
        let mut node = Node::new(NodeKind::DistributionBox, "box");
        node.id = NodeId(1);
        circuit.nodes.push(node);
        let mut alloc = alloc_from(1);
        let err = generate(&mut circuit, TopologyMode::Replace, &EuclideanCost, &mut alloc)
            .unwrap_err();
        assert!(matches!(err, WirelayError::EmptyTopology(_)));
    }

    #[test]
    fn merge_mode_preserves_hand_added_conduits() {
        let mut circuit = square();
        // A hand-drawn diagonal that no spanning tree would pick.
        circuit
            .conduits
            .push(Conduit::new(ConduitId(99), NodeId(1), NodeId(3), 1.5));
        let mut alloc = alloc_from(1);
        generate(&mut circuit, TopologyMode::Merge, &EuclideanCost, &mut alloc).unwrap();
        assert!(circuit.conduit(ConduitId(99)).is_some());
        assert_eq!(circuit.conduits().count(), 4);
    }

    #[test]
    fn merge_mode_reuses_existing_pairs() {
        let mut circuit = square();
        circuit
            .conduits
            .push(Conduit::new(ConduitId(7), NodeId(1), NodeId(2), 1.0));
        let mut alloc = alloc_from(10);
        let conduits =
            generate(&mut circuit, TopologyMode::Merge, &EuclideanCost, &mut alloc).unwrap();
        assert!(conduits.contains(&ConduitId(7)));
        // No duplicate conduit for the 1-2 pair.
        assert_eq!(
            circuit
                .conduits()
                .filter(|c| c.connects(NodeId(1), NodeId(2)))
                .count(),
            1
        );
    }
}
