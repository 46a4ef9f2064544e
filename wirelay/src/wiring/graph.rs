//! Graph view of a circuit's conduits.
//!
//! Wraps a petgraph graph plus id/index maps, the same shape the rest of the
//! library uses for connectivity checks and path derivation. Paths are
//! shortest by hop count; when several shortest paths exist, breadth-first
//! search explores lower-identifier conduits first, so the selected tree is
//! deterministic for a given conduit set.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::{Circuit, ConduitId, NodeId};

pub(crate) struct ConduitGraph {
    graph: UnGraph<NodeId, ConduitId>,
    index: HashMap<NodeId, NodeIndex>,
}

impl ConduitGraph {
    pub fn build(circuit: &Circuit) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::new();
        for node in circuit.nodes() {
            index.insert(node.id, graph.add_node(node.id));
        }
        for conduit in circuit.conduits() {
            if let (Some(&a), Some(&b)) = (index.get(&conduit.a), index.get(&conduit.b)) {
                graph.add_edge(a, b, conduit.id);
            }
        }
        Self { graph, index }
    }

    /// Breadth-first tree rooted at `root`. Neighbors are visited in
    /// ascending conduit id order, which fixes the tie-break between
    /// equal-length paths.
    pub fn bfs_tree(&self, root: NodeId) -> PathTree {
        let mut parent = HashMap::new();
        let mut depth = HashMap::new();
        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();

        if self.index.contains_key(&root) {
            seen.insert(root);
            depth.insert(root, 0usize);
            queue.push_back(root);
        }

        while let Some(current) = queue.pop_front() {
            let ix = self.index[&current];
            let mut neighbors: Vec<(ConduitId, NodeId)> = self
                .graph
                .edges(ix)
                .map(|e| (*e.weight(), self.graph[e.target()]))
                .collect();
            neighbors.sort();
            for (conduit, next) in neighbors {
                if seen.insert(next) {
                    parent.insert(next, (current, conduit));
                    depth.insert(next, depth[&current] + 1);
                    queue.push_back(next);
                }
            }
        }

        PathTree {
            root,
            parent,
            depth,
        }
    }
}

/// Shortest-path tree produced by [`ConduitGraph::bfs_tree`].
pub(crate) struct PathTree {
    root: NodeId,
    parent: HashMap<NodeId, (NodeId, ConduitId)>,
    depth: HashMap<NodeId, usize>,
}

impl PathTree {
    pub fn reaches(&self, node: NodeId) -> bool {
        node == self.root || self.parent.contains_key(&node)
    }

    /// Hop count from the root, if reachable.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.depth.get(&node).copied()
    }

    /// Conduits on the path from the root to `node`, in root-to-node order.
    pub fn conduit_path(&self, node: NodeId) -> Option<Vec<ConduitId>> {
        if node == self.root {
            return Some(Vec::new());
        }
        let mut path = Vec::new();
        let mut current = node;
        while current != self.root {
            let (prev, conduit) = *self.parent.get(&current)?;
            path.push(conduit);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircuitId, Conduit, Node, NodeKind};

    /// Diamond: 1-2, 1-3, 2-4, 3-4. Two shortest paths to node 4; the one
    /// through the lower conduit id must win.
    fn diamond() -> Circuit {
        let mut circuit = Circuit::new(CircuitId(1), "diamond");
        for i in 1..=4u32 {
            let mut node = Node::new(NodeKind::Junction, format!("j{i}"));
            node.id = NodeId(i);
            circuit.nodes.push(node);
        }
        for (cid, a, b) in [(1, 1, 2), (2, 1, 3), (3, 2, 4), (4, 3, 4)] {
            circuit
                .conduits
                .push(Conduit::new(ConduitId(cid), NodeId(a), NodeId(b), 1.0));
        }
        circuit
    }

    #[test]
    fn bfs_prefers_lower_conduit_ids() {
        let circuit = diamond();
        let tree = ConduitGraph::build(&circuit).bfs_tree(NodeId(1));
        assert_eq!(
            tree.conduit_path(NodeId(4)),
            Some(vec![ConduitId(1), ConduitId(3)])
        );
        assert_eq!(tree.depth(NodeId(4)), Some(2));
    }

    #[test]
    fn unreachable_nodes_are_reported() {
        let mut circuit = diamond();
        let mut node = Node::new(NodeKind::Junction, "island");
        node.id = NodeId(9);
        circuit.nodes.push(node);

        let tree = ConduitGraph::build(&circuit).bfs_tree(NodeId(1));
        assert!(!tree.reaches(NodeId(9)));
        assert!(tree.conduit_path(NodeId(9)).is_none());
    }

    #[test]
    fn root_path_is_empty() {
        let circuit = diamond();
        let tree = ConduitGraph::build(&circuit).bfs_tree(NodeId(1));
        assert_eq!(tree.conduit_path(NodeId(1)), Some(Vec::new()));
    }
}
