// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Represents a road network as a set of [Nodes](Node)
/// and [Edges](Edge) between them.
///
/// Nodes are kept ordered by their id, so iteration (and everything built
/// on top of it) is deterministic.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, (Node, Vec<Edge>)>);

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no nodes in the graph.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.values().map(|(node, _)| node)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Creates or updates a [Node] with `node.id`.
    ///
    /// All outgoing and incoming edges are preserved.
    pub fn set_node(&mut self, node: Node) {
        match self.0.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                e.get_mut().0 = node;
            }
        }
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.0
            .get(&from_id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the cost of an [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> f64 {
        self.get_edges(from_id)
            .iter()
            .find(|edge| edge.to == to_id)
            .map(|edge| edge.cost)
            .unwrap_or(f64::INFINITY)
    }

    /// Creates or updates an [Edge] from a node with a given id.
    ///
    /// An existing edge to the same node is overwritten, even if the new cost is higher.
    /// Edges from unknown nodes are silently dropped.
    pub fn set_edge(&mut self, from_id: i64, edge: Edge) {
        if let Some((_, edges)) = self.0.get_mut(&from_id) {
            if let Some(candidate) = edges.iter_mut().find(|e| e.to == edge.to) {
                *candidate = edge;
            } else {
                edges.push(edge);
            }
        }
    }

    /// Returns the total number of (one-way) edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, edges)| edges.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64) -> Node {
        Node {
            id,
            lat: 0.0,
            lon: id as f64 * 0.01,
        }
    }

    #[test]
    fn set_and_get() {
        let mut g = Graph::new();
        assert!(g.is_empty());

        g.set_node(node(2));
        g.set_node(node(1));
        assert_eq!(g.len(), 2);
        assert_eq!(g.get_node(1), Some(node(1)));
        assert_eq!(g.get_node(3), None);

        let ids: Vec<i64> = g.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn edges_overwrite() {
        let mut g = Graph::new();
        g.set_node(node(1));
        g.set_node(node(2));

        g.set_edge(1, Edge { to: 2, cost: 1.0 });
        assert_eq!(g.get_edge(1, 2), 1.0);
        assert_eq!(g.get_edge(2, 1), f64::INFINITY);

        g.set_edge(1, Edge { to: 2, cost: 5.0 });
        assert_eq!(g.get_edge(1, 2), 5.0);
        assert_eq!(g.get_edges(1).len(), 1);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn edges_from_unknown_nodes_are_dropped() {
        let mut g = Graph::new();
        g.set_node(node(1));
        g.set_edge(7, Edge { to: 1, cost: 1.0 });
        assert!(g.get_edges(7).is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn updating_node_keeps_edges() {
        let mut g = Graph::new();
        g.set_node(node(1));
        g.set_node(node(2));
        g.set_edge(1, Edge { to: 2, cost: 1.0 });

        g.set_node(Node {
            id: 1,
            lat: 1.0,
            lon: 1.0,
        });
        assert_eq!(g.get_edge(1, 2), 1.0);
        assert_eq!(g.get_node(1).map(|n| n.lat), Some(1.0));
    }
}
