// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::{Element, Point, Way};
use crate::{CostModel, Edge, Graph};

/// Helper object used for converting [map elements](Element) into an undirected [Graph].
///
/// Points without coordinates are never added to the graph. Every pair of consecutive
/// way nodes becomes a pair of edges (one in each direction) with the cost computed by
/// the [CostModel]. Pairs referring to nodes outside of the graph are skipped.
///
/// If multiple ways share a segment, the last processed way determines the cost
/// of both edges.
///
/// [GraphBuilder::add_elements] adds all points before any way, so the relative
/// order of points and ways in the input does not matter.
pub struct GraphBuilder<'a, C: CostModel + ?Sized> {
    g: Graph,
    cost: &'a C,
    skipped_segments: usize,
}

impl<'a, C: CostModel + ?Sized> GraphBuilder<'a, C> {
    /// Create a new, empty graph builder.
    pub fn new(cost: &'a C) -> Self {
        Self {
            g: Graph::default(),
            cost,
            skipped_segments: 0,
        }
    }

    /// Add all elements from the provided slice: first all points, then all ways.
    pub fn add_elements(&mut self, elements: &[Element]) {
        elements.iter().for_each(|e| {
            if let Element::Node(p) = e {
                self.add_point(p);
            }
        });

        elements.iter().for_each(|e| {
            if let Element::Way(w) = e {
                self.add_way(w);
            }
        });
    }

    /// Adds a [Point] to the graph, provided it has both coordinates.
    /// A point with an id already present in the graph replaces the previous position.
    pub fn add_point(&mut self, p: &Point) {
        match p.position() {
            Some(node) => self.g.set_node(node),
            None => log::trace!("point {} has no position - not adding to graph", p.id),
        }
    }

    /// Adds edges for every pair of consecutive nodes of a [Way], in both directions.
    pub fn add_way(&mut self, w: &Way) {
        if w.nodes.len() < 2 {
            log::debug!("way {} has less than 2 nodes - skipping", w.id);
            return;
        }

        for pair in w.nodes.windows(2) {
            let (left, right) = match (self.g.get_node(pair[0]), self.g.get_node(pair[1])) {
                (Some(left), Some(right)) => (left, right),
                _ => {
                    log::debug!(
                        "way {} refers to unknown nodes - skipping segment {}-{}",
                        w.id,
                        pair[0],
                        pair[1],
                    );
                    self.skipped_segments += 1;
                    continue;
                }
            };

            let cost = self.cost.cost(&left, &right);
            self.g.set_edge(left.id, Edge { to: right.id, cost });
            self.g.set_edge(right.id, Edge { to: left.id, cost });
        }
    }

    /// Finishes building and returns the [Graph].
    pub fn finish(self) -> Graph {
        log::debug!(
            "built graph with {} nodes and {} edges ({} segments skipped)",
            self.g.len(),
            self.g.edge_count(),
            self.skipped_segments,
        );
        self.g
    }
}

/// Converts map elements into an undirected weighted [Graph],
/// using the provided [CostModel] for edge costs.
pub fn build_graph<C: CostModel + ?Sized>(elements: &[Element], cost: &C) -> Graph {
    let mut b = GraphBuilder::new(cost);
    b.add_elements(elements);
    b.finish()
}
