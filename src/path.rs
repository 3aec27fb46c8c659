// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{earth_distance, Graph};

/// Walks the `came_from` predecessor chain back from `last` to a node without
/// a predecessor, and returns the visited nodes in the start-to-`last` order.
pub fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Calculates the physical length of a path, in kilometers, as the sum of great-circle
/// distances between consecutive nodes.
///
/// This is always the raw distance, regardless of the [CostModel](crate::CostModel)
/// used to find the path. Consecutive nodes missing from the graph contribute nothing.
pub fn path_distance(g: &Graph, path: &[i64]) -> f64 {
    path.windows(2)
        .filter_map(|pair| match (g.get_node(pair[0]), g.get_node(pair[1])) {
            (Some(a), Some(b)) => Some(earth_distance(a.lat, a.lon, b.lat, b.lon)),
            _ => None,
        })
        .sum()
}
