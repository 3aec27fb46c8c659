// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::Element;
use crate::{earth_distance, Node};

/// Finds the [Node] closest to the given position.
///
/// This function computes the distance to every provided node, and is not suitable
/// for very large datasets. On ties, the first node (in iteration order) wins.
/// Returns `None` if `nodes` is empty.
pub fn nearest_node<I: IntoIterator<Item = Node>>(nodes: I, lat: f64, lon: f64) -> Option<Node> {
    let mut best: Option<Node> = None;
    let mut best_dist = f64::INFINITY;

    for nd in nodes {
        let dist = earth_distance(lat, lon, nd.lat, nd.lon);
        if dist < best_dist {
            best = Some(nd);
            best_dist = dist;
        }
    }

    best
}

/// Finds the id of the map point closest to the given position.
///
/// Elements other than points, and points without coordinates, are skipped.
/// On ties, the point appearing first in `elements` wins. Returns `None`
/// if there is no point with coordinates at all; callers must not start
/// a route search in this case.
pub fn find_nearest<'a, I>(elements: I, lat: f64, lon: f64) -> Option<i64>
where
    I: IntoIterator<Item = &'a Element>,
{
    let positions = elements.into_iter().filter_map(|e| match e {
        Element::Node(p) => p.position(),
        _ => None,
    });
    nearest_node(positions, lat, lon).map(|nd| nd.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{Point, Way};

    fn point(id: i64, lat: f64, lon: f64) -> Element {
        Element::Node(Point {
            id,
            lat: Some(lat),
            lon: Some(lon),
        })
    }

    fn elements() -> Vec<Element> {
        vec![
            point(1, 0.01, 0.01),
            point(2, 0.01, 0.05),
            point(3, 0.03, 0.09),
            Element::Node(Point {
                id: 4,
                lat: None,
                lon: None,
            }),
            point(5, 0.04, 0.07),
            Element::Way(Way {
                id: 6,
                nodes: vec![1, 2, 3],
                tags: Default::default(),
            }),
            point(8, 0.08, 0.05),
        ]
    }

    #[test]
    fn nearest() {
        let e = elements();
        assert_eq!(find_nearest(&e, 0.02, 0.02), Some(1));
        assert_eq!(find_nearest(&e, 0.05, 0.08), Some(5));
        assert_eq!(find_nearest(&e, 0.09, 0.06), Some(8));
        assert_eq!(find_nearest(&e, 0.01, 0.05), Some(2));
    }

    #[test]
    fn idempotent() {
        let e = elements();
        let first = find_nearest(&e, 0.035, 0.08);
        assert_eq!(first, find_nearest(&e, 0.035, 0.08));
    }

    #[test]
    fn first_minimum_wins() {
        let e = vec![point(7, 0.0, 0.01), point(3, 0.0, -0.01), point(5, 0.0, 0.01)];
        assert_eq!(find_nearest(&e, 0.0, 0.0), Some(7));

        let e = vec![point(3, 0.0, -0.01), point(7, 0.0, 0.01)];
        assert_eq!(find_nearest(&e, 0.0, 0.0), Some(3));
    }

    #[test]
    fn no_candidates() {
        assert_eq!(find_nearest(&[], 0.0, 0.0), None);

        let e = vec![Element::Node(Point {
            id: 1,
            lat: Some(1.0),
            lon: None,
        })];
        assert_eq!(find_nearest(&e, 0.0, 0.0), None);
    }

    #[test]
    fn nearest_node_over_nodes() {
        let nodes = [
            Node {
                id: 1,
                lat: 10.0,
                lon: 10.0,
            },
            Node {
                id: 2,
                lat: 10.5,
                lon: 10.5,
            },
        ];
        assert_eq!(nearest_node(nodes, 10.4, 10.4).map(|n| n.id), Some(2));
        assert_eq!(nearest_node([], 10.4, 10.4), None);
    }
}
