// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::Element;
use crate::{build_graph, find_nearest, find_route, path_distance, AStarError, CostModel, Node};

/// Error conditions which may occur during [plan_route].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// There is no map point with coordinates to snap the start position onto.
    #[error("no node corresponding to the start position")]
    NoStartCandidate,

    /// There is no map point with coordinates to snap the end position onto.
    #[error("no node corresponding to the end position")]
    NoEndCandidate,

    #[error(transparent)]
    Search(#[from] AStarError),
}

/// Result of [plan_route].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes along the route, from the node closest to the start position to the node
    /// closest to the end position, inclusive. Empty if there is no route.
    pub nodes: Vec<Node>,

    /// Physical length of the route, in kilometers. This is always the great-circle
    /// length, never the (possibly penalized) cost used to find the route.
    pub distance: f64,
}

impl Route {
    /// Returns `true` if a route was found.
    pub fn is_found(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Returns ids of all nodes along the route.
    pub fn node_ids(&self) -> Vec<i64> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}

/// Finds a route between two `(lat, lon)` positions over the provided map elements.
///
/// Builds a [Graph](crate::Graph) with edges weighted by `cost`, snaps both positions
/// onto the closest points (see [find_nearest]) and runs [find_route] with
/// `cost` as the heuristic.
///
/// Not finding a route is not an error; a [Route] without nodes is returned instead.
pub fn plan_route<C: CostModel + ?Sized>(
    elements: &[Element],
    start: (f64, f64),
    end: (f64, f64),
    cost: &C,
    step_limit: usize,
) -> Result<Route, RouteError> {
    let g = build_graph(elements, cost);

    let start_id = find_nearest(elements, start.0, start.1).ok_or(RouteError::NoStartCandidate)?;
    let end_id = find_nearest(elements, end.0, end.1).ok_or(RouteError::NoEndCandidate)?;
    log::debug!("snapped start to node {start_id} and end to node {end_id}");

    let path = find_route(&g, start_id, end_id, cost, step_limit)?;
    let distance = path_distance(&g, &path);
    let nodes = path.iter().filter_map(|&id| g.get_node(id)).collect::<Vec<_>>();

    if nodes.is_empty() {
        log::info!("no route between nodes {start_id} and {end_id}");
    } else {
        log::info!(
            "found route between nodes {start_id} and {end_id}: {} nodes, {distance:.2} km",
            nodes.len(),
        );
    }

    Ok(Route { nodes, distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{Point, Way};
    use crate::{Distance, PenalizedDistance, DEFAULT_STEP_LIMIT};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn point(id: i64, lat: f64, lon: f64) -> Element {
        Element::Node(Point {
            id,
            lat: Some(lat),
            lon: Some(lon),
        })
    }

    fn way(id: i64, nodes: &[i64]) -> Element {
        Element::Way(Way {
            id,
            nodes: nodes.to_vec(),
            tags: Default::default(),
        })
    }

    //  3 ─── 4
    //  │     │
    //  1 ─── 2 ─── 5    6
    fn elements() -> Vec<Element> {
        vec![
            Element::Node(Point {
                id: 100,
                lat: None,
                lon: None,
            }),
            point(1, 0.0, 0.0),
            point(2, 0.0, 0.01),
            point(3, 0.01, 0.0),
            point(4, 0.01, 0.01),
            point(5, 0.0, 0.02),
            point(6, 0.0, 0.05),
            way(10, &[1, 2, 5, 100]),
            way(11, &[1, 3, 4, 2]),
        ]
    }

    #[test]
    fn plan() {
        let route = plan_route(
            &elements(),
            (0.0001, -0.0001),
            (0.0001, 0.0201),
            &Distance,
            DEFAULT_STEP_LIMIT,
        )
        .unwrap();

        assert!(route.is_found());
        assert_eq!(route.node_ids(), vec![1, 2, 5]);
        assert_almost_eq!(route.distance, crate::earth_distance(0.0, 0.0, 0.0, 0.02));
    }

    #[test]
    fn distance_is_not_penalized() {
        let plain = plan_route(
            &elements(),
            (0.0, 0.0),
            (0.01, 0.01),
            &Distance,
            DEFAULT_STEP_LIMIT,
        )
        .unwrap();

        let quiet = plan_route(
            &elements(),
            (0.0, 0.0),
            (0.01, 0.01),
            &PenalizedDistance::default(),
            DEFAULT_STEP_LIMIT,
        )
        .unwrap();

        assert_eq!(plain.nodes.len(), 3);
        assert_eq!(quiet.nodes.len(), 3);
        assert_almost_eq!(plain.distance, path_distance_of(&plain));
        assert_almost_eq!(quiet.distance, path_distance_of(&quiet));
    }

    fn path_distance_of(r: &Route) -> f64 {
        r.nodes
            .windows(2)
            .map(|p| crate::earth_distance(p[0].lat, p[0].lon, p[1].lat, p[1].lon))
            .sum()
    }

    #[test]
    fn same_start_and_end() {
        let route = plan_route(
            &elements(),
            (0.01, 0.0),
            (0.0101, 0.0001),
            &Distance,
            DEFAULT_STEP_LIMIT,
        )
        .unwrap();
        assert_eq!(route.node_ids(), vec![3]);
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn unreachable() {
        let route = plan_route(
            &elements(),
            (0.0, 0.0),
            (0.0, 0.05),
            &Distance,
            DEFAULT_STEP_LIMIT,
        )
        .unwrap();
        assert!(!route.is_found());
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn no_candidates() {
        let elements = vec![Element::Node(Point {
            id: 1,
            lat: None,
            lon: None,
        })];
        assert_eq!(
            plan_route(&elements, (0.0, 0.0), (1.0, 1.0), &Distance, DEFAULT_STEP_LIMIT),
            Err(RouteError::NoStartCandidate),
        );
        assert_eq!(
            plan_route(&[], (0.0, 0.0), (1.0, 1.0), &Distance, DEFAULT_STEP_LIMIT),
            Err(RouteError::NoStartCandidate),
        );
    }

    #[test]
    fn no_end_candidate() {
        // NaN is never closer than any point
        assert_eq!(
            plan_route(&elements(), (0.0, 0.0), (f64::NAN, 0.0), &Distance, DEFAULT_STEP_LIMIT),
            Err(RouteError::NoEndCandidate),
        );
        assert_eq!(
            plan_route(&elements(), (0.0, f64::NAN), (0.0, 0.0), &Distance, DEFAULT_STEP_LIMIT),
            Err(RouteError::NoStartCandidate),
        );
    }

    #[test]
    fn step_limit() {
        assert_eq!(
            plan_route(&elements(), (0.0, 0.0), (0.0, 0.02), &Distance, 0),
            Err(RouteError::Search(AStarError::StepLimitExceeded)),
        );
    }
}
