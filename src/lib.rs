// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Quiet walking and driving routes over [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Raw map elements (points and ways, e.g. from an [Overpass](https://overpass-api.de/) query)
//! are turned into an undirected weighted [Graph], both route ends are snapped onto the
//! nearest graph nodes, and A* finds a low-cost path between them. Costs come from a
//! pluggable [CostModel]: either plain great-circle [Distance], or a [PenalizedDistance]
//! which adds a (noise) penalty to every road segment.
//!
//! # Example
//!
//! ```no_run
//! let options = quietroute::osm::Options::default();
//! let elements = quietroute::osm::read_elements_from_file(&options, "path/to/indore.json")
//!     .expect("failed to load map data");
//!
//! let route = quietroute::plan_route(
//!     &elements,
//!     (22.689221, 75.874243),
//!     (22.729245, 75.813475),
//!     &quietroute::PenalizedDistance::default(),
//!     quietroute::DEFAULT_STEP_LIMIT,
//! )
//! .expect("failed to find route");
//!
//! println!("Route: {:?} ({:.2} km)", route.node_ids(), route.distance);
//! ```

mod astar;
mod builder;
mod cost;
mod distance;
mod graph;
mod locate;
pub mod osm;
mod path;
mod route;

pub use astar::{find_route, AStarError, Search, Step, DEFAULT_STEP_LIMIT};
pub use builder::{build_graph, GraphBuilder};
pub use cost::{
    ConstantPenalty, CostModel, Distance, PenalizedDistance, PenaltySource, DEFAULT_PENALTY_LEVEL,
    DEFAULT_PENALTY_WEIGHT,
};
pub use distance::earth_distance;
pub use graph::Graph;
pub use locate::{find_nearest, nearest_node};
pub use path::{path_distance, reconstruct_path};
pub use route::{plan_route, Route, RouteError};

/// Represents a routable point of the [Graph].
///
/// Only map points with both coordinates become Nodes;
/// see [osm::Point::position].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Represents an outgoing connection from a specific [Node].
///
/// Every edge of a [Graph] built by [GraphBuilder] has a twin going
/// the other way with the very same `cost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub cost: f64,
}
