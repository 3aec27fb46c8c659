// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Node;
use std::collections::HashMap;

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node) as returned by a map
/// data source. Coordinates may be missing (e.g. for metadata-only elements); such points
/// are never added to a [Graph](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Point {
    /// Returns the graph [Node] of this point, provided both coordinates are present and finite.
    pub fn position(&self) -> Option<Node> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Node {
                id: self.id,
                lat,
                lon,
            }),
            _ => None,
        }
    }
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// Map elements relevant for routing. Other [OSM elements](https://wiki.openstreetmap.org/wiki/Elements)
/// (like relations) are skipped when reading map data.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(Point),
    Way(Way),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position() {
        let p = Point {
            id: 1,
            lat: Some(22.7),
            lon: Some(75.8),
        };
        assert_eq!(
            p.position(),
            Some(Node {
                id: 1,
                lat: 22.7,
                lon: 75.8
            })
        );

        let p = Point {
            id: 1,
            lat: Some(22.7),
            lon: None,
        };
        assert_eq!(p.position(), None);

        let p = Point {
            id: 1,
            lat: Some(f64::NAN),
            lon: Some(75.8),
        };
        assert_eq!(p.position(), None);
    }
}
