// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt::Write;

/// Returns the bounding box spanned by two `(lat, lon)` positions,
/// in the [Options::bbox](super::Options::bbox) order: left (min lon), bottom (min lat),
/// right (max lon), top (max lat).
pub fn bbox_around(start: (f64, f64), end: (f64, f64)) -> [f64; 4] {
    [
        start.1.min(end.1),
        start.0.min(end.0),
        start.1.max(end.1),
        start.0.max(end.0),
    ]
}

/// Builds an [Overpass QL](https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL) query
/// for all ways inside of `bbox` tagged with any of the `way_tags` keys (or all ways, if
/// `way_tags` is empty), together with all of their nodes, in the JSON output format.
///
/// The query can be sent to any Overpass API instance, e.g. <https://overpass-api.de/api/interpreter>,
/// and the response read with [read_elements_from_io](super::read_elements_from_io).
pub fn overpass_query(bbox: [f64; 4], way_tags: &[&str]) -> String {
    let [west, south, east, north] = bbox;
    let mut q = String::from("[out:json];\n(\n");

    if way_tags.is_empty() {
        _ = writeln!(q, "  way({south},{west},{north},{east});");
    } else {
        for key in way_tags {
            _ = writeln!(q, "  way({south},{west},{north},{east})[{key}];");
        }
    }

    q.push_str("  >;\n);\nout body;\n");
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox() {
        assert_eq!(
            bbox_around((22.689221, 75.874243), (22.729245, 75.813475)),
            [75.813475, 22.689221, 75.874243, 22.729245],
        );
    }

    #[test]
    fn query() {
        let bbox = [75.8, 22.6, 75.9, 22.7];
        assert_eq!(
            overpass_query(bbox, &["highway"]),
            "[out:json];\n(\n  way(22.6,75.8,22.7,75.9)[highway];\n  >;\n);\nout body;\n",
        );
        assert_eq!(
            overpass_query(bbox, &[]),
            "[out:json];\n(\n  way(22.6,75.8,22.7,75.9);\n  >;\n);\nout body;\n",
        );
    }
}
