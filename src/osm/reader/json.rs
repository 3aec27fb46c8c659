// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;

use serde::Deserialize;

use super::super::model::{Element, Point, Way};

/// Top-level [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON) document.
/// A bare array of elements is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped { elements: Vec<RawElement> },
    Bare(Vec<RawElement>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawElement {
    Node {
        id: i64,
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        lon: Option<f64>,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

impl Document {
    fn into_elements(self) -> Vec<Element> {
        let raw = match self {
            Self::Wrapped { elements } => elements,
            Self::Bare(elements) => elements,
        };

        raw.into_iter()
            .filter_map(|e| match e {
                RawElement::Node { id, lat, lon } => Some(Element::Node(Point { id, lat, lon })),
                RawElement::Way { id, nodes, tags } => Some(Element::Way(Way { id, nodes, tags })),
                RawElement::Other => None,
            })
            .collect()
    }
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses all elements from an Overpass JSON stream. A leading UTF-8 BOM is skipped.
pub(super) fn read_io<R: io::BufRead>(mut reader: R) -> Result<Vec<Element>, serde_json::Error> {
    if reader.fill_buf().map_err(serde_json::Error::io)?.starts_with(BOM) {
        reader.consume(BOM.len());
    }

    let doc: Document = serde_json::from_reader(reader)?;
    Ok(doc.into_elements())
}

/// Parses all elements from an in-memory Overpass JSON document. A leading UTF-8 BOM is skipped.
pub(super) fn read_buffer(data: &[u8]) -> Result<Vec<Element>, serde_json::Error> {
    let data = data.strip_prefix(BOM).unwrap_or(data);
    let doc: Document = serde_json::from_slice(data)?;
    Ok(doc.into_elements())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_JSON: &[u8] = include_bytes!("../test_fixtures/simple.json");

    #[test]
    fn parse_overpass_document() {
        let elements = read_buffer(SIMPLE_JSON).unwrap();
        assert_eq!(elements.len(), 9);

        assert_eq!(
            elements[0],
            Element::Node(Point {
                id: 1,
                lat: Some(22.7),
                lon: Some(75.8),
            }),
        );

        // Metadata-only node, without coordinates
        assert_eq!(
            elements[5],
            Element::Node(Point {
                id: 6,
                lat: None,
                lon: None,
            }),
        );

        match &elements[6] {
            Element::Way(w) => {
                assert_eq!(w.id, 100);
                assert_eq!(w.nodes, vec![1, 2, 3]);
                assert_eq!(w.tags.get("highway").map(|s| s.as_str()), Some("residential"));
            }
            other => panic!("expected a way, got {other:?}"),
        }
    }

    #[test]
    fn parse_from_io() {
        let from_io = read_io(io::Cursor::new(SIMPLE_JSON)).unwrap();
        assert_eq!(from_io, read_buffer(SIMPLE_JSON).unwrap());
    }

    #[test]
    fn parse_bare_array() {
        let data = br#"[
            {"type": "node", "id": 1, "lat": 1.5, "lon": 2.5},
            {"type": "relation", "id": 5, "members": []},
            {"type": "way", "id": 2, "nodes": [1, 3]}
        ]"#;
        let elements = read_buffer(data).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(
            elements[1],
            Element::Way(Way {
                id: 2,
                nodes: vec![1, 3],
                tags: HashMap::default(),
            }),
        );
    }

    #[test]
    fn skip_bom() {
        let mut data = BOM.to_vec();
        data.extend_from_slice(SIMPLE_JSON);

        let expected = read_buffer(SIMPLE_JSON).unwrap();
        assert_eq!(read_buffer(&data).unwrap(), expected);
        assert_eq!(read_io(io::Cursor::new(&data)).unwrap(), expected);
    }

    #[test]
    fn invalid_document() {
        assert!(read_buffer(b"{\"elements\": 5}").is_err());
        assert!(read_buffer(b"not json").is_err());
    }
}
