// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use super::model::Element;

mod json;
mod xml;

/// Keys of way tags used by [Options::default] - only ways with any
/// of these keys are used for routing.
pub const DEFAULT_WAY_TAGS: &[&str] = &["highway"];

/// Format of the input map data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON)
    Json,

    /// Force [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

/// Additional controls for reading map data.
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter points by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite. Points without coordinates are always kept.
    pub bbox: [f64; 4],

    /// Only keep ways with at least one of those tag keys. An empty slice keeps all ways.
    pub way_tags: &'a [&'a str],
}

impl Default for Options<'static> {
    fn default() -> Self {
        Self {
            file_format: FileFormat::Unknown,
            bbox: [0.0; 4],
            way_tags: DEFAULT_WAY_TAGS,
        }
    }
}

impl<'a> Options<'a> {
    fn ignore_bbox(&self) -> bool {
        self.bbox.iter().all(|&x| x == 0.0) || self.bbox.iter().any(|x| !x.is_finite())
    }

    fn is_in_bbox(&self, lat: f64, lon: f64) -> bool {
        let [min_lon, min_lat, max_lon, max_lat] = self.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    /// Checks whether an element passes the bbox and way tag filters.
    fn accepts(&self, e: &Element, ignore_bbox: bool) -> bool {
        match e {
            Element::Node(p) => match (p.lat, p.lon) {
                (Some(lat), Some(lon)) if !ignore_bbox => self.is_in_bbox(lat, lon),
                _ => true,
            },
            Element::Way(w) => {
                self.way_tags.is_empty() || self.way_tags.iter().any(|&k| w.tags.contains_key(k))
            }
        }
    }

    fn filter(&self, mut elements: Vec<Element>) -> Vec<Element> {
        let ignore_bbox = self.ignore_bbox();
        let before = elements.len();
        elements.retain(|e| self.accepts(e, ignore_bbox));
        log::debug!(
            "read {} elements ({} filtered out)",
            elements.len(),
            before - elements.len(),
        );
        elements
    }
}

/// Error which can occur when reading map data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unrecognized file format (expected JSON or XML, optionally gzip or bzip2 compressed)")]
    UnknownFormat,
}

/// Result of peeking at the first bytes of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sniffed {
    Gzip,
    Bzip2,
    Json,
    Xml,
    Unknown,
}

fn sniff(head: &[u8]) -> Sniffed {
    if head.starts_with(&[0x1f, 0x8b]) {
        return Sniffed::Gzip;
    } else if head.starts_with(b"BZh") {
        return Sniffed::Bzip2;
    }

    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    match head.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => Sniffed::Json,
        Some(b'<') => Sniffed::Xml,
        _ => Sniffed::Unknown,
    }
}

fn read_json<R: io::Read>(reader: R) -> Result<Vec<Element>, Error> {
    Ok(json::read_io(io::BufReader::new(reader))?)
}

fn read_xml<R: io::Read>(reader: R) -> Result<Vec<Element>, Error> {
    let r = xml::Reader::from_io(io::BufReader::new(reader));
    Ok(r.collect::<Result<Vec<_>, _>>()?)
}

fn read_guessed<R: BufRead>(mut reader: R) -> Result<Vec<Element>, Error> {
    let kind = sniff(reader.fill_buf()?);
    match kind {
        Sniffed::Gzip => read_guessed_plain(io::BufReader::new(
            flate2::read::MultiGzDecoder::new(reader),
        )),
        Sniffed::Bzip2 => read_guessed_plain(io::BufReader::new(
            bzip2::read::MultiBzDecoder::new(reader),
        )),
        _ => read_guessed_plain(reader),
    }
}

fn read_guessed_plain<R: BufRead>(mut reader: R) -> Result<Vec<Element>, Error> {
    let kind = sniff(reader.fill_buf()?);
    match kind {
        Sniffed::Json => read_json(reader),
        Sniffed::Xml => read_xml(reader),
        _ => Err(Error::UnknownFormat),
    }
}

/// Parse map elements from a reader as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn read_elements_from_io<R: io::Read>(
    options: &Options<'_>,
    reader: R,
) -> Result<Vec<Element>, Error> {
    let elements = match options.file_format {
        FileFormat::Unknown => read_guessed(io::BufReader::new(reader))?,
        FileFormat::Json => read_json(reader)?,
        FileFormat::JsonGz => read_json(flate2::read::MultiGzDecoder::new(reader))?,
        FileFormat::JsonBz2 => read_json(bzip2::read::MultiBzDecoder::new(reader))?,
        FileFormat::Xml => read_xml(reader)?,
        FileFormat::XmlGz => read_xml(flate2::read::MultiGzDecoder::new(reader))?,
        FileFormat::XmlBz2 => read_xml(bzip2::read::MultiBzDecoder::new(reader))?,
    };
    Ok(options.filter(elements))
}

/// Parse map elements from a file at the provided path as per the provided [Options].
pub fn read_elements_from_file<P: AsRef<Path>>(
    options: &Options<'_>,
    path: P,
) -> Result<Vec<Element>, Error> {
    let f = File::open(path)?;
    read_elements_from_io(options, f)
}

/// Parse map elements from an in-memory buffer as per the provided [Options].
pub fn read_elements_from_buffer(options: &Options<'_>, data: &[u8]) -> Result<Vec<Element>, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => match sniff(data) {
            Sniffed::Json => FileFormat::Json,
            Sniffed::Xml => FileFormat::Xml,
            _ => FileFormat::Unknown,
        },
        f => f,
    };

    // Fast paths are available for uncompressed in-memory data
    let elements = match format {
        FileFormat::Json => json::read_buffer(data)?,
        FileFormat::Xml => xml::Reader::from_buffer(data).collect::<Result<Vec<_>, _>>()?,
        _ => return read_elements_from_io(options, io::Cursor::new(data)),
    };
    Ok(options.filter(elements))
}
