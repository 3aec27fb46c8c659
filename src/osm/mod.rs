// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading map data: [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON) or
//! [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) documents, optionally compressed,
//! turned into a list of routing-relevant [Elements](Element).

mod model;
mod query;
mod reader;

pub use model::{Element, Point, Way};
pub use query::{bbox_around, overpass_query};
pub use reader::{
    read_elements_from_buffer, read_elements_from_file, read_elements_from_io, Error, FileFormat,
    Options, DEFAULT_WAY_TAGS,
};
