//! Geometric data structures and utilities for the vector tile generation pipeline.
//!
//! It includes modules for:
//! - `geo`: core geometry primitives and traits (e.g., `Point`, `Polygon`, etc.).
//! - `vector_tile`: support for reading and writing Mapbox Vector Tile (MVT) protobuf data.
//!
//! These modules form the geometric backbone for transforming and encoding geospatial
//! data pulled from a feature store into map tiles.

pub mod geo;
pub mod math;
pub mod vector_tile;
