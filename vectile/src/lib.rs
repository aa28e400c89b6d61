//! # vectile
//!
//! A vector map-tile generation pipeline: ingests WKB geometries and typed property bags
//! by `(z, x, y)` tile coordinate, runs a per-feature transform pipeline and layer
//! post-processors, and encodes the result to GeoJSON, TopoJSON, or MVT.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vectile_core::TileCoord;
//! use vectile_pipeline::{LayerConfig, render_tile};
//!
//! fn main() -> anyhow::Result<()> {
//!     let coord = TileCoord::new(10, 551, 341)?;
//!     let config = LayerConfig::from_yaml_file("layer.yaml")?;
//!     let response = render_tile(&coord, &config, "mvt")?;
//!     println!("rendered {} bytes", response.body.len());
//!     Ok(())
//! }
//! ```

pub use vectile_core as core;
pub use vectile_geometry as geometry;
pub use vectile_pipeline as pipeline;
