//! Vector tile rendering pipeline.
//!
//! Ingests geometries and typed property bags for a single `(z, x, y)` tile, runs a
//! per-feature transform pipeline, runs cross-feature layer post-processors, then encodes
//! the result as GeoJSON, TopoJSON, or MVT.
//!
//! [`feature::Feature`]/[`feature::FeatureLayer`] are the records flowing through the
//! pipeline; [`transforms`] and [`sorters`] implement the per-feature and per-layer
//! stages; [`postprocess`] implements the cross-feature layer operations; [`geoadapt`]
//! bridges to the `geo` crate for the spatial predicates this crate's own geometry type
//! does not implement.

pub mod cache;
pub mod config;
pub mod encode;
pub mod error;
pub mod feature;
pub mod geoadapt;
pub mod ingest;
pub mod pool;
pub mod postprocess;
pub mod query;
pub mod response;
pub mod sorters;
pub mod transforms;
pub mod value;

pub use cache::ColumnCache;
pub use config::{DbInfo, LayerConfig, TilesetConfig};
pub use error::{is_kind, PipelineErrorKind};
pub use feature::{Feature, FeatureLayer, TileCoord};
pub use pool::PoolCache;
pub use response::{render_tile, TileFormat, TileResponse};
