//! Minimal JSON value tree, parser, and compact stringifier.
//!
//! Used by the GeoJSON and TopoJSON encoders to build and emit wire documents without
//! pulling in a full `serde_json` dependency for what is, at this layer, a handful of
//! fixed document shapes.

mod parse;
mod read;
mod stringify;
mod types;

pub use parse::parse_json;
pub use read::read_ndjson;
pub use stringify::json_as_string;
pub use types::JsonValue;

pub type JsonObject = std::collections::BTreeMap<String, JsonValue>;
pub type JsonArray = Vec<JsonValue>;
