//! Output encoders (§4.5-§4.7): GeoJSON, TopoJSON, MVT.

pub mod geojson;
pub mod mvt;
pub mod topojson;
