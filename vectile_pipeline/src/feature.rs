//! The in-pipeline feature record and its containing layer.
//!
//! Kept distinct from `vectile_geometry::geo::GeoFeature` (the MVT-wire feature,
//! whose `id` is an unsigned tag index) because a pipeline `fid` may be negative
//! — a negative numeric id denotes an OSM relation (§4.2 `detect_osm_relation`).

use anyhow::{bail, Result};
use vectile_geometry::geo::{GeoFeature, GeoProperties, Geometry};

/// A geometry, its property bag, and an optional signed feature id, flowing through
/// the transform pipeline.
#[derive(Clone, Debug)]
pub struct Feature {
	pub geometry: Geometry,
	pub properties: GeoProperties,
	pub fid: Option<i64>,
}

impl Feature {
	pub fn new(geometry: Geometry) -> Self {
		Feature { geometry, properties: GeoProperties::new(), fid: None }
	}

	/// Converts this feature into the wire-ready `GeoFeature`, for encoders that
	/// require an unsigned id (MVT). A negative `fid` is dropped rather than
	/// truncated — callers that need it preserved should run `add_id_to_properties`
	/// first, which copies `fid` into `properties.id` before encoding.
	pub fn into_wire_feature(self) -> GeoFeature {
		let mut feature = GeoFeature::new(self.geometry);
		feature.set_properties(self.properties);
		if let Some(fid) = self.fid {
			if let Ok(id) = u64::try_from(fid) {
				feature.set_id(id);
			}
		}
		feature
	}
}

/// An ordered list of [`Feature`]s sharing a layer name. Order is significant: it
/// defines draw/label precedence and is preserved by all pipeline stages except
/// those that explicitly re-sort (§3).
#[derive(Clone, Debug, Default)]
pub struct FeatureLayer {
	pub name: String,
	pub features: Vec<Feature>,
}

impl FeatureLayer {
	pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
		FeatureLayer { name: name.into(), features }
	}
}

/// A slippy-map tile coordinate in spherical mercator at tile extent 256 CSS pixels (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
	pub z: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	pub fn new(z: u8, x: u32, y: u32) -> Result<Self> {
		if z > 22 {
			bail!("zoom {z} out of range [0,22]");
		}
		Ok(TileCoord { z, x, y })
	}
}

impl std::fmt::Display for TileCoord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}/{}", self.z, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tile_coord_rejects_out_of_range_zoom() {
		assert!(TileCoord::new(23, 0, 0).is_err());
		assert!(TileCoord::new(22, 0, 0).is_ok());
	}

	#[test]
	fn into_wire_feature_drops_negative_fid() {
		let mut f = Feature::new(Geometry::new_example());
		f.fid = Some(-5);
		let wire = f.into_wire_feature();
		assert_eq!(wire.id, None);
	}

	#[test]
	fn into_wire_feature_keeps_positive_fid() {
		let mut f = Feature::new(Geometry::new_example());
		f.fid = Some(42);
		let wire = f.into_wire_feature();
		assert_eq!(wire.id, Some(42));
	}
}
