//! GeoJSON encoder/decoder (§4.5).
//!
//! Per-feature precision rounding is already implemented by
//! [`vectile_geometry::geo::GeoFeature::to_json`]/`Geometry::to_coord_json`; this module
//! supplies the `precision[zoom]` formula, assembles the `FeatureCollection`, and
//! serializes it compactly via [`vectile_core::json::json_as_string`].

use crate::feature::FeatureLayer;
use crate::geoadapt::geometry_to_mercator;
use anyhow::{Context, Result};
use log::trace;
use vectile_core::json::{json_as_string, parse_json, JsonObject, JsonValue};
use vectile_geometry::geo::{GeoProperties, GeoValue, Geometry};

/// `precision[z] = ceil(log10(1 << (z+8+2))) − 2` (§4.5).
#[must_use]
pub fn precision_for_zoom(zoom: u8) -> u8 {
	let bits = u32::from(zoom) + 8 + 2;
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	let precision = ((2f64.powi(bits as i32)).log10().ceil() as i32 - 2).max(0);
	precision as u8
}

/// Encodes every feature across `layers` as a single (not per-layer) compact GeoJSON
/// `FeatureCollection`, rounding coordinates to `precision[zoom]` digits.
pub fn encode(layers: &[FeatureLayer], zoom: u8, project_to_mercator: bool) -> Result<String> {
	let precision = precision_for_zoom(zoom);
	trace!("encoding {} layers as GeoJSON at zoom {zoom} (precision {precision})", layers.len());
	let mut features_json = Vec::new();

	for layer in layers {
		for feature in &layer.features {
			let mut wire = feature.clone().into_wire_feature();
			if project_to_mercator {
				wire.geometry = geometry_to_mercator(&wire.geometry);
			}
			features_json.push(wire.to_json(Some(precision)));
		}
	}

	let mut obj = JsonObject::new();
	obj.insert("type".to_string(), JsonValue::from("FeatureCollection"));
	obj.insert("features".to_string(), JsonValue::from(features_json));
	json_as_string(&JsonValue::Object(obj)).context("failed to serialize GeoJSON FeatureCollection")
}

fn as_str(json: &JsonValue) -> Option<&str> {
	match json {
		JsonValue::Str(s) => Some(s.as_str()),
		_ => None,
	}
}

fn as_f64(json: &JsonValue) -> Option<f64> {
	match json {
		JsonValue::Num(n) => Some(*n),
		_ => None,
	}
}

fn coord_pair(json: &JsonValue) -> Option<[f64; 2]> {
	let arr = json.as_array().ok()?;
	Some([as_f64(arr.first()?)?, as_f64(arr.get(1)?)?])
}

fn coord_list(json: &JsonValue) -> Option<Vec<[f64; 2]>> {
	json.as_array().ok()?.iter().map(coord_pair).collect()
}

fn coord_list_list(json: &JsonValue) -> Option<Vec<Vec<[f64; 2]>>> {
	json.as_array().ok()?.iter().map(coord_list).collect()
}

fn coord_list_list_list(json: &JsonValue) -> Option<Vec<Vec<Vec<[f64; 2]>>>> {
	json.as_array().ok()?.iter().map(coord_list_list).collect()
}

/// Parses a single RFC 7946 `Geometry` object into our [`Geometry`]. Returns `None` for
/// `GeometryCollection` (skipped by [`decode`]) and any malformed entry.
fn geometry_from_json(json: &JsonValue) -> Option<Geometry> {
	let JsonValue::Object(obj) = json else { return None };
	let kind = as_str(obj.get("type")?)?;
	let coords = obj.get("coordinates");
	match kind {
		"Point" => Some(Geometry::new_point(coord_pair(coords?)?)),
		"LineString" => Some(Geometry::new_line_string(coord_list(coords?)?)),
		"Polygon" => Some(Geometry::new_polygon(coord_list_list(coords?)?)),
		"MultiPoint" => Some(Geometry::new_multi_point(coord_list(coords?)?)),
		"MultiLineString" => Some(Geometry::new_multi_line_string(coord_list_list(coords?)?)),
		"MultiPolygon" => Some(Geometry::new_multi_polygon(coord_list_list_list(coords?)?)),
		_ => None,
	}
}

fn properties_from_json(json: &JsonValue) -> GeoProperties {
	let JsonValue::Object(obj) = json else { return GeoProperties::new() };
	let mut properties = GeoProperties::new();
	for (key, value) in obj {
		let geo_value = match value {
			JsonValue::Str(s) => GeoValue::from(s.as_str()),
			JsonValue::Num(n) => GeoValue::from(*n),
			JsonValue::Boolean(b) => GeoValue::from(*b),
			JsonValue::Null => GeoValue::Null,
			_ => continue,
		};
		properties.insert(key.clone(), geo_value);
	}
	properties
}

/// Decodes a GeoJSON `FeatureCollection`. Non-`Feature` entries (and `GeometryCollection`
/// geometries) are skipped; each surviving feature's geometry is projected to mercator.
/// Returns `(geometry, properties)` pairs.
pub fn decode(text: &str) -> Result<Vec<(Geometry, GeoProperties)>> {
	let json = parse_json(text).context("failed to parse GeoJSON")?;
	let JsonValue::Object(obj) = &json else {
		anyhow::bail!("GeoJSON root is not an object");
	};
	let Some(JsonValue::Array(features)) = obj.get("features") else {
		anyhow::bail!("GeoJSON FeatureCollection has no `features` array");
	};

	let mut out = Vec::new();
	for entry in features {
		let JsonValue::Object(feature_obj) = entry else { continue };
		if feature_obj.get("type").and_then(as_str) != Some("Feature") {
			continue;
		}
		let Some(geometry_json) = feature_obj.get("geometry") else { continue };
		let Some(geometry) = geometry_from_json(geometry_json) else { continue };
		let properties = feature_obj.get("properties").map(properties_from_json).unwrap_or_default();
		out.push((geometry_to_mercator(&geometry), properties));
	}
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::feature::Feature;

	#[test]
	fn precision_matches_s1_scenario() {
		assert_eq!(precision_for_zoom(0), 2);
	}

	#[test]
	fn encode_rounds_to_zoom_precision() {
		let feature = Feature::new(Geometry::new_point([1.234_567, 2.345_678]));
		let layer = FeatureLayer::new("points", vec![feature]);
		let json = encode(&[layer], 0, false).unwrap();
		assert!(json.contains("[1.23,2.35]"), "unexpected json: {json}");
	}

	#[test]
	fn encode_produces_exact_compact_feature_collection() {
		use pretty_assertions::assert_eq;
		let feature = Feature::new(Geometry::new_point([1.0, 2.0]));
		let layer = FeatureLayer::new("points", vec![feature]);
		let json = encode(&[layer], 10, false).unwrap();
		// JsonObject is a BTreeMap, so keys serialize in sorted order, not insertion order.
		let expected = r#"{"features":[{"geometry":{"coordinates":[1,2],"type":"Point"},"properties":{},"type":"Feature"}],"type":"FeatureCollection"}"#;
		assert_eq!(json, expected);
	}

	#[test]
	fn decode_skips_non_feature_entries() {
		let text = r#"{"type":"FeatureCollection","features":[
			{"type":"GeometryCollection","geometries":[]},
			{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"name":"x"}}
		]}"#;
		let decoded = decode(text).unwrap();
		assert_eq!(decoded.len(), 1);
	}
}
