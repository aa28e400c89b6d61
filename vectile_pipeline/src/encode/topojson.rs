//! TopoJSON encoder (§4.6): shared arc table, delta encoding, multi-input merge.

use crate::error::PipelineErrorKind;
use crate::feature::FeatureLayer;
use anyhow::{Context, Result};
use log::warn;
use vectile_core::json::{json_as_string, JsonObject, JsonValue};
use vectile_geometry::geo::Geometry;

/// `translate`/`scale` pair mapping quantized integer grid coordinates back to the
/// original bounds, at a `size`×`size` quantization grid (§4.6).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub translate: (f64, f64),
	pub scale: (f64, f64),
}

impl Transform {
	#[must_use]
	pub fn from_bounds(bounds: [f64; 4], size: f64) -> Self {
		let [minx, miny, maxx, maxy] = bounds;
		let sx = if maxx > minx { (maxx - minx) / size } else { 1.0 };
		let sy = if maxy > miny { (maxy - miny) / size } else { 1.0 };
		Transform { translate: (minx, miny), scale: (sx, sy) }
	}

	fn forward(&self, x: f64, y: f64) -> (i64, i64) {
		#[allow(clippy::cast_possible_truncation)]
		let qx = ((x - self.translate.0) / self.scale.0).round() as i64;
		#[allow(clippy::cast_possible_truncation)]
		let qy = ((y - self.translate.1) / self.scale.1).round() as i64;
		(qx, qy)
	}

	fn approx_eq(&self, other: &Transform) -> bool {
		const EPS: f64 = 1e-9;
		(self.translate.0 - other.translate.0).abs() < EPS
			&& (self.translate.1 - other.translate.1).abs() < EPS
			&& (self.scale.0 - other.scale.0).abs() < EPS
			&& (self.scale.1 - other.scale.1).abs() < EPS
	}
}

/// Delta-encodes a quantized coordinate sequence: the first point is absolute,
/// every subsequent point is `(dx, dy)` from the previous one, and zero-delta
/// entries are omitted.
fn diff_encode(points: &[(i64, i64)]) -> Vec<(i64, i64)> {
	let mut out = Vec::with_capacity(points.len());
	let mut prev: Option<(i64, i64)> = None;
	for &(x, y) in points {
		match prev {
			None => out.push((x, y)),
			Some((px, py)) => {
				let (dx, dy) = (x - px, y - py);
				if dx != 0 || dy != 0 {
					out.push((dx, dy));
				}
			}
		}
		prev = Some((x, y));
	}
	out
}

/// The global shared-arc table being built for a tile's worth of layers.
#[derive(Default)]
struct ArcTable {
	arcs: Vec<Vec<(i64, i64)>>,
}

impl ArcTable {
	fn push_line(&mut self, transform: &Transform, coords: &[vectile_geometry::geo::Coordinates]) -> usize {
		let quantized: Vec<(i64, i64)> = coords.iter().map(|c| transform.forward(c.x(), c.y())).collect();
		self.arcs.push(diff_encode(&quantized));
		self.arcs.len() - 1
	}
}

fn line_json(table: &mut ArcTable, transform: &Transform, coords: &[vectile_geometry::geo::Coordinates]) -> JsonValue {
	let idx = table.push_line(transform, coords);
	#[allow(clippy::cast_precision_loss)]
	let idx_val = idx as f64;
	let mut obj = JsonObject::new();
	obj.insert("type".to_string(), JsonValue::from("LineString"));
	obj.insert("arcs".to_string(), JsonValue::Array(vec![JsonValue::Num(idx_val)]));
	JsonValue::Object(obj)
}

fn ring_arc_index(table: &mut ArcTable, transform: &Transform, ring: &vectile_geometry::geo::RingGeometry) -> JsonValue {
	#[allow(clippy::cast_precision_loss)]
	let idx = table.push_line(transform, &ring.0) as f64;
	JsonValue::Num(idx)
}

fn geometry_json(table: &mut ArcTable, transform: &Transform, geometry: &Geometry) -> JsonValue {
	let mut obj = JsonObject::new();
	match geometry {
		Geometry::Point(p) => {
			obj.insert("type".to_string(), JsonValue::from("Point"));
			obj.insert("coordinates".to_string(), JsonValue::from([p.0.x(), p.0.y()]));
		}
		Geometry::MultiPoint(mp) => {
			obj.insert("type".to_string(), JsonValue::from("MultiPoint"));
			let coords = mp.0.iter().map(|p| JsonValue::from([p.0.x(), p.0.y()])).collect();
			obj.insert("coordinates".to_string(), JsonValue::Array(coords));
		}
		Geometry::LineString(line) => return line_json(table, transform, &line.0),
		Geometry::LinearRing(ring) => return line_json(table, transform, &ring.0),
		Geometry::MultiLineString(mls) => {
			obj.insert("type".to_string(), JsonValue::from("MultiLineString"));
			let arcs = mls
				.0
				.iter()
				.map(|l| {
					#[allow(clippy::cast_precision_loss)]
					let idx = table.push_line(transform, &l.0) as f64;
					JsonValue::Array(vec![JsonValue::Num(idx)])
				})
				.collect();
			obj.insert("arcs".to_string(), JsonValue::Array(arcs));
		}
		Geometry::Polygon(polygon) => {
			obj.insert("type".to_string(), JsonValue::from("Polygon"));
			let rings = polygon.0.iter().map(|ring| ring_arc_index(table, transform, ring)).collect();
			obj.insert("arcs".to_string(), JsonValue::Array(vec![JsonValue::Array(rings)]));
		}
		Geometry::MultiPolygon(mp) => {
			obj.insert("type".to_string(), JsonValue::from("MultiPolygon"));
			let polys = mp
				.0
				.iter()
				.map(|polygon| JsonValue::Array(polygon.0.iter().map(|ring| ring_arc_index(table, transform, ring)).collect()))
				.collect();
			obj.insert("arcs".to_string(), JsonValue::Array(polys));
		}
		Geometry::GeometryCollection(parts) => {
			obj.insert("type".to_string(), JsonValue::from("GeometryCollection"));
			let geometries = parts.iter().map(|g| geometry_json(table, transform, g)).collect();
			obj.insert("geometries".to_string(), JsonValue::Array(geometries));
		}
	}
	JsonValue::Object(obj)
}

fn transform_json(transform: &Transform) -> JsonValue {
	let mut obj = JsonObject::new();
	obj.insert("scale".to_string(), JsonValue::from([transform.scale.0, transform.scale.1]));
	obj.insert("translate".to_string(), JsonValue::from([transform.translate.0, transform.translate.1]));
	JsonValue::Object(obj)
}

/// Encodes `layers` (each becoming one named object in `objects`) as a single TopoJSON
/// `Topology` wrapped in a `"vectile"` object (§6), quantized over `bounds` at `size`.
pub fn encode(layers: &[FeatureLayer], bounds: [f64; 4], size: f64) -> Result<String> {
	let transform = Transform::from_bounds(bounds, size);
	let mut table = ArcTable::default();

	let mut objects = JsonObject::new();
	for layer in layers {
		let geometries: Vec<JsonValue> = layer
			.features
			.iter()
			.map(|f| {
				let mut g = geometry_json(&mut table, &transform, &f.geometry);
				if let JsonValue::Object(obj) = &mut g {
					obj.insert("properties".to_string(), f.properties.to_json());
				}
				g
			})
			.collect();
		let mut collection = JsonObject::new();
		collection.insert("type".to_string(), JsonValue::from("GeometryCollection"));
		collection.insert("geometries".to_string(), JsonValue::Array(geometries));
		objects.insert(layer.name.clone(), JsonValue::Object(collection));
	}

	let arcs: Vec<JsonValue> = table
		.arcs
		.iter()
		.map(|arc| {
			#[allow(clippy::cast_precision_loss)]
			JsonValue::Array(arc.iter().map(|&(dx, dy)| JsonValue::from([dx as f64, dy as f64])).collect())
		})
		.collect();

	let mut vectile = JsonObject::new();
	vectile.insert("type".to_string(), JsonValue::from("Topology"));
	vectile.insert("transform".to_string(), transform_json(&transform));
	vectile.insert("objects".to_string(), JsonValue::Object(objects));
	vectile.insert("arcs".to_string(), JsonValue::Array(arcs));

	let mut root = JsonObject::new();
	root.insert("vectile".to_string(), JsonValue::Object(vectile));
	json_as_string(&JsonValue::Object(root)).context("failed to serialize TopoJSON topology")
}

/// A decoded topology ready for merging: its transform plus the raw `objects`/`arcs`
/// JSON, taken verbatim from one `encode` call.
pub struct Topology {
	pub transform: Transform,
	pub objects: JsonObject,
	pub arcs: Vec<JsonValue>,
}

/// Merges multiple topologies sharing a single arc list, rewriting arc indexes by the
/// offset of each input's arcs within the merged list. All inputs must share the same
/// `transform` (§8 S6 scenario); a mismatch is a fatal [`PipelineErrorKind::Encoder`].
pub fn merge(inputs: Vec<Topology>) -> Result<String> {
	let first = inputs.first().context("merge requires at least one topology").map_err(|e| e.context(PipelineErrorKind::Config))?;
	let transform = first.transform;

	let mut merged_arcs = Vec::new();
	let mut objects = JsonObject::new();
	for topo in &inputs {
		if !topo.transform.approx_eq(&transform) {
			warn!("rejecting topology merge: transform {:?} does not match first input's {transform:?}", topo.transform);
			return Err(anyhow::anyhow!("mismatched TopoJSON transforms across merge inputs").context(PipelineErrorKind::Encoder));
		}
		let offset = merged_arcs.len();
		merged_arcs.extend(topo.arcs.iter().cloned());
		for (name, geom) in &topo.objects {
			objects.insert(name.clone(), rewrite_arc_indexes(geom, offset));
		}
	}

	let mut vectile = JsonObject::new();
	vectile.insert("type".to_string(), JsonValue::from("Topology"));
	vectile.insert("transform".to_string(), transform_json(&transform));
	vectile.insert("objects".to_string(), JsonValue::Object(objects));
	vectile.insert("arcs".to_string(), JsonValue::Array(merged_arcs));

	let mut root = JsonObject::new();
	root.insert("vectile".to_string(), JsonValue::Object(vectile));
	json_as_string(&JsonValue::Object(root)).context("failed to serialize merged TopoJSON topology")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn shift_index(value: &JsonValue, offset: usize) -> JsonValue {
	match value {
		JsonValue::Num(n) => JsonValue::Num(*n + offset as f64),
		JsonValue::Array(items) => JsonValue::Array(items.iter().map(|v| shift_index(v, offset)).collect()),
		other => other.clone(),
	}
}

fn rewrite_arc_indexes(geometry: &JsonValue, offset: usize) -> JsonValue {
	let JsonValue::Object(obj) = geometry else { return geometry.clone() };
	let mut out = obj.clone();
	if let Some(arcs) = obj.get("arcs") {
		out.insert("arcs".to_string(), shift_index(arcs, offset));
	}
	if let Some(JsonValue::Array(geometries)) = obj.get("geometries") {
		let rewritten = geometries.iter().map(|g| rewrite_arc_indexes(g, offset)).collect();
		out.insert("geometries".to_string(), JsonValue::Array(rewritten));
	}
	JsonValue::Object(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::feature::Feature;
	use vectile_geometry::geo::PointGeometry;

	#[test]
	fn transform_round_trips_corner_points() {
		let transform = Transform::from_bounds([0.0, 0.0, 1024.0, 1024.0], 1024.0);
		assert_eq!(transform.forward(0.0, 0.0), (0, 0));
		assert_eq!(transform.forward(1024.0, 1024.0), (1024, 1024));
	}

	#[test]
	fn diff_encode_omits_zero_deltas() {
		let points = [(0, 0), (0, 0), (1, 1)];
		assert_eq!(diff_encode(&points), vec![(0, 0), (1, 1)]);
	}

	#[test]
	fn encode_wraps_output_in_vectile_object() {
		let feature = Feature::new(Geometry::Point(PointGeometry::from([1.0, 2.0])));
		let layer = FeatureLayer::new("points", vec![feature]);
		let json = encode(&[layer], [0.0, 0.0, 10.0, 10.0], 1024.0).unwrap();
		assert!(json.starts_with(r#"{"vectile":"#));
		assert!(json.contains(r#""type":"Topology""#));
	}

	#[test]
	fn merge_rejects_mismatched_transforms() {
		let a = Topology { transform: Transform::from_bounds([0.0, 0.0, 10.0, 10.0], 1024.0), objects: JsonObject::new(), arcs: Vec::new() };
		let b = Topology { transform: Transform::from_bounds([0.0, 0.0, 20.0, 20.0], 1024.0), objects: JsonObject::new(), arcs: Vec::new() };
		let err = merge(vec![a, b]).unwrap_err();
		assert!(crate::error::is_kind(&err, PipelineErrorKind::Encoder));
	}
}
