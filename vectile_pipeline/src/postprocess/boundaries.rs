//! `exterior_boundaries` (§4.4.3) and `admin_boundaries` (§4.4.4).
//!
//! Both reduce to the same primitive: splitting a polygon's boundary ring into the runs
//! of vertices that fall outside a set of neighboring polygons. `geo`'s `BooleanOps` only
//! operates on areal geometry, so rather than a true line/polygon boolean difference this
//! walks the boundary and cuts a new run wherever a vertex enters a neighbor — a
//! documented simplification (see DESIGN.md) that is exact for neighbors sharing an edge
//! (the common case: adjacent administrative polygons) and approximate for partial overlap.

use crate::feature::Feature;
use crate::geoadapt::{bounds, polygon_to_geo};
use crate::postprocess::cutter::{cut_feature_opts, CutterBucket, IntersectFunc};
use log::debug;
use rstar::{RTree, RTreeObject, AABB};
use std::collections::HashMap;
use vectile_geometry::geo::{GeoValue, Geometry, GeometryTrait as _, LineStringGeometry, PolygonGeometry};

struct IndexedPolygon {
	envelope: AABB<[f64; 2]>,
	index: usize,
}

impl RTreeObject for IndexedPolygon {
	type Envelope = AABB<[f64; 2]>;
	fn envelope(&self) -> Self::Envelope {
		self.envelope
	}
}

/// Splits `ring`'s vertex sequence into maximal runs whose points are not contained by
/// any polygon in `neighbors` (besides `skip_index`). Consecutive outside points form one
/// `LineString`; a run that wraps across the ring's closing vertex is not stitched back
/// together, matching the non-cyclic "boundary minus neighbors" result of a true
/// line/polygon difference when the neighbor set forms a simple partition.
fn runs_outside_neighbors(ring: &[vectile_geometry::geo::Coordinates], neighbors: &[&PolygonGeometry], skip_index: Option<usize>) -> Vec<LineStringGeometry> {
	let mut runs = Vec::new();
	let mut current: Vec<vectile_geometry::geo::Coordinates> = Vec::new();

	for coord in ring {
		let inside_any = neighbors
			.iter()
			.enumerate()
			.any(|(i, poly)| Some(i) != skip_index && poly.contains_point(coord.x(), coord.y()));
		if inside_any {
			if current.len() > 1 {
				runs.push(LineStringGeometry(std::mem::take(&mut current)));
			} else {
				current.clear();
			}
		} else {
			current.push(*coord);
		}
	}
	if current.len() > 1 {
		runs.push(LineStringGeometry(current));
	}
	runs
}

fn build_index(polygons: &[PolygonGeometry]) -> RTree<IndexedPolygon> {
	let objects = polygons
		.iter()
		.enumerate()
		.filter_map(|(index, poly)| {
			let geo_poly = polygon_to_geo(poly);
			bounds(&geo::MultiPolygon::new(vec![geo_poly])).map(|[x0, y0, x1, y1]| IndexedPolygon {
				envelope: AABB::from_corners([x0, y0], [x1, y1]),
				index,
			})
		})
		.collect();
	RTree::bulk_load(objects)
}

/// Applies a `prop_transform` map onto `source`: a key mapped to `Bool(true)` copies the
/// source property through unchanged; a key mapped to a `Map` looks up the source value
/// as a key into that map; any other value is used as a literal.
fn apply_prop_transform(source: &vectile_geometry::geo::GeoProperties, prop_transform: &HashMap<String, GeoValue>) -> vectile_geometry::geo::GeoProperties {
	let mut out = vectile_geometry::geo::GeoProperties::new();
	for (key, rule) in prop_transform {
		match rule {
			GeoValue::Bool(true) => {
				if let Some(v) = source.get(key) {
					out.insert(key.clone(), v.clone());
				}
			}
			GeoValue::Map(lookup) => {
				if let Some(src_value) = source.get(key) {
					if let Some(mapped) = lookup.get(&src_value.to_string()) {
						out.insert(key.clone(), mapped.clone());
					}
				}
			}
			literal => {
				out.insert(key.clone(), literal.clone());
			}
		}
	}
	out
}

/// §4.4.3: for each polygon, subtract neighboring polygons from its boundary ring,
/// skipping the subtraction against a same-area neighbor when the current feature's `id`
/// is positive (superseded-way dedup hack), and emit the surviving line runs as new
/// features with properties run through `prop_transform`.
#[must_use]
pub fn exterior_boundaries(features: &[Feature], prop_transform: &HashMap<String, GeoValue>) -> Vec<Feature> {
	let polygons: Vec<PolygonGeometry> = features
		.iter()
		.filter_map(|f| match &f.geometry {
			Geometry::Polygon(p) => Some(p.clone()),
			_ => None,
		})
		.collect();
	if polygons.len() != features.len() {
		debug!("exterior_boundaries: skipping, {} of {} input features are not polygons", features.len() - polygons.len(), features.len());
		return Vec::new();
	}
	let areas: Vec<f64> = polygons.iter().map(vectile_geometry::geo::GeometryTrait::area).collect();
	let index = build_index(&polygons);

	let mut out = Vec::new();
	for (i, f) in features.iter().enumerate() {
		let Some([x0, y0, x1, y1]) = bounds(&geo::MultiPolygon::new(vec![polygon_to_geo(&polygons[i])])) else { continue };
		let envelope = AABB::from_corners([x0, y0], [x1, y1]);
		let neighbor_indices: Vec<usize> = index
			.locate_in_envelope_intersecting(&envelope)
			.map(|c| c.index)
			.filter(|&j| {
				j != i && !(areas[j] == areas[i] && f.fid.is_some_and(|id| id > 0))
			})
			.collect();
		let neighbors: Vec<&PolygonGeometry> = neighbor_indices.iter().map(|&j| &polygons[j]).collect();

		for ring in &polygons[i].0 {
			let runs = runs_outside_neighbors(&ring.0, &neighbors, None);
			for run in runs {
				let mut emitted = Feature::new(Geometry::LineString(run));
				emitted.properties = apply_prop_transform(&f.properties, prop_transform);
				out.push(emitted);
			}
		}
	}
	out
}

/// Merges left/right property bags produced when two admin-boundary features meet along
/// a shared edge (§4.4.4): keys present and equal on both sides pass straight through;
/// keys that differ get split into `<prefix>:left<suffix>` / `<prefix>:right<suffix>`,
/// where `<prefix>` is the text up to (and including) the key's first `:`, or the whole
/// key when it has none.
fn merge_left_right_props(left: &vectile_geometry::geo::GeoProperties, right: &vectile_geometry::geo::GeoProperties) -> vectile_geometry::geo::GeoProperties {
	let mut out = vectile_geometry::geo::GeoProperties::new();
	let mut keys: Vec<&String> = left.iter().map(|(k, _)| k).chain(right.iter().map(|(k, _)| k)).collect();
	keys.sort();
	keys.dedup();

	for key in keys {
		let lv = left.get(key);
		let rv = right.get(key);
		match (lv, rv) {
			(Some(a), Some(b)) if a == b => {
				out.insert(key.clone(), a.clone());
			}
			_ => {
				let (prefix, suffix) = match key.find(':') {
					Some(pos) => key.split_at(pos + 1),
					None => (key.as_str(), ""),
				};
				if let Some(v) = lv {
					out.insert(format!("{prefix}left{suffix}"), v.clone());
				}
				if let Some(v) = rv {
					out.insert(format!("{prefix}right{suffix}"), v.clone());
				}
			}
		}
	}
	out
}

/// §4.4.4: admin polygons bucketed by `kind`. Earlier features have shared edges with
/// later ones subtracted out (dedup); shared edges with later features are emitted once,
/// carrying merged left/right properties; any one-sided residual is an international-
/// waters boundary. Finally re-cuts the result against `maritime` features and flips
/// `maritime_boundary` so segments that *did not* intersect gain the tag.
#[must_use]
pub fn admin_boundaries(admin_features: &[Feature], maritime_features: &[Feature]) -> Vec<Feature> {
	let mut by_kind: HashMap<String, Vec<&Feature>> = HashMap::new();
	for f in admin_features {
		let kind = f.properties.get("kind").map(GeoValue::to_string).unwrap_or_default();
		by_kind.entry(kind).or_default().push(f);
	}

	let mut boundaries = Vec::new();
	for bucket in by_kind.values() {
		let polygons: Vec<PolygonGeometry> = bucket
			.iter()
			.filter_map(|f| match &f.geometry {
				Geometry::Polygon(p) => Some(p.clone()),
				_ => None,
			})
			.collect();
		if polygons.len() != bucket.len() {
			continue;
		}

		for i in 0..bucket.len() {
			let earlier: Vec<&PolygonGeometry> = polygons[..i].iter().collect();
			let mut runs: Vec<LineStringGeometry> = polygons[i]
				.0
				.iter()
				.flat_map(|ring| runs_outside_neighbors(&ring.0, &earlier, None))
				.collect();

			for j in (i + 1)..bucket.len() {
				let later = &polygons[j];
				let mut remaining = Vec::new();
				for run in runs {
					let inside: Vec<vectile_geometry::geo::Coordinates> =
						run.0.iter().copied().filter(|c| later.contains_point(c.x(), c.y())).collect();
					if inside.len() > 1 {
						let mut f = Feature::new(Geometry::LineString(LineStringGeometry(inside)));
						f.properties = merge_left_right_props(&bucket[i].properties, &bucket[j].properties);
						boundaries.push(f);
					}
					let outside: Vec<vectile_geometry::geo::Coordinates> =
						run.0.iter().copied().filter(|c| !later.contains_point(c.x(), c.y())).collect();
					if outside.len() > 1 {
						remaining.push(LineStringGeometry(outside));
					}
				}
				runs = remaining;
			}

			for run in runs {
				let mut f = Feature::new(Geometry::LineString(run));
				f.properties = bucket[i].properties.clone();
				boundaries.push(f);
			}
		}
	}

	if maritime_features.is_empty() {
		return boundaries;
	}

	let bucket = CutterBucket::build("maritime".to_string(), maritime_features);
	boundaries
		.into_iter()
		.map(|f| {
			let (inside, residual) = cut_feature_opts(&f, std::slice::from_ref(&bucket), IntersectFunc::Cut, "__maritime_hit__", true);
			let mut pieces = Vec::new();
			for mut piece in inside {
				piece.properties.remove("__maritime_hit__");
				piece.properties.insert("maritime_boundary".to_string(), GeoValue::from(false));
				pieces.push(piece);
			}
			if let Some(mut r) = residual {
				r.properties.insert("maritime_boundary".to_string(), GeoValue::from(true));
				pieces.push(r);
			}
			pieces
		})
		.collect::<Vec<_>>()
		.into_iter()
		.flatten()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonGeometry {
		PolygonGeometry::from(&[[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
	}

	#[test]
	fn exterior_boundaries_emits_lines_for_isolated_polygon() {
		let f = Feature::new(Geometry::Polygon(square(0.0, 0.0, 10.0, 10.0)));
		let transform = HashMap::from([("kind".to_string(), GeoValue::Bool(true))]);
		let out = exterior_boundaries(&[f], &transform);
		assert!(!out.is_empty());
		assert!(out.iter().all(|f| matches!(f.geometry, Geometry::LineString(_))));
	}

	#[test]
	fn merge_left_right_props_splits_differing_keys() {
		let mut left = vectile_geometry::geo::GeoProperties::new();
		left.insert("name".to_string(), GeoValue::from("Alpha"));
		let mut right = vectile_geometry::geo::GeoProperties::new();
		right.insert("name".to_string(), GeoValue::from("Beta"));

		let merged = merge_left_right_props(&left, &right);
		assert_eq!(merged.get("name:left"), Some(&GeoValue::from("Alpha")));
		assert_eq!(merged.get("name:right"), Some(&GeoValue::from("Beta")));
	}

	#[test]
	fn merge_left_right_props_keeps_equal_keys_direct() {
		let mut left = vectile_geometry::geo::GeoProperties::new();
		left.insert("kind".to_string(), GeoValue::from("border"));
		let right = left.clone();

		let merged = merge_left_right_props(&left, &right);
		assert_eq!(merged.get("kind"), Some(&GeoValue::from("border")));
	}
}
