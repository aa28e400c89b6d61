//! `_Cutter`, the shared engine behind `intercut`/`overlap`/`intracut` (§4.4.1, §4.4.2).

use crate::feature::Feature;
use crate::geoadapt::{bounds, clone_shape, cut_shape, empty_like, shape_bounds, shape_is_empty, shape_measure, to_geo_multi_polygon, to_geo_shape};
use rstar::{RTree, RTreeObject, AABB};
use vectile_geometry::geo::Geometry;

/// How a candidate cutter decides what's "inside" vs "outside" of the target shape.
#[derive(Clone, Copy)]
pub enum IntersectFunc {
	/// `inside = shape ∩ cutter`, `outside = shape \ cutter`.
	Cut,
	/// If `area(shape ∩ cutter) / area(shape) >= min_fraction`, all of `shape` is inside.
	Overlap { min_fraction: f64 },
}

struct IndexedCutter {
	envelope: AABB<[f64; 2]>,
	shape: geo::MultiPolygon<f64>,
}

impl RTreeObject for IndexedCutter {
	type Envelope = AABB<[f64; 2]>;
	fn envelope(&self) -> Self::Envelope {
		self.envelope
	}
}

/// One bucket of cutter shapes sharing a single `cutting_attribute` value.
pub struct CutterBucket {
	pub attribute_value: String,
	tree: RTree<IndexedCutter>,
}

impl CutterBucket {
	#[must_use]
	pub fn build(attribute_value: String, cutters: &[Feature]) -> Self {
		let objects = cutters
			.iter()
			.filter_map(|f| {
				let mp = to_geo_multi_polygon(&f.geometry);
				bounds(&mp).map(|[x0, y0, x1, y1]| IndexedCutter {
					envelope: AABB::from_corners([x0, y0], [x1, y1]),
					shape: mp,
				})
			})
			.collect();
		CutterBucket { attribute_value, tree: RTree::bulk_load(objects) }
	}
}

/// Runs the shared `_Cutter` algorithm (§4.4.1) over `target`, cutting it against each
/// priority bucket in turn. Returns `(emitted_inside_pieces, residual_outside_shape)`.
/// `target_attribute` names the property written on emitted inside pieces.
pub fn cut_feature(
	target: &Feature,
	buckets: &[CutterBucket],
	func: IntersectFunc,
	target_attribute: &str,
) -> (Vec<Feature>, Option<Feature>) {
	cut_feature_opts(target, buckets, func, target_attribute, false)
}

/// As [`cut_feature`], but when `keep_geom_type` is set, drops any emitted piece whose
/// dimensionality no longer matches `target`'s (§4.4.1). `cut_shape` never changes a
/// shape's variant, so this is a defensive check rather than a live filter in practice.
pub fn cut_feature_opts(
	target: &Feature,
	buckets: &[CutterBucket],
	func: IntersectFunc,
	target_attribute: &str,
	keep_geom_type: bool,
) -> (Vec<Feature>, Option<Feature>) {
	let Some(mut remaining) = to_geo_shape(&target.geometry) else {
		return (Vec::new(), Some(target.clone()));
	};
	let target_dimensionality = dimensionality(&target.geometry);
	let mut emitted = Vec::new();

	for bucket in buckets {
		if shape_is_empty(&remaining) {
			break;
		}
		let Some([x0, y0, x1, y1]) = shape_bounds(&remaining) else { break };
		let envelope = AABB::from_corners([x0, y0], [x1, y1]);

		for candidate in bucket.tree.locate_in_envelope_intersecting(&envelope) {
			if shape_is_empty(&remaining) {
				break;
			}
			let (inside, outside) = match func {
				IntersectFunc::Cut => cut_shape(&remaining, &candidate.shape),
				IntersectFunc::Overlap { min_fraction } => {
					let (cut_inside, _) = cut_shape(&remaining, &candidate.shape);
					let total = shape_measure(&remaining);
					let covered = shape_measure(&cut_inside);
					if total > 0.0 && covered / total >= min_fraction {
						(clone_shape(&remaining), empty_like(&remaining))
					} else {
						(empty_like(&remaining), clone_shape(&remaining))
					}
				}
			};

			if !shape_is_empty(&inside) {
				let mut piece = target.clone();
				piece.geometry = crate::geoadapt::from_geo_shape(inside);
				if !keep_geom_type || dimensionality(&piece.geometry) == target_dimensionality {
					piece.properties.insert(target_attribute.to_string(), vectile_geometry::geo::GeoValue::from(bucket.attribute_value.clone()));
					emitted.push(piece);
				}
			}
			remaining = outside;
		}
	}

	let residual = if shape_is_empty(&remaining) {
		None
	} else {
		let mut f = target.clone();
		f.geometry = crate::geoadapt::from_geo_shape(remaining);
		if keep_geom_type && dimensionality(&f.geometry) != target_dimensionality {
			None
		} else {
			Some(f)
		}
	};

	(emitted, residual)
}

/// Dimensionality bitmask used by `keep_geom_type` filtering (§4.4.1): point=1, line=2, polygon=4.
#[must_use]
pub fn dimensionality(geometry: &Geometry) -> u8 {
	match geometry {
		Geometry::Point(_) | Geometry::MultiPoint(_) => 1,
		Geometry::LineString(_) | Geometry::LinearRing(_) | Geometry::MultiLineString(_) => 2,
		Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 4,
		Geometry::GeometryCollection(_) => 0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_geometry::geo::PolygonGeometry;

	fn square_feature(x0: f64, y0: f64, x1: f64, y1: f64) -> Feature {
		Feature::new(Geometry::Polygon(PolygonGeometry::from(&[[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])))
	}

	#[test]
	fn cut_splits_into_inside_and_residual() {
		let target = square_feature(0.0, 0.0, 10.0, 10.0);
		let cutter = square_feature(5.0, 0.0, 15.0, 10.0);
		let bucket = CutterBucket::build("zone_a".to_string(), &[cutter]);
		let (emitted, residual) = cut_feature(&target, &[bucket], IntersectFunc::Cut, "zone");

		assert_eq!(emitted.len(), 1);
		assert_eq!(emitted[0].properties.get("zone"), Some(&vectile_geometry::geo::GeoValue::from("zone_a")));
		assert!(residual.is_some());
	}

	#[test]
	fn non_overlapping_cutter_leaves_shape_untouched() {
		let target = square_feature(0.0, 0.0, 10.0, 10.0);
		let cutter = square_feature(100.0, 100.0, 110.0, 110.0);
		let bucket = CutterBucket::build("far".to_string(), &[cutter]);
		let (emitted, residual) = cut_feature(&target, &[bucket], IntersectFunc::Cut, "zone");

		assert!(emitted.is_empty());
		assert!(residual.is_some());
	}

	#[test]
	fn dimensionality_matches_polygon() {
		let f = square_feature(0.0, 0.0, 1.0, 1.0);
		assert_eq!(dimensionality(&f.geometry), 4);
	}

	#[test]
	fn line_target_is_cut_not_dropped() {
		use vectile_geometry::geo::{Coordinates, LineStringGeometry};

		// Two vertices outside the cutter, two inside, two outside again, so each run
		// has at least two points and survives the vertex-based split (see `cut_shape`).
		let target = Feature::new(Geometry::LineString(LineStringGeometry(vec![
			Coordinates::new(-5.0, 5.0),
			Coordinates::new(-3.0, 5.0),
			Coordinates::new(3.0, 5.0),
			Coordinates::new(7.0, 5.0),
			Coordinates::new(13.0, 5.0),
			Coordinates::new(15.0, 5.0),
		])));
		let cutter = square_feature(0.0, 0.0, 10.0, 10.0);
		let bucket = CutterBucket::build("zone_a".to_string(), &[cutter]);
		let (emitted, residual) = cut_feature(&target, &[bucket], IntersectFunc::Cut, "zone");

		assert_eq!(emitted.len(), 1);
		assert!(matches!(emitted[0].geometry, Geometry::LineString(_)));
		assert!(residual.is_some());
		// two outside runs survive, so the residual is a MultiLineString
		assert!(matches!(residual.unwrap().geometry, Geometry::MultiLineString(_)));
	}

	#[test]
	fn point_target_is_cut_not_dropped() {
		use vectile_geometry::geo::PointGeometry;

		let target = Feature::new(Geometry::Point(PointGeometry::new(vectile_geometry::geo::Coordinates::new(5.0, 5.0))));
		let cutter = square_feature(0.0, 0.0, 10.0, 10.0);
		let bucket = CutterBucket::build("zone_a".to_string(), &[cutter]);
		let (emitted, residual) = cut_feature(&target, &[bucket], IntersectFunc::Cut, "zone");

		assert_eq!(emitted.len(), 1);
		assert!(matches!(emitted[0].geometry, Geometry::Point(_)));
		assert!(residual.is_none());
	}

	#[test]
	fn keep_geom_type_preserves_polygon_pieces() {
		// `cut_shape` never changes a shape's variant, so turning on `keep_geom_type`
		// must not drop pieces that already match the target's dimensionality.
		let target = square_feature(0.0, 0.0, 10.0, 10.0);
		let cutter = square_feature(5.0, 0.0, 15.0, 10.0);
		let bucket = CutterBucket::build("zone_a".to_string(), &[cutter]);
		let (emitted, residual) = cut_feature_opts(&target, &[bucket], IntersectFunc::Cut, "zone", true);

		assert_eq!(emitted.len(), 1);
		assert!(residual.is_some());
	}
}
