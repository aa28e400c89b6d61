//! `generate_label_features` / `generate_address_points` (§4.4.5).

use crate::feature::Feature;
use crate::geoadapt::{geometry_bounds, to_geo_multi_polygon};
use geo::Centroid;
use vectile_geometry::geo::{Geometry, PointGeometry};

/// Representative point for a feature: the centroid of its polygonal geometry, or the
/// center of its bounding box for everything else (this crate has no dedicated
/// "point on surface" algorithm grounded in the pack, so centroid/bbox-center stand in —
/// see DESIGN.md).
pub(crate) fn representative_point(geometry: &Geometry) -> Option<PointGeometry> {
	match geometry {
		Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
			let mp = to_geo_multi_polygon(geometry);
			mp.centroid().map(|p| PointGeometry::from([p.x(), p.y()]))
		}
		_ => geometry_bounds(geometry).map(|[x0, y0, x1, y1]| PointGeometry::from([(x0 + x1) / 2.0, (y0 + y1) / 2.0])),
	}
}

fn label_feature(source: &Feature) -> Option<Feature> {
	let point = representative_point(&source.geometry)?;
	let mut f = Feature::new(Geometry::Point(point));
	f.fid = source.fid;
	f.properties = source.properties.clone();
	Some(f)
}

/// Emits one point feature per input feature matching `predicate`, at its
/// representative point. Used to build a `labels`/POI-style layer out of areal features.
#[must_use]
pub fn generate_label_features(features: &[Feature], predicate: impl Fn(&Feature) -> bool) -> Vec<Feature> {
	features.iter().filter(|f| predicate(f)).filter_map(label_feature).collect()
}

/// As [`generate_label_features`], named separately because address-point generation
/// is driven by its own predicate/config key in the layer configuration (§6), not
/// because the underlying algorithm differs.
#[must_use]
pub fn generate_address_points(features: &[Feature], predicate: impl Fn(&Feature) -> bool) -> Vec<Feature> {
	generate_label_features(features, predicate)
}
