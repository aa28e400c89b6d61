//! Named, per-layer-kind feature sorters (§4.3). All sorts are stable so that
//! equal-key groups preserve their prior relative order (§8 invariant 6).

use crate::feature::Feature;
use vectile_geometry::geo::GeoValue;

fn get_f64(f: &Feature, key: &str) -> Option<f64> {
	match f.properties.get(key) {
		Some(GeoValue::Double(v)) => Some(*v),
		Some(GeoValue::Float(v)) => Some(f64::from(*v)),
		Some(GeoValue::Int(v)) => Some(*v as f64),
		Some(GeoValue::UInt(v)) => Some(*v as f64),
		_ => None,
	}
}

fn get_i64(f: &Feature, key: &str) -> Option<i64> {
	match f.properties.get(key) {
		Some(GeoValue::Int(v)) => Some(*v),
		Some(GeoValue::UInt(v)) => Some(*v as i64),
		_ => None,
	}
}

fn get_string_list_len(f: &Feature, key: &str) -> usize {
	match f.properties.get(key) {
		Some(GeoValue::StringList(v)) => v.len(),
		_ => 0,
	}
}

fn feature_area(f: &Feature) -> f64 {
	use vectile_geometry::geo::GeometryTrait as _;
	match &f.geometry {
		vectile_geometry::geo::Geometry::Polygon(g) => g.area(),
		vectile_geometry::geo::Geometry::MultiPolygon(g) => g.area(),
		_ => 0.0,
	}
}

/// Used by `buildings`, `earth`, `landuse`, `water`: by `id` ascending, then by
/// `area` descending. Both passes are stable.
pub fn sort_by_area_then_id(features: &mut [Feature]) {
	features.sort_by(|a, b| {
		feature_area(b)
			.partial_cmp(&feature_area(a))
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	features.sort_by_key(|f| f.fid.unwrap_or(i64::MIN));
}

const MISSING_POPULATION: f64 = f64::MIN;
const MISSING_SCALERANK: i64 = 1000;
const MISSING_AREA: f64 = f64::MIN;

/// By `(population, area)` descending, then `scalerank` ascending, then
/// `n_photos` descending — each pass stable, applied in that order.
pub fn sort_places(features: &mut [Feature]) {
	features.sort_by(|a, b| get_f64(b, "n_photos").partial_cmp(&get_f64(a, "n_photos")).unwrap_or(std::cmp::Ordering::Equal));
	features.sort_by_key(|f| get_i64(f, "scalerank").unwrap_or(MISSING_SCALERANK));
	features.sort_by(|a, b| {
		let area_a = get_f64(a, "area").unwrap_or(MISSING_AREA);
		let area_b = get_f64(b, "area").unwrap_or(MISSING_AREA);
		let pop_a = get_f64(a, "population").unwrap_or(MISSING_POPULATION);
		let pop_b = get_f64(b, "population").unwrap_or(MISSING_POPULATION);
		(pop_b, area_b).partial_cmp(&(pop_a, area_a)).unwrap_or(std::cmp::Ordering::Equal)
	});
}

/// Used by `transit`: by `id`, then stable by `transit_routes` list length descending.
pub fn sort_by_transit_routes_then_feature_id(features: &mut [Feature]) {
	features.sort_by_key(|f| f.fid.unwrap_or(i64::MIN));
	features.sort_by_key(|f| std::cmp::Reverse(get_string_list_len(f, "transit_routes")));
}

/// `pois`: stable pass-through sort by `id` ascending; existing draw order from the
/// query is otherwise preserved.
pub fn sort_pois(features: &mut [Feature]) {
	features.sort_by_key(|f| f.fid.unwrap_or(i64::MIN));
}

/// Roads: by `sort_key` descending (higher-priority roads drawn last / on top), stable.
pub fn sort_roads(features: &mut [Feature]) {
	features.sort_by_key(|f| std::cmp::Reverse(get_i64(f, "sort_key").unwrap_or(0)));
}

/// Resolves a sorter by the layer-kind names used in `sort_fn` config (§4.3, §6).
#[must_use]
pub fn by_name(name: &str) -> Option<fn(&mut [Feature])> {
	match name {
		"buildings" | "earth" | "landuse" | "water" => Some(sort_by_area_then_id),
		"places" => Some(sort_places),
		"transit" => Some(sort_by_transit_routes_then_feature_id),
		"pois" => Some(sort_pois),
		"roads" => Some(sort_roads),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_geometry::geo::{GeoValue, Geometry, PointGeometry};

	fn feature(fid: i64, sort_key: i64) -> Feature {
		let mut f = Feature::new(Geometry::Point(PointGeometry::from([0.0, 0.0])));
		f.fid = Some(fid);
		f.properties.insert("sort_key".to_string(), GeoValue::from(sort_key));
		f
	}

	#[test]
	fn roads_sort_descending_by_sort_key_stably() {
		let mut features = vec![feature(1, 10), feature(2, 20), feature(3, 10)];
		sort_roads(&mut features);
		let keys: Vec<i64> = features.iter().map(|f| f.fid.unwrap()).collect();
		assert_eq!(keys, vec![2, 1, 3]);
	}

	#[test]
	fn pois_sort_ascending_by_id() {
		let mut features = vec![feature(3, 0), feature(1, 0), feature(2, 0)];
		sort_pois(&mut features);
		let ids: Vec<i64> = features.iter().map(|f| f.fid.unwrap()).collect();
		assert_eq!(ids, vec![1, 2, 3]);
	}

	#[test]
	fn by_name_resolves_known_kinds() {
		assert!(by_name("roads").is_some());
		assert!(by_name("unknown_layer_kind").is_none());
	}
}
