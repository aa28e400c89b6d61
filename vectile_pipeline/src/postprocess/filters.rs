//! `keep_n_features` / `rank_features` / `numeric_min_filter` / `drop_features_where` (§4.4.8).

use crate::feature::Feature;
use log::debug;
use std::collections::HashMap;
use vectile_geometry::geo::GeoValue;

fn matches_all(f: &Feature, items_matching: &HashMap<String, GeoValue>) -> bool {
	items_matching.iter().all(|(k, v)| f.properties.get(k) == Some(v))
}

fn get_f64(f: &Feature, key: &str) -> Option<f64> {
	match f.properties.get(key) {
		Some(GeoValue::Double(v)) => Some(*v),
		Some(GeoValue::Float(v)) => Some(f64::from(*v)),
		Some(GeoValue::Int(v)) => Some(*v as f64),
		Some(GeoValue::UInt(v)) => Some(*v as f64),
		_ => None,
	}
}

/// Passes through every feature that does not match `items_matching`; among those that
/// do match, keeps at most the first `cap` (in input order) and drops the rest.
#[must_use]
pub fn keep_n_features(features: &[Feature], items_matching: &HashMap<String, GeoValue>, cap: usize) -> Vec<Feature> {
	let mut kept_matching = 0usize;
	let out: Vec<Feature> = features
		.iter()
		.filter(|f| {
			if matches_all(f, items_matching) {
				kept_matching += 1;
				kept_matching <= cap
			} else {
				true
			}
		})
		.cloned()
		.collect();
	if out.len() < features.len() {
		debug!("keep_n_features: dropped {} of {} features past cap {cap}", features.len() - out.len(), features.len());
	}
	out
}

/// Stamps a 1-based rank into `rank_key` on every feature matching `items_matching`, in
/// input order; features not matching are left untouched.
pub fn rank_features(features: &mut [Feature], items_matching: &HashMap<String, GeoValue>, rank_key: &str) {
	let mut rank = 0i64;
	for f in features.iter_mut() {
		if matches_all(f, items_matching) {
			rank += 1;
			f.properties.insert(rank_key.to_string(), GeoValue::from(rank));
		}
	}
}

/// Aggregation mode for [`numeric_min_filter`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
	All,
	Any,
}

/// Drops features whose numeric `property_keys` fail `min_by_zoom[zoom]` under the given
/// aggregation (`All`: every present key must meet the minimum; `Any`: at least one must).
/// A feature with none of the keys present is dropped. Zooms without an entry in
/// `min_by_zoom` pass every feature through unfiltered.
#[must_use]
pub fn numeric_min_filter(features: &[Feature], property_keys: &[String], min_by_zoom: &HashMap<u8, f64>, zoom: u8) -> Vec<Feature> {
	let Some(&min) = min_by_zoom.get(&zoom) else {
		return features.to_vec();
	};
	features
		.iter()
		.filter(|f| {
			let values: Vec<f64> = property_keys.iter().filter_map(|k| get_f64(f, k)).collect();
			if values.is_empty() {
				return false;
			}
			values.iter().all(|v| *v >= min)
		})
		.cloned()
		.collect()
}

#[must_use]
pub fn numeric_min_filter_any(features: &[Feature], property_keys: &[String], min_by_zoom: &HashMap<u8, f64>, zoom: u8) -> Vec<Feature> {
	let Some(&min) = min_by_zoom.get(&zoom) else {
		return features.to_vec();
	};
	features
		.iter()
		.filter(|f| property_keys.iter().any(|k| get_f64(f, k).is_some_and(|v| v >= min)))
		.cloned()
		.collect()
}

/// Drops every feature whose `key` property is the boolean `true`.
#[must_use]
pub fn drop_features_where(features: &[Feature], key: &str) -> Vec<Feature> {
	features.iter().filter(|f| f.properties.get(key) != Some(&GeoValue::Bool(true))).cloned().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_geometry::geo::{Geometry, PointGeometry};

	fn feature_with(key: &str, value: GeoValue) -> Feature {
		let mut f = Feature::new(Geometry::Point(PointGeometry::from([0.0, 0.0])));
		f.properties.insert(key.to_string(), value);
		f
	}

	#[test]
	fn keep_n_features_caps_matching_only() {
		let features: Vec<Feature> = (0..5).map(|_| feature_with("kind", GeoValue::from("poi"))).collect();
		let matching = HashMap::from([("kind".to_string(), GeoValue::from("poi"))]);
		let out = keep_n_features(&features, &matching, 2);
		assert_eq!(out.len(), 2);
	}

	#[test]
	fn rank_features_stamps_sequential_rank() {
		let mut features: Vec<Feature> = (0..3).map(|_| feature_with("kind", GeoValue::from("poi"))).collect();
		let matching = HashMap::from([("kind".to_string(), GeoValue::from("poi"))]);
		rank_features(&mut features, &matching, "rank");
		let ranks: Vec<i64> = features.iter().map(|f| match f.properties.get("rank") {
			Some(GeoValue::Int(v)) => *v,
			_ => panic!("missing rank"),
		}).collect();
		assert_eq!(ranks, vec![1, 2, 3]);
	}

	#[test]
	fn numeric_min_filter_drops_below_threshold() {
		let features = vec![feature_with("population", GeoValue::from(100.0)), feature_with("population", GeoValue::from(10.0))];
		let keys = vec!["population".to_string()];
		let min_by_zoom = HashMap::from([(5u8, 50.0)]);
		let out = numeric_min_filter(&features, &keys, &min_by_zoom, 5);
		assert_eq!(out.len(), 1);
	}

	#[test]
	fn drop_features_where_removes_true_flag() {
		let features = vec![feature_with("hidden", GeoValue::Bool(true)), feature_with("hidden", GeoValue::Bool(false))];
		let out = drop_features_where(&features, "hidden");
		assert_eq!(out.len(), 1);
	}
}
