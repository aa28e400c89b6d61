//! `intercut` / `overlap` / `intracut` (§4.4.2), built on the shared `_Cutter` engine.

use super::cutter::{cut_feature_opts, CutterBucket, IntersectFunc};
use crate::feature::Feature;

fn group_by_attribute<'a>(features: &'a [Feature], attribute: &str, priority: Option<&[String]>) -> Vec<(String, Vec<&'a Feature>)> {
	let mut order: Vec<String> = Vec::new();
	let mut groups: std::collections::HashMap<String, Vec<&Feature>> = std::collections::HashMap::new();
	for f in features {
		if let Some(v) = f.properties.get(attribute) {
			let key = v.to_string();
			groups.entry(key.clone()).or_default().push(f);
			if !order.contains(&key) {
				order.push(key);
			}
		}
	}
	let order = priority.map(<[String]>::to_vec).unwrap_or(order);
	order.into_iter().filter_map(|k| groups.remove(&k).map(|v| (k, v))).collect()
}

fn build_buckets(groups: &[(String, Vec<&Feature>)]) -> Vec<CutterBucket> {
	groups
		.iter()
		.map(|(value, features)| {
			let owned: Vec<Feature> = features.iter().map(|f| (*f).clone()).collect();
			CutterBucket::build(value.clone(), &owned)
		})
		.collect()
}

fn run(base: &[Feature], buckets: &[CutterBucket], func: IntersectFunc, target_attribute: &str, keep_geom_type: bool) -> Vec<Feature> {
	let mut out = Vec::with_capacity(base.len());
	for f in base {
		let (mut pieces, residual) = cut_feature_opts(f, buckets, func, target_attribute, keep_geom_type);
		out.append(&mut pieces);
		if let Some(residual) = residual {
			out.push(residual);
		}
	}
	out
}

/// Cuts `base`-layer features by `cutting`-layer features, bucketed by the distinct
/// values of `cutting_attribute` on the cutting features (in `priority` order if given,
/// else first-seen order). Emitted inside pieces carry `target_attribute = <value>`.
/// `base` may be point, line, or polygon features; `keep_geom_type` (§4.4.1) drops any
/// emitted piece whose dimensionality no longer matches the base feature it came from.
#[must_use]
pub fn intercut(
	base: &[Feature],
	cutting: &[Feature],
	cutting_attribute: &str,
	target_attribute: &str,
	priority: Option<&[String]>,
	keep_geom_type: bool,
) -> Vec<Feature> {
	let groups = group_by_attribute(cutting, cutting_attribute, priority);
	let buckets = build_buckets(&groups);
	run(base, &buckets, IntersectFunc::Cut, target_attribute, keep_geom_type)
}

/// As [`intercut`], but using the area-threshold `overlap(min_fraction)` intersect func
/// (§4.4.1): a base feature is kept whole and tagged once `area(shape ∩ cutter) /
/// area(shape) >= min_fraction`, rather than being split.
#[must_use]
pub fn overlap(
	base: &[Feature],
	cutting: &[Feature],
	cutting_attribute: &str,
	target_attribute: &str,
	min_fraction: f64,
	priority: Option<&[String]>,
) -> Vec<Feature> {
	let groups = group_by_attribute(cutting, cutting_attribute, priority);
	let buckets = build_buckets(&groups);
	run(base, &buckets, IntersectFunc::Overlap { min_fraction }, target_attribute, false)
}

/// Splits `layer` into cutting-features (those bearing `attribute`) and base-features
/// (those not), then cuts the latter by the former (§4.4.2).
#[must_use]
pub fn intracut(layer: &[Feature], attribute: &str, target_attribute: &str, priority: Option<&[String]>) -> Vec<Feature> {
	let (cutting, base): (Vec<Feature>, Vec<Feature>) =
		layer.iter().cloned().partition(|f| f.properties.get(attribute).is_some());
	intercut(&base, &cutting, attribute, target_attribute, priority, false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_geometry::geo::{GeoValue, Geometry, PolygonGeometry};

	fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonGeometry {
		PolygonGeometry::from(&[[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
	}

	fn feature_with_attr(geom: PolygonGeometry, key: &str, value: &str) -> Feature {
		let mut f = Feature::new(Geometry::Polygon(geom));
		f.properties.insert(key.to_string(), GeoValue::from(value));
		f
	}

	#[test]
	fn intercut_splits_base_by_cutting_layer() {
		let base = vec![Feature::new(Geometry::Polygon(square(0.0, 0.0, 10.0, 10.0)))];
		let cutting = vec![feature_with_attr(square(5.0, 0.0, 15.0, 10.0), "zone", "a")];
		let out = intercut(&base, &cutting, "zone", "zone", None, false);
		assert_eq!(out.len(), 2);
	}

	#[test]
	fn intracut_splits_single_layer_by_attribute_presence() {
		let layer = vec![
			Feature::new(Geometry::Polygon(square(0.0, 0.0, 10.0, 10.0))),
			feature_with_attr(square(5.0, 0.0, 15.0, 10.0), "zone", "a"),
		];
		let out = intracut(&layer, "zone", "zone", None);
		assert_eq!(out.len(), 2);
	}
}
