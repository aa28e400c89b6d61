//! `remove_duplicate_features` (§4.4.6) and `normalize_and_merge_duplicate_stations` (§4.4.7).

use super::label::representative_point;
use crate::feature::Feature;
use crate::sorters::sort_pois;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use vectile_geometry::geo::GeoValue;

const EARTH_CIRCUMFERENCE: f64 = 40_075_016.68;

fn screen_pixel_distance(a: &Feature, b: &Feature, zoom: u8) -> Option<f64> {
	let pa = representative_point(&a.geometry)?;
	let pb = representative_point(&b.geometry)?;
	let dx = pa.0.x() - pb.0.x();
	let dy = pa.0.y() - pb.0.y();
	let distance_in_mercator = (dx * dx + dy * dy).sqrt();
	Some(distance_in_mercator * f64::from(2u32.pow(u32::from(zoom) + 8)) / EARTH_CIRCUMFERENCE)
}

fn dedupe_key(f: &Feature, property_keys: &[String]) -> Vec<Option<GeoValue>> {
	property_keys.iter().map(|k| f.properties.get(k).cloned()).collect()
}

/// Deduplicates `features` by the tuple of `property_keys`. Within each group the first
/// occurrence is always kept; a later occurrence is kept only if its distance (in screen
/// pixels at `zoom`) to every already-kept member of the group exceeds `min_distance`.
#[must_use]
pub fn remove_duplicate_features(features: &[Feature], property_keys: &[String], min_distance: f64, zoom: u8) -> Vec<Feature> {
	let mut groups: HashMap<Vec<Option<GeoValue>>, Vec<usize>> = HashMap::new();
	let mut kept = vec![false; features.len()];

	for (i, f) in features.iter().enumerate() {
		let key = dedupe_key(f, property_keys);
		let bucket = groups.entry(key).or_default();
		let far_enough = bucket.iter().all(|&j| match screen_pixel_distance(f, &features[j], zoom) {
			Some(d) => d > min_distance,
			None => true,
		});
		if bucket.is_empty() || far_enough {
			kept[i] = true;
			bucket.push(i);
		}
	}

	let out: Vec<Feature> = features.iter().zip(kept).filter_map(|(f, keep)| keep.then(|| f.clone())).collect();
	if out.len() < features.len() {
		debug!("remove_duplicate_features: dropped {} near-duplicates", features.len() - out.len());
	}
	out
}

lazy_static! {
	static ref STATION_NAME: Regex = Regex::new(r"^([^(]*)\(([^)]*)\).*$").unwrap();
}

fn subway_lines(f: &Feature) -> HashSet<String> {
	match f.properties.get("subway_lines") {
		Some(GeoValue::StringList(lines)) => lines.iter().cloned().collect(),
		_ => HashSet::new(),
	}
}

/// Normalizes `kind=station` features whose `name` matches `Name (Line A, Line B)`: the
/// parenthetical becomes the `subway_lines` set (if not already present), and features
/// sharing the stripped name are merged by intersecting their `subway_lines` sets.
/// Re-sorts the result with the `pois` sorter.
#[must_use]
pub fn normalize_and_merge_duplicate_stations(features: &[Feature]) -> Vec<Feature> {
	let mut merged: Vec<Feature> = Vec::new();
	let mut index_by_name: HashMap<String, usize> = HashMap::new();

	for f in features {
		if f.properties.get("kind").map(GeoValue::to_string).as_deref() != Some("station") {
			merged.push(f.clone());
			continue;
		}

		let Some(name) = f.properties.get("name").map(GeoValue::to_string) else {
			merged.push(f.clone());
			continue;
		};

		let mut normalized = f.clone();
		let (stripped, lines) = match STATION_NAME.captures(&name) {
			Some(caps) => {
				let stripped = caps[1].trim().to_string();
				let lines: HashSet<String> = caps[2].split(',').map(|s| s.trim().to_string()).collect();
				(stripped, lines)
			}
			None => (name.clone(), HashSet::new()),
		};

		if normalized.properties.get("subway_lines").is_none() && !lines.is_empty() {
			let list: Vec<String> = lines.iter().cloned().collect();
			normalized.properties.insert("subway_lines".to_string(), GeoValue::from(list));
		}
		normalized.properties.insert("name".to_string(), GeoValue::from(stripped.clone()));

		if let Some(&idx) = index_by_name.get(&stripped) {
			let existing_lines = subway_lines(&merged[idx]);
			let new_lines = subway_lines(&normalized);
			let intersected: Vec<String> = existing_lines.intersection(&new_lines).cloned().collect();
			merged[idx].properties.insert("subway_lines".to_string(), GeoValue::from(intersected));
		} else {
			index_by_name.insert(stripped, merged.len());
			merged.push(normalized);
		}
	}

	sort_pois(&mut merged);
	merged
}
