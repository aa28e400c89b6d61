//! Per-feature transforms (§4.2): stateless `(shape, props, fid, zoom) -> (shape, props, fid)`
//! mutators, exposed as a name-keyed registry so a `transform_fns` config list can be
//! composed left-to-right at tile setup time (§9 Design Notes: "Closures as configured
//! pipelines").

use crate::feature::Feature;
use crate::value::{abbreviate_street_name, to_float, to_float_meters};
use anyhow::Result;
use std::collections::HashMap;
use vectile_geometry::geo::{GeoValue, Geometry};

pub type TransformFn = fn(&mut Feature, zoom: u8) -> Result<()>;

fn get_str<'a>(f: &'a Feature, key: &str) -> Option<&'a str> {
	match f.properties.get(key) {
		Some(GeoValue::String(s)) => Some(s.as_str()),
		_ => None,
	}
}

fn set_str(f: &mut Feature, key: &str, value: impl Into<String>) {
	f.properties.insert(key.to_string(), GeoValue::from(value.into()));
}

/// Builds the registry of all recognized transforms, keyed by the names used in a
/// `transform_fns` config list.
#[must_use]
pub fn registry() -> HashMap<&'static str, TransformFn> {
	let mut m: HashMap<&'static str, TransformFn> = HashMap::new();
	m.insert("add_id_to_properties", add_id_to_properties);
	m.insert("detect_osm_relation", detect_osm_relation);
	m.insert("remove_feature_id", remove_feature_id);
	m.insert("building_kind", building_kind);
	m.insert("building_height", building_height);
	m.insert("building_min_height", building_min_height);
	m.insert("road_kind", road_kind);
	m.insert("road_classifier", road_classifier);
	m.insert("road_sort_key", road_sort_key);
	m.insert("road_oneway", road_oneway);
	m.insert("road_abbreviate_name", road_abbreviate_name);
	m.insert("route_name", route_name);
	m.insert("place_ne_capital", place_ne_capital);
	m.insert("boundary_kind", boundary_kind);
	m.insert("tags_create_dict", tags_create_dict);
	m.insert("tags_remove", tags_remove);
	m.insert("tags_name_i18n", tags_name_i18n);
	m.insert("parse_layer_as_float", parse_layer_as_float);
	m
}

/// Runs `names` (already resolved via [`registry`]) over `f` in order, for the given `zoom`.
pub fn run_pipeline(fns: &[TransformFn], f: &mut Feature, zoom: u8) -> Result<()> {
	for func in fns {
		func(f, zoom)?;
	}
	Ok(())
}

pub fn add_id_to_properties(f: &mut Feature, _zoom: u8) -> Result<()> {
	if let Some(fid) = f.fid {
		f.properties.insert("id".to_string(), GeoValue::from(fid));
	}
	Ok(())
}

pub fn detect_osm_relation(f: &mut Feature, _zoom: u8) -> Result<()> {
	if f.fid.is_some_and(|v| v < 0) {
		f.properties.insert("osm_relation".to_string(), GeoValue::from(true));
	}
	Ok(())
}

pub fn remove_feature_id(f: &mut Feature, _zoom: u8) -> Result<()> {
	f.fid = None;
	Ok(())
}

fn coalesce_str(f: &Feature, keys: &[&str]) -> Option<String> {
	keys.iter().find_map(|key| get_str(f, key).map(str::to_string))
}

pub fn building_kind(f: &mut Feature, _zoom: u8) -> Result<()> {
	if f.properties.get("kind").is_some() {
		return Ok(());
	}
	let building = coalesce_str(f, &["building:part", "building"]);
	let kind = match building {
		Some(b) if b != "yes" => Some(b),
		_ => coalesce_str(f, &["amenity", "shop", "tourism"]),
	};
	if let Some(kind) = kind {
		set_str(f, "kind", kind);
	}
	Ok(())
}

fn resolve_height(f: &mut Feature, direct_key: &str, levels_key: &str, levels_to_meters: impl Fn(f64) -> f64) {
	if let Some(v) = to_float_meters(get_str(f, direct_key)) {
		set_str(f, direct_key, v.to_string());
		return;
	}
	if let Some(levels) = to_float(get_str(f, levels_key)) {
		set_str(f, direct_key, levels_to_meters(levels).to_string());
		return;
	}
	f.properties.remove(direct_key);
}

pub fn building_height(f: &mut Feature, _zoom: u8) -> Result<()> {
	resolve_height(f, "height", "building:levels", |levels| levels * 3.0 + 2.0);
	Ok(())
}

pub fn building_min_height(f: &mut Feature, _zoom: u8) -> Result<()> {
	resolve_height(f, "min_height", "building:min_levels", |levels| levels * 3.0);
	Ok(())
}

const ROAD_KIND_HIGHWAY: &[&str] = &["motorway", "motorway_link", "trunk", "trunk_link"];
const ROAD_KIND_MAJOR_ROAD: &[&str] =
	&["primary", "primary_link", "secondary", "secondary_link", "tertiary", "tertiary_link"];
const ROAD_KIND_PATH: &[&str] = &["footway", "steps", "pedestrian", "path", "cycleway", "bridleway", "track"];
const ROAD_KIND_RAIL: &[&str] = &["rail", "light_rail", "subway", "tram", "funicular", "narrow_gauge"];

pub fn road_kind(f: &mut Feature, _zoom: u8) -> Result<()> {
	if get_str(f, "source") == Some("naturalearthdata.com") {
		return Ok(());
	}
	if get_str(f, "route") == Some("ferry") {
		set_str(f, "kind", "ferry");
		return Ok(());
	}
	if let Some(rail) = get_str(f, "railway").map(str::to_string) {
		if ROAD_KIND_RAIL.contains(&rail.as_str()) {
			set_str(f, "kind", "rail");
			return Ok(());
		}
	}
	if let Some(hw) = get_str(f, "highway").map(str::to_string) {
		let kind = if ROAD_KIND_HIGHWAY.contains(&hw.as_str()) {
			"highway"
		} else if ROAD_KIND_MAJOR_ROAD.contains(&hw.as_str()) {
			"major_road"
		} else if ROAD_KIND_PATH.contains(&hw.as_str()) {
			"path"
		} else {
			"minor_road"
		};
		set_str(f, "kind", kind);
	}
	Ok(())
}

fn yes_no(f: &Feature, key: &str) -> &'static str {
	if get_str(f, key) == Some("yes") {
		"yes"
	} else {
		"no"
	}
}

pub fn road_classifier(f: &mut Feature, _zoom: u8) -> Result<()> {
	let is_link = get_str(f, "highway").is_some_and(|v| v.ends_with("_link"));
	let is_tunnel = yes_no(f, "tunnel").to_string();
	let is_bridge = yes_no(f, "bridge").to_string();
	set_str(f, "is_link", if is_link { "yes" } else { "no" });
	set_str(f, "is_tunnel", is_tunnel);
	set_str(f, "is_bridge", is_bridge);
	Ok(())
}

/// The per-class figures in §4.2 are absolute sort-key values (the "base value 15" they
/// are described against is already folded in — see §8 S5, which is explicit that no
/// separate `+15` is performed). Adjusted for zoom/bridge/tunnel/layer.
pub fn road_sort_key(f: &mut Feature, zoom: u8) -> Result<()> {
	const DEFAULT: i64 = 15;
	let highway = get_str(f, "highway").map(str::to_string);
	let railway = get_str(f, "railway").map(str::to_string);
	let aeroway = get_str(f, "aeroway").map(str::to_string);

	let mut key = if railway.is_some() {
		match get_str(f, "service") {
			Some("spur") | Some("siding") => 23 - 6,
			Some("yard") => 23 - 7,
			Some(_) => 23 - 8,
			None => 23,
		}
	} else if aeroway.as_deref() == Some("runway") {
		20
	} else if aeroway.as_deref() == Some("taxiway") {
		19
	} else if let Some(hw) = highway.as_deref() {
		match hw {
			"motorway" | "motorway_link" => 24,
			"trunk" | "trunk_link" => 22,
			"primary" | "primary_link" => 21,
			"secondary" | "secondary_link" => 20,
			"tertiary" | "tertiary_link" => 19,
			hw if hw.ends_with("_link") => 18,
			"residential" | "unclassified" | "living_street" => 17,
			"service" => 16,
			_ => DEFAULT,
		}
	} else {
		DEFAULT
	};

	if zoom >= 15 {
		if get_str(f, "bridge") == Some("yes") {
			key += 10;
		} else if get_str(f, "tunnel") == Some("yes")
			|| (highway.as_deref() == Some("subway") && get_str(f, "tunnel") != Some("no"))
		{
			key -= 10;
		}
		if let Some(layer) = get_str(f, "layer").and_then(|v| v.parse::<i64>().ok()) {
			if (-5..=5).contains(&layer) {
				key = if layer > 0 { layer + 34 } else { layer + 5 };
			}
		}
	}

	f.properties.insert("sort_key".to_string(), GeoValue::from(key.clamp(0, 39)));
	Ok(())
}

pub fn road_oneway(f: &mut Feature, _zoom: u8) -> Result<()> {
	match get_str(f, "oneway") {
		Some("-1") | Some("reverse") => {
			set_str(f, "oneway", "yes");
			f.geometry = reverse_line_direction(&f.geometry);
		}
		Some("yes") | Some("1") | Some("true") => set_str(f, "oneway", "yes"),
		_ => set_str(f, "oneway", "no"),
	}
	Ok(())
}

/// Returns a new geometry with line/multi-line vertex order reversed, rather than
/// mutating in place (§9 Design Notes: not every target representation supports
/// in-place mutation, so the caller substitutes the returned shape).
fn reverse_line_direction(geometry: &Geometry) -> Geometry {
	match geometry {
		Geometry::LineString(g) => {
			let mut coords = g.0.clone();
			coords.reverse();
			Geometry::LineString(vectile_geometry::geo::LineStringGeometry(coords))
		}
		Geometry::MultiLineString(g) => {
			let lines = g
				.0
				.iter()
				.map(|line| {
					let mut coords = line.0.clone();
					coords.reverse();
					vectile_geometry::geo::LineStringGeometry(coords)
				})
				.collect();
			Geometry::MultiLineString(vectile_geometry::geo::MultiLineStringGeometry(lines))
		}
		other => other.clone(),
	}
}

pub fn road_abbreviate_name(f: &mut Feature, _zoom: u8) -> Result<()> {
	if let Some(name) = get_str(f, "name").map(str::to_string) {
		set_str(f, "name", abbreviate_street_name(&name));
	}
	Ok(())
}

pub fn route_name(f: &mut Feature, _zoom: u8) -> Result<()> {
	if let (Some(r), Some(name)) = (get_str(f, "ref").map(str::to_string), get_str(f, "name").map(str::to_string)) {
		if !name.contains(&r) {
			set_str(f, "name", format!("{r} {name}"));
		}
	}
	Ok(())
}

pub fn place_ne_capital(f: &mut Feature, _zoom: u8) -> Result<()> {
	let is_place = matches!(get_str(f, "place"), Some("city") | Some("town"));
	let is_capital = get_str(f, "featurecla").is_some_and(|v| v.to_lowercase().contains("capital"));
	if is_place && is_capital {
		f.properties.insert("is_capital".to_string(), GeoValue::from(true));
	}
	Ok(())
}

pub fn boundary_kind(f: &mut Feature, _zoom: u8) -> Result<()> {
	if get_str(f, "boundary_type") == Some("aboriginal_lands") {
		set_str(f, "kind", "aboriginal_lands");
		return Ok(());
	}
	if let Some(level) = get_str(f, "admin_level").and_then(|v| v.parse::<i64>().ok()) {
		let kind = match level {
			2 => Some("country"),
			4 => Some("state"),
			6 => Some("county"),
			8 => Some("municipality"),
			_ => None,
		};
		if let Some(kind) = kind {
			set_str(f, "kind", kind);
		}
	}
	Ok(())
}

const I18N_PREFIXES: &[&str] = &["name:", "alt_name:", "old_name:", "left:name:", "right:name:"];

pub fn tags_create_dict(f: &mut Feature, _zoom: u8) -> Result<()> {
	if let Some(GeoValue::Map(tags)) = f.properties.get("tags").cloned() {
		for (k, v) in tags {
			f.properties.insert(k, v);
		}
	}
	Ok(())
}

pub fn tags_remove(f: &mut Feature, _zoom: u8) -> Result<()> {
	f.properties.remove("tags");
	Ok(())
}

pub fn tags_name_i18n(f: &mut Feature, _zoom: u8) -> Result<()> {
	let main_name = get_str(f, "name").map(str::to_string);
	let Some(GeoValue::Map(tags)) = f.properties.get("tags").cloned() else {
		return Ok(());
	};
	let mut promoted = Vec::new();
	for (k, v) in &tags {
		if I18N_PREFIXES.iter().any(|p| k.starts_with(p)) {
			if let GeoValue::String(s) = v {
				if Some(s) != main_name.as_ref() {
					promoted.push((k.clone(), v.clone()));
				}
			}
		}
	}
	for (k, v) in promoted {
		f.properties.insert(k, v);
	}
	Ok(())
}

pub fn parse_layer_as_float(f: &mut Feature, _zoom: u8) -> Result<()> {
	match get_str(f, "layer").map(str::to_string) {
		Some(s) => match s.parse::<f64>() {
			Ok(v) => f.properties.insert("layer".to_string(), GeoValue::from(v)),
			Err(_) => f.properties.remove("layer"),
		},
		None => {}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_geometry::geo::PointGeometry;

	fn feature_with(props: Vec<(&str, &str)>) -> Feature {
		let mut f = Feature::new(Geometry::Point(PointGeometry::from([0.0, 0.0])));
		for (k, v) in props {
			f.properties.insert(k.to_string(), GeoValue::from(v));
		}
		f
	}

	#[test]
	fn building_kind_falls_through_yes_to_amenity_group() {
		let mut f = feature_with(vec![("building", "yes"), ("shop", "bakery")]);
		building_kind(&mut f, 10).unwrap();
		assert_eq!(get_str(&f, "kind"), Some("bakery"));
	}

	#[test]
	fn building_kind_skips_when_already_set() {
		let mut f = feature_with(vec![("kind", "custom"), ("building", "house")]);
		building_kind(&mut f, 10).unwrap();
		assert_eq!(get_str(&f, "kind"), Some("custom"));
	}

	#[test]
	fn road_kind_naturalearth_is_untouched() {
		let mut f = feature_with(vec![("source", "naturalearthdata.com"), ("highway", "motorway")]);
		road_kind(&mut f, 10).unwrap();
		assert_eq!(f.properties.get("kind"), None);
	}

	#[test]
	fn road_kind_classifies_minor_road() {
		let mut f = feature_with(vec![("highway", "residential")]);
		road_kind(&mut f, 10).unwrap();
		assert_eq!(get_str(&f, "kind"), Some("minor_road"));
	}

	#[test]
	fn road_sort_key_s5_scenario() {
		// S5: {highway:secondary, bridge:yes} at z>=15 -> sort key 30
		let mut f = feature_with(vec![("highway", "secondary"), ("bridge", "yes")]);
		road_sort_key(&mut f, 15).unwrap();
		assert_eq!(f.properties.get("sort_key"), Some(&GeoValue::from(30i64)));
	}

	#[test]
	fn road_sort_key_aeroway_runway_and_taxiway() {
		let mut f = feature_with(vec![("aeroway", "runway")]);
		road_sort_key(&mut f, 10).unwrap();
		assert_eq!(f.properties.get("sort_key"), Some(&GeoValue::from(20i64)));

		let mut f = feature_with(vec![("aeroway", "taxiway")]);
		road_sort_key(&mut f, 10).unwrap();
		assert_eq!(f.properties.get("sort_key"), Some(&GeoValue::from(19i64)));
	}

	#[test]
	fn detect_osm_relation_on_negative_fid() {
		let mut f = feature_with(vec![]);
		f.fid = Some(-12);
		detect_osm_relation(&mut f, 0).unwrap();
		assert_eq!(f.properties.get("osm_relation"), Some(&GeoValue::from(true)));
	}

	#[test]
	fn remove_feature_id_clears_fid() {
		let mut f = feature_with(vec![]);
		f.fid = Some(7);
		remove_feature_id(&mut f, 0).unwrap();
		assert_eq!(f.fid, None);
	}

	#[test]
	fn road_oneway_reverses_on_minus_one() {
		let mut f = Feature::new(Geometry::LineString(vectile_geometry::geo::LineStringGeometry::from(&[
			[0.0, 0.0],
			[1.0, 1.0],
		])));
		f.properties.insert("oneway".to_string(), GeoValue::from("-1"));
		road_oneway(&mut f, 0).unwrap();
		assert_eq!(get_str(&f, "oneway"), Some("yes"));
		if let Geometry::LineString(g) = &f.geometry {
			assert_eq!(g.0[0].x(), 1.0);
		} else {
			panic!("expected LineString");
		}
	}

	#[test]
	fn route_name_prepends_ref_when_missing() {
		let mut f = feature_with(vec![("ref", "US-1"), ("name", "Main Street")]);
		route_name(&mut f, 0).unwrap();
		assert_eq!(get_str(&f, "name"), Some("US-1 Main Street"));
	}

	#[test]
	fn idempotence_road_sort_key() {
		let mut f = feature_with(vec![("highway", "secondary"), ("bridge", "yes")]);
		road_sort_key(&mut f, 16).unwrap();
		let once = f.properties.get("sort_key").cloned();
		road_sort_key(&mut f, 16).unwrap();
		assert_eq!(f.properties.get("sort_key").cloned(), once);
	}
}
