//! SQL fetch-query composition (§4.8 `build_query`).
//!
//! Builds the SQL string a `Provider` sends to Postgres/PostGIS for one tile/layer
//! request: bbox clipping, simplification (ordered to avoid tile-edge seams), optional
//! geographic reprojection, optional scale transform, and `__id__` synthesis, wrapping
//! the caller's subquery (which may reference `!bbox!`).

use crate::error::PipelineErrorKind;
use crate::feature::TileCoord;
use anyhow::{anyhow, Context, Result};
use std::f64::consts::PI;

/// Earth radius in meters, spherical mercator (EPSG:3857/900913).
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Parameters controlling how `build_query` shapes the user's subquery. Mirrors the
/// `queries[z]`-adjacent per-layer config keys in §6.
#[derive(Clone, Debug)]
pub struct QueryOptions {
	pub srid: i32,
	pub clip: bool,
	pub simplify: f64,
	pub simplify_until: u8,
	pub suppress_simplification: Vec<u8>,
	pub simplify_before_intersect: bool,
	pub geographic_output: bool,
	pub target_scale: Option<f64>,
}

impl Default for QueryOptions {
	fn default() -> Self {
		QueryOptions {
			srid: 900_913,
			clip: true,
			simplify: 1.0,
			simplify_until: 16,
			suppress_simplification: Vec::new(),
			simplify_before_intersect: false,
			geographic_output: false,
			target_scale: None,
		}
	}
}

/// Tile bounding box in the layer's working SRID, plus padding, in the same units as
/// the geometry (meters, for spherical mercator).
#[derive(Clone, Copy, Debug)]
pub struct TileBounds {
	pub xmin: f64,
	pub ymin: f64,
	pub xmax: f64,
	pub ymax: f64,
	pub pad: f64,
}

/// `simplify · (2π·R / 2^(z+8))` for `z < simplify_until`, else `None` — no
/// simplification. A zoom present in `suppress_simplification` also forces `None`.
#[must_use]
pub fn tolerance_for_zoom(zoom: u8, options: &QueryOptions) -> Option<f64> {
	if zoom >= options.simplify_until || options.suppress_simplification.contains(&zoom) {
		return None;
	}
	let circumference = 2.0 * PI * EARTH_RADIUS;
	Some(options.simplify * (circumference / 2f64.powi(i32::from(zoom) + 8)))
}

fn bbox_expr(bounds: &TileBounds, srid: i32) -> String {
	format!(
		"ST_SetSRID(ST_MakeBox2D(ST_MakePoint({},{}), ST_MakePoint({},{})), {})",
		bounds.xmin - bounds.pad,
		bounds.ymin - bounds.pad,
		bounds.xmax + bounds.pad,
		bounds.ymax + bounds.pad,
		srid
	)
}

/// Composes the full SQL string for one layer/tile/zoom combination, per the 7-step
/// algorithm in §4.8. `subquery` is the user-authored `queries[z]` entry; any `!bbox!`
/// token inside it is replaced with the tile bbox expression.
pub fn build_query(subquery: &str, coord: TileCoord, bounds: &TileBounds, options: &QueryOptions) -> Result<String> {
	if subquery.trim().is_empty() {
		return Err(anyhow!("empty subquery for tile {coord}").context(PipelineErrorKind::Config));
	}

	// 1. Bounding box.
	let exact_bbox = bbox_expr(bounds, options.srid);

	// 2/3. Simplify before or after intersecting with the exact bbox, per ordering flag.
	let tolerance = tolerance_for_zoom(coord.z, options);
	let mut geom_expr = "__geometry__".to_string();
	if let Some(tolerance) = tolerance {
		if options.simplify_before_intersect {
			let height = bounds.ymax - bounds.ymin;
			let grown = TileBounds { xmin: bounds.xmin - height * 0.1, ymin: bounds.ymin - height * 0.1, xmax: bounds.xmax + height * 0.1, ymax: bounds.ymax + height * 0.1, pad: bounds.pad };
			let envelope = bbox_expr(&grown, options.srid);
			geom_expr = format!("ST_Intersection({geom_expr}, {envelope})");
			geom_expr = format!("ST_MakeValid(ST_SimplifyPreserveTopology({geom_expr}, {tolerance}))");
			geom_expr = format!("ST_Intersection({geom_expr}, {exact_bbox})");
		} else {
			geom_expr = format!("ST_Intersection({geom_expr}, {exact_bbox})");
			geom_expr = format!("ST_SimplifyPreserveTopology({geom_expr}, {tolerance})");
		}
	} else if options.clip {
		geom_expr = format!("ST_Intersection({geom_expr}, {exact_bbox})");
	}

	// 4. Geographic output.
	if options.geographic_output {
		geom_expr = format!("ST_Transform({geom_expr}, 4326)");
	}

	// 5. Target-scale transform (MVT/OSciMap tile-local coordinates).
	if let Some(scale) = options.target_scale {
		let sx = scale / (bounds.xmax - bounds.xmin);
		let sy = scale / (bounds.ymax - bounds.ymin);
		geom_expr = format!("ST_TransScale({geom_expr}, {}, {}, {sx}, {sy})", -bounds.xmin, -bounds.ymin);
	}

	// §4.8's `!bbox!` substitution uses the exact tile bbox, not the simplification envelope.
	let resolved_subquery = subquery.replace("!bbox!", &exact_bbox);

	// 6. `__id__` synthesis, only when the subquery doesn't already project it.
	let id_expr = if resolved_subquery.contains("__id__") { String::new() } else { ", substr(md5(ST_AsBinary(__geometry__)), 1, 10) AS __id__".to_string() };

	// 7. Outer wrapper: validity + intersection filter.
	Ok(format!(
		"SELECT {geom_expr} AS __geometry__, * {id_expr} FROM ({resolved_subquery}) AS __vectile_sub__ \
		 WHERE ST_IsValid(__geometry__) AND ST_Intersects(__geometry__, {exact_bbox})"
	))
}

/// Substitutes `!bbox!` only (no simplification/clip/scale steps) — used for queries
/// that aren't geometry fetches, e.g. a column-discovery probe (§5's column cache).
#[must_use]
pub fn substitute_bbox(subquery: &str, bounds: &TileBounds, srid: i32) -> String {
	subquery.replace("!bbox!", &bbox_expr(bounds, srid))
}

pub(crate) fn probe_query(subquery: &str) -> Result<String> {
	let bounds = TileBounds { xmin: 0.0, ymin: 0.0, xmax: 0.0, ymax: 0.0, pad: 0.0 };
	Ok(substitute_bbox(subquery, &bounds, 900_913)).context("failed to build column-probe query")
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn coord(z: u8) -> TileCoord {
		TileCoord::new(z, 0, 0).unwrap()
	}

	fn bounds() -> TileBounds {
		TileBounds { xmin: 0.0, ymin: 0.0, xmax: 100.0, ymax: 100.0, pad: 0.0 }
	}

	#[test]
	fn tolerance_is_none_at_or_above_simplify_until() {
		let options = QueryOptions::default();
		assert!(tolerance_for_zoom(16, &options).is_none());
	}

	#[test]
	fn tolerance_shrinks_with_zoom() {
		let options = QueryOptions::default();
		let t0 = tolerance_for_zoom(0, &options).unwrap();
		let t10 = tolerance_for_zoom(10, &options).unwrap();
		assert!(t10 < t0);
		assert_relative_eq!(t0, 1.0 * (2.0 * PI * EARTH_RADIUS / 256.0), epsilon = 1e-6);
	}

	#[test]
	fn suppressed_zoom_forces_no_simplification() {
		let mut options = QueryOptions::default();
		options.suppress_simplification.push(5);
		assert!(tolerance_for_zoom(5, &options).is_none());
	}

	#[test]
	fn bbox_token_is_substituted() {
		let query = build_query("SELECT geom AS __geometry__ FROM t WHERE geom && !bbox!", coord(10), &bounds(), &QueryOptions::default()).unwrap();
		assert!(query.contains("ST_MakeBox2D"));
		assert!(!query.contains("!bbox!"));
	}

	#[test]
	fn rejects_empty_subquery() {
		let err = build_query("   ", coord(0), &bounds(), &QueryOptions::default()).unwrap_err();
		assert!(crate::error::is_kind(&err, PipelineErrorKind::Config));
	}

	#[test]
	fn synthesizes_id_when_absent() {
		let query = build_query("SELECT geom AS __geometry__ FROM t", coord(10), &bounds(), &QueryOptions::default()).unwrap();
		assert!(query.contains("__id__"));
	}

	#[test]
	fn skips_id_synthesis_when_already_projected() {
		let query = build_query("SELECT geom AS __geometry__, id AS __id__ FROM t", coord(10), &bounds(), &QueryOptions::default()).unwrap();
		assert_eq!(query.matches("__id__").count(), 2);
	}
}
