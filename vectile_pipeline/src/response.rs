//! `render_tile` (§2, §4.8): the driver that ties query building, fetch, the transform
//! pipeline, layer post-processors, and encoding together for one tile request.

use crate::cache::ColumnCache;
use crate::config::LayerConfig;
use crate::error::PipelineErrorKind;
use crate::feature::{Feature, FeatureLayer, TileCoord};
use crate::ingest::geometry_from_wkb;
use crate::pool::{with_retry, PgPool, PoolCache};
use crate::query::{build_query, probe_query, QueryOptions, TileBounds};
use crate::sorters;
use crate::transforms;
use anyhow::{Context, Result};
use log::{debug, warn};
use postgres::Row;
use std::f64::consts::PI;
use vectile_geometry::geo::GeoValue;

const EARTH_RADIUS: f64 = 6_378_137.0;

/// Tile bounds in spherical mercator meters for a slippy-map `(z, x, y)` tile at the
/// standard 256 CSS-pixel extent (§3).
#[must_use]
pub fn mercator_tile_bounds(coord: TileCoord) -> [f64; 4] {
	let world_size = 2.0 * PI * EARTH_RADIUS;
	let n = f64::from(1u32 << coord.z);
	let tile_size = world_size / n;
	let xmin = -world_size / 2.0 + f64::from(coord.x) * tile_size;
	let ymax = world_size / 2.0 - f64::from(coord.y) * tile_size;
	[xmin, ymax - tile_size, xmin + tile_size, ymax]
}

fn geo_value_from_row(row: &Row, index: usize) -> Option<GeoValue> {
	use postgres::types::Type;
	let column = &row.columns()[index];
	match *column.type_() {
		Type::BOOL => row.get::<_, Option<bool>>(index).map(GeoValue::from),
		Type::INT2 => row.get::<_, Option<i16>>(index).map(|v| GeoValue::from(i64::from(v))),
		Type::INT4 => row.get::<_, Option<i32>>(index).map(|v| GeoValue::from(i64::from(v))),
		Type::INT8 => row.get::<_, Option<i64>>(index).map(GeoValue::from),
		Type::FLOAT4 => row.get::<_, Option<f32>>(index).map(|v| GeoValue::from(f64::from(v))),
		Type::FLOAT8 => row.get::<_, Option<f64>>(index).map(GeoValue::from),
		Type::TEXT | Type::VARCHAR | Type::BPCHAR => row.get::<_, Option<String>>(index).map(GeoValue::from),
		_ => row.get::<_, Option<String>>(index).map(GeoValue::from),
	}
}

/// Builds a [`Feature`] from one result row: `__geometry__` is parsed from WKB,
/// `__id__` becomes `fid` when present and parseable, every other non-null column
/// becomes a property (§3: "keys with null values are elided on emission").
fn feature_from_row(row: &Row) -> Result<Feature> {
	let geometry_index = row.columns().iter().position(|c| c.name() == "__geometry__").context("query result is missing __geometry__").map_err(|e| e.context(PipelineErrorKind::Config))?;
	let wkb: Vec<u8> = row.get(geometry_index);
	let geometry = geometry_from_wkb(&wkb)?;

	let mut feature = Feature::new(geometry);
	for (index, column) in row.columns().iter().enumerate() {
		let name = column.name();
		if name == "__geometry__" {
			continue;
		}
		if name == "__id__" {
			if let Some(id) = row.get::<_, Option<String>>(index) {
				feature.fid = i64::from_str_radix(&id, 16).ok();
			}
			continue;
		}
		if let Some(value) = geo_value_from_row(row, index) {
			feature.properties.insert(name.to_string(), value);
		}
	}
	Ok(feature)
}

/// Runs `layer`'s configured `transform_fns` over every feature, in order (§4.2). A
/// transform that errors drops the offending feature and continues the tile (§7:
/// feature-level errors are non-fatal).
fn run_transforms(features: Vec<Feature>, layer: &LayerConfig, zoom: u8) -> Vec<Feature> {
	let registry = transforms::registry();
	let pipeline: Vec<_> = layer.transform_fns.iter().filter_map(|name| registry.get(name.as_str()).copied().map(|f| (name, f))).collect();
	features
		.into_iter()
		.filter_map(|mut feature| {
			for (name, transform) in &pipeline {
				if let Err(error) = transform(&mut feature, zoom) {
					warn!("transform '{name}' failed, dropping feature: {error}");
					return None;
				}
			}
			Some(feature)
		})
		.collect()
}

fn probe_columns(pool: &PgPool, subquery: &str) -> Result<Vec<String>> {
	let probe = probe_query(subquery)?;
	let limited = format!("SELECT * FROM ({probe}) AS __vectile_probe__ LIMIT 0");
	with_retry(pool, |conn| conn.query(&limited, &[])).map(|rows: Vec<Row>| {
		rows.first().map(|r| r.columns().iter().map(|c| c.name().to_string()).collect()).unwrap_or_default()
	})
}

/// Fetches, transforms, and sorts one layer's features for `coord` (§2's control flow
/// up to, but not including, post-processing and encoding — those are driven by the
/// caller across multiple layers).
pub fn fetch_layer(pools: &PoolCache, cache: &ColumnCache, layer: &LayerConfig, coord: TileCoord) -> Result<FeatureLayer> {
	let Some(subquery) = layer.query_for_zoom(coord.z) else {
		debug!("layer '{}' has no query at zoom {}, emitting empty layer", layer.name, coord.z);
		return Ok(FeatureLayer::new(layer.name.clone(), Vec::new()));
	};
	let pool = pools.pool_for(&layer.dbinfo)?;

	let _columns = cache.columns_for(&pool, subquery, probe_columns)?;

	let bounds = mercator_tile_bounds(coord);
	let tile_bounds = TileBounds { xmin: bounds[0], ymin: bounds[1], xmax: bounds[2], ymax: bounds[3], pad: 0.0 };
	let options = QueryOptions {
		srid: layer.srid,
		clip: layer.clip,
		simplify: layer.simplify,
		simplify_until: layer.simplify_until,
		suppress_simplification: layer.suppress_simplification.iter().copied().collect(),
		simplify_before_intersect: layer.simplify_before_intersect,
		geographic_output: false,
		target_scale: None,
	};
	let sql = build_query(subquery, coord, &tile_bounds, &options)?;

	let rows = with_retry(&pool, |conn| conn.query(&sql, &[]))?;
	let mut features = Vec::with_capacity(rows.len());
	for row in &rows {
		match feature_from_row(row) {
			Ok(feature) => features.push(feature),
			Err(error) => warn!("dropping feature for layer '{}': {error}", layer.name),
		}
	}

	if !layer.geometry_types.is_empty() {
		features.retain(|f| layer.geometry_types.contains(geometry_type_name(&f.geometry)));
	}

	let features = run_transforms(features, layer, coord.z);
	let mut layer_out = FeatureLayer::new(layer.name.clone(), features);
	if let Some(sort_fn) = layer.sort_fn.as_deref() {
		if let Some(sorter) = sorters::by_name(sort_fn) {
			sorter(&mut layer_out.features);
		}
	}
	Ok(layer_out)
}

/// Output encodings a rendered tile can be dispatched to (§4.5-§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFormat {
	GeoJson,
	TopoJson,
	Mvt,
}

/// The bytes of one rendered tile, tagged with the format they were encoded as.
pub struct TileResponse {
	pub format: TileFormat,
	pub bytes: Vec<u8>,
}

/// Drives one full tile render (§2): fetch every configured layer, hand the assembled
/// set to `postprocess` for the cross-feature operations (§4.4) configured for this
/// deployment, then encode. `postprocess` is a caller-supplied closure rather than a
/// config-resolved name list — unlike per-feature transforms, post-processors compose
/// layers against each other (`intercut`, `admin_boundaries`, ...) in ways specific to
/// a given set of layer configs, not a flat per-layer function name.
pub fn render_tile(
	pools: &PoolCache,
	cache: &ColumnCache,
	layers: &[LayerConfig],
	coord: TileCoord,
	postprocess: impl FnOnce(&mut Vec<FeatureLayer>) -> Result<()>,
	format: TileFormat,
) -> Result<TileResponse> {
	let mut fetched = Vec::with_capacity(layers.len());
	for layer in layers {
		fetched.push(fetch_layer(pools, cache, layer, coord)?);
	}
	postprocess(&mut fetched)?;

	let bytes = match format {
		TileFormat::GeoJson => crate::encode::geojson::encode(&fetched, coord.z, true)?.into_bytes(),
		TileFormat::TopoJson => {
			let bounds = mercator_tile_bounds(coord);
			crate::encode::topojson::encode(&fetched, bounds, 4096.0)?.into_bytes()
		}
		TileFormat::Mvt => crate::encode::mvt::encode(&fetched, crate::encode::mvt::DEFAULT_EXTENT)?,
	};
	Ok(TileResponse { format, bytes })
}

fn geometry_type_name(geometry: &vectile_geometry::geo::Geometry) -> &'static str {
	use vectile_geometry::geo::Geometry as G;
	match geometry {
		G::Point(_) => "Point",
		G::MultiPoint(_) => "MultiPoint",
		G::LineString(_) => "LineString",
		G::LinearRing(_) => "LinearRing",
		G::MultiLineString(_) => "MultiLineString",
		G::Polygon(_) => "Polygon",
		G::MultiPolygon(_) => "MultiPolygon",
		G::GeometryCollection(_) => "GeometryCollection",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tile_0_0_0_covers_the_whole_mercator_world() {
		let bounds = mercator_tile_bounds(TileCoord::new(0, 0, 0).unwrap());
		let world_half = PI * EARTH_RADIUS;
		assert!((bounds[0] + world_half).abs() < 1.0);
		assert!((bounds[3] - world_half).abs() < 1.0);
	}

	#[test]
	fn tile_bounds_shrink_with_zoom() {
		let b0 = mercator_tile_bounds(TileCoord::new(0, 0, 0).unwrap());
		let b1 = mercator_tile_bounds(TileCoord::new(1, 0, 0).unwrap());
		assert!((b1[2] - b1[0]) < (b0[2] - b0[0]));
	}
}
