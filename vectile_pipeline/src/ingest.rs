//! WKB ingestion (§3: "interconvertible with WKB").
//!
//! The response assembler receives rows from Postgres with a `__geometry__` column
//! carrying `ST_AsBinary` output; this module turns those bytes into our own
//! [`Geometry`], going through `geo-types` via `geozero` (already in the workspace for
//! this purpose, see DESIGN.md) rather than writing a WKB parser from scratch.

use crate::error::PipelineErrorKind;
use anyhow::{Context, Result};
use geozero::{wkb::Wkb, ToGeo};
use vectile_geometry::geo::Geometry;

fn coord(c: geo_types::Coord<f64>) -> [f64; 2] {
	[c.x, c.y]
}

fn line_string_coords(ls: &geo_types::LineString<f64>) -> Vec<[f64; 2]> {
	ls.coords().map(|&c| coord(c)).collect()
}

fn polygon_rings(polygon: &geo_types::Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
	std::iter::once(line_string_coords(polygon.exterior())).chain(polygon.interiors().iter().map(line_string_coords)).collect()
}

/// Converts a `geo-types` geometry (as produced by `geozero::ToGeo`) into our own
/// [`Geometry`]. `Line`, `Rect`, and `Triangle` have no direct variant here; they are
/// widened to their equivalent `LineString`/`Polygon` representation.
fn from_geo_types(geometry: geo_types::Geometry<f64>) -> Result<Geometry> {
	use geo_types::Geometry as G;
	Ok(match geometry {
		G::Point(p) => Geometry::new_point(coord(p.0)),
		G::Line(l) => Geometry::new_line_string(vec![coord(l.start), coord(l.end)]),
		G::LineString(ls) => Geometry::new_line_string(line_string_coords(&ls)),
		G::Polygon(p) => Geometry::new_polygon(polygon_rings(&p)),
		G::MultiPoint(mp) => Geometry::new_multi_point(mp.0.iter().map(|p| coord(p.0)).collect()),
		G::MultiLineString(mls) => Geometry::new_multi_line_string(mls.0.iter().map(line_string_coords).collect()),
		G::MultiPolygon(mp) => Geometry::new_multi_polygon(mp.0.iter().map(polygon_rings).collect()),
		G::GeometryCollection(gc) => Geometry::new_geometry_collection(gc.0.into_iter().map(from_geo_types).collect::<Result<Vec<_>>>()?),
		G::Rect(r) => Geometry::new_polygon(polygon_rings(&r.to_polygon())),
		G::Triangle(t) => Geometry::new_polygon(polygon_rings(&t.to_polygon())),
	})
}

/// Parses a single `ST_AsBinary`-style WKB blob into our [`Geometry`]. A parse failure
/// or unrecognized geometry type is a feature-level error (§7): the caller should drop
/// the offending feature and continue the tile render rather than fail it outright.
pub fn geometry_from_wkb(bytes: &[u8]) -> Result<Geometry> {
	let geo = Wkb(bytes).to_geo().context("failed to parse WKB").map_err(|e| e.context(PipelineErrorKind::FeatureLevel))?;
	from_geo_types(geo).map_err(|e| e.context(PipelineErrorKind::FeatureLevel))
}

#[cfg(test)]
mod tests {
	use super::*;
	use geozero::{CoordDimensions, ToWkb};

	fn point_wkb() -> Vec<u8> {
		let geo = geo_types::Geometry::Point(geo_types::Point::new(1.0, 2.0));
		geo.to_wkb(CoordDimensions::default()).unwrap()
	}

	#[test]
	fn parses_a_point() {
		let geometry = geometry_from_wkb(&point_wkb()).unwrap();
		assert!(matches!(geometry, Geometry::Point(_)));
	}

	#[test]
	fn malformed_bytes_are_a_feature_level_error() {
		let err = geometry_from_wkb(&[0xff, 0x00]).unwrap_err();
		assert!(crate::error::is_kind(&err, PipelineErrorKind::FeatureLevel));
	}
}
