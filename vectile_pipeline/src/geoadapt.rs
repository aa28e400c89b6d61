//! Geometry engine adapter (§1, §2: "Geometry engine adapter").
//!
//! The pipeline's own [`vectile_geometry::geo::Geometry`] enum is the wire/transform
//! representation; it does not implement spatial predicates itself (per §1 Non-goals:
//! "it depends on a geometry engine providing intersection, difference, ... and an
//! STR-tree spatial index"). This module converts to and from `geo`/`geo-types` so
//! that the layer post-processors (§4.4) can call into `geo`'s `BooleanOps`, `Area`,
//! and `BoundingRect` algorithms, then convert results back.

use geo::{Area, BooleanOps, BoundingRect, Contains};
use vectile_geometry::geo::{
	merge_bounds, Geometry, GeometryTrait as _, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry, MultiPolygonGeometry,
	PointGeometry, PolygonGeometry, RingGeometry,
};

/// Dispatches `contains_point` to whichever concrete geometry type `geometry` holds.
/// `Geometry` itself does not implement `GeometryTrait` (its variants do); this is the
/// one place that bridges the gap so callers can treat `Geometry` uniformly.
#[must_use]
pub fn geometry_contains_point(geometry: &Geometry, x: f64, y: f64) -> bool {
	match geometry {
		Geometry::Point(g) => g.contains_point(x, y),
		Geometry::LineString(g) => g.contains_point(x, y),
		Geometry::LinearRing(g) => g.contains_point(x, y),
		Geometry::Polygon(g) => g.contains_point(x, y),
		Geometry::MultiPoint(g) => g.contains_point(x, y),
		Geometry::MultiLineString(g) => g.contains_point(x, y),
		Geometry::MultiPolygon(g) => g.contains_point(x, y),
		Geometry::GeometryCollection(parts) => parts.iter().any(|g| geometry_contains_point(g, x, y)),
	}
}

/// Dispatches `to_mercator` to whichever concrete geometry type `geometry` holds.
#[must_use]
pub fn geometry_to_mercator(geometry: &Geometry) -> Geometry {
	match geometry {
		Geometry::Point(g) => Geometry::Point(g.to_mercator()),
		Geometry::LineString(g) => Geometry::LineString(g.to_mercator()),
		Geometry::LinearRing(g) => Geometry::LinearRing(g.to_mercator()),
		Geometry::Polygon(g) => Geometry::Polygon(g.to_mercator()),
		Geometry::MultiPoint(g) => Geometry::MultiPoint(g.to_mercator()),
		Geometry::MultiLineString(g) => Geometry::MultiLineString(g.to_mercator()),
		Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.to_mercator()),
		Geometry::GeometryCollection(parts) => Geometry::GeometryCollection(parts.iter().map(geometry_to_mercator).collect()),
	}
}

/// Dispatches `compute_bounds` to whichever concrete geometry type `geometry` holds.
#[must_use]
pub fn geometry_bounds(geometry: &Geometry) -> Option<[f64; 4]> {
	match geometry {
		Geometry::Point(g) => g.compute_bounds(),
		Geometry::LineString(g) => g.compute_bounds(),
		Geometry::LinearRing(g) => g.compute_bounds(),
		Geometry::Polygon(g) => g.compute_bounds(),
		Geometry::MultiPoint(g) => g.compute_bounds(),
		Geometry::MultiLineString(g) => g.compute_bounds(),
		Geometry::MultiPolygon(g) => g.compute_bounds(),
		Geometry::GeometryCollection(parts) => merge_bounds(parts.iter().filter_map(geometry_bounds)),
	}
}

fn ring_to_geo(ring: &RingGeometry) -> geo::LineString<f64> {
	geo::LineString::from(ring.0.iter().map(|c| geo::Coord { x: c.x(), y: c.y() }).collect::<Vec<_>>())
}

fn line_string_to_geo(line: &LineStringGeometry) -> geo::LineString<f64> {
	geo::LineString::from(line.0.iter().map(|c| geo::Coord { x: c.x(), y: c.y() }).collect::<Vec<_>>())
}

fn line_string_from_geo(line: &geo::LineString<f64>) -> LineStringGeometry {
	LineStringGeometry(line.0.iter().map(|c| vectile_geometry::geo::Coordinates::new(c.x, c.y)).collect())
}

fn multi_line_string_to_geo(mls: &MultiLineStringGeometry) -> geo::MultiLineString<f64> {
	geo::MultiLineString::new(mls.0.iter().map(line_string_to_geo).collect())
}

fn multi_point_to_geo(mp: &MultiPointGeometry) -> geo::MultiPoint<f64> {
	geo::MultiPoint::new(mp.0.iter().map(|p| geo::Point::new(p.x(), p.y())).collect())
}

fn line_length(line: &geo::LineString<f64>) -> f64 {
	line.0.windows(2).map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt()).sum()
}

/// A target shape as it flows through `_Cutter` (§4.4.1): point, line, or polygon.
/// `cut_shape` never changes a shape's variant, so an emitted piece always keeps the
/// dimensionality of the feature it was cut from.
pub enum GeoShape {
	Point(geo::MultiPoint<f64>),
	Line(geo::MultiLineString<f64>),
	Polygon(geo::MultiPolygon<f64>),
}

/// Converts any [`Geometry`] variant into the `GeoShape` `_Cutter` operates on.
/// `GeometryCollection` has no single dimensionality and is not cuttable.
#[must_use]
pub fn to_geo_shape(geometry: &Geometry) -> Option<GeoShape> {
	match geometry {
		Geometry::Point(p) => Some(GeoShape::Point(geo::MultiPoint::new(vec![geo::Point::new(p.x(), p.y())]))),
		Geometry::MultiPoint(mp) => Some(GeoShape::Point(multi_point_to_geo(mp))),
		Geometry::LineString(l) => Some(GeoShape::Line(geo::MultiLineString::new(vec![line_string_to_geo(l)]))),
		Geometry::LinearRing(r) => Some(GeoShape::Line(geo::MultiLineString::new(vec![ring_to_geo(r)]))),
		Geometry::MultiLineString(ml) => Some(GeoShape::Line(multi_line_string_to_geo(ml))),
		Geometry::Polygon(p) => Some(GeoShape::Polygon(geo::MultiPolygon::new(vec![polygon_to_geo(p)]))),
		Geometry::MultiPolygon(mp) => Some(GeoShape::Polygon(multi_polygon_to_geo(mp))),
		Geometry::GeometryCollection(_) => None,
	}
}

/// Converts a `GeoShape` back into our [`Geometry`], choosing the single-part variant
/// when the shape holds exactly one part.
#[must_use]
pub fn from_geo_shape(shape: GeoShape) -> Geometry {
	match shape {
		GeoShape::Point(mp) => {
			let points: Vec<PointGeometry> = mp.0.iter().map(|p| PointGeometry::new(vectile_geometry::geo::Coordinates::new(p.x(), p.y()))).collect();
			match points.len() {
				1 => Geometry::Point(points.into_iter().next().unwrap()),
				_ => Geometry::MultiPoint(MultiPointGeometry(points)),
			}
		}
		GeoShape::Line(mls) => {
			let lines: Vec<LineStringGeometry> = mls.0.iter().map(line_string_from_geo).collect();
			match lines.len() {
				1 => Geometry::LineString(lines.into_iter().next().unwrap()),
				_ => Geometry::MultiLineString(MultiLineStringGeometry(lines)),
			}
		}
		GeoShape::Polygon(mp) => from_geo_multi_polygon(mp),
	}
}

/// An empty shape of the same variant as `shape`.
#[must_use]
pub fn empty_like(shape: &GeoShape) -> GeoShape {
	match shape {
		GeoShape::Point(_) => GeoShape::Point(geo::MultiPoint::new(vec![])),
		GeoShape::Line(_) => GeoShape::Line(geo::MultiLineString::new(vec![])),
		GeoShape::Polygon(_) => GeoShape::Polygon(geo::MultiPolygon::new(vec![])),
	}
}

#[must_use]
pub fn clone_shape(shape: &GeoShape) -> GeoShape {
	match shape {
		GeoShape::Point(mp) => GeoShape::Point(mp.clone()),
		GeoShape::Line(mls) => GeoShape::Line(mls.clone()),
		GeoShape::Polygon(mp) => GeoShape::Polygon(mp.clone()),
	}
}

#[must_use]
pub fn shape_is_empty(shape: &GeoShape) -> bool {
	match shape {
		GeoShape::Point(mp) => mp.0.is_empty(),
		GeoShape::Line(mls) => mls.0.iter().all(|l| l.0.len() < 2),
		GeoShape::Polygon(mp) => mp.0.is_empty(),
	}
}

#[must_use]
pub fn shape_bounds(shape: &GeoShape) -> Option<[f64; 4]> {
	match shape {
		GeoShape::Point(mp) => mp.bounding_rect().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
		GeoShape::Line(mls) => mls.bounding_rect().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
		GeoShape::Polygon(mp) => bounds(mp),
	}
}

/// Area for polygons, total length for lines, point count for points; the denominator
/// used by the `overlap(min_fraction)` intersect func (§4.4.1).
#[must_use]
pub fn shape_measure(shape: &GeoShape) -> f64 {
	match shape {
		GeoShape::Point(mp) => mp.0.len() as f64,
		GeoShape::Line(mls) => mls.0.iter().map(line_length).sum(),
		GeoShape::Polygon(mp) => mp.unsigned_area(),
	}
}

/// Splits `shape` against `cutter` into `(inside, outside)` per §4.4.1's `cut` func.
/// Polygons use a true boolean intersection/difference. Lines and points have no
/// polygonal boolean op in `geo`, so they are classified vertex-by-vertex: a line is cut
/// into the maximal runs of consecutive points that fall on one side, matching the
/// boundary-splitting approach used by `exterior_boundaries`/`admin_boundaries`.
#[must_use]
pub fn cut_shape(shape: &GeoShape, cutter: &geo::MultiPolygon<f64>) -> (GeoShape, GeoShape) {
	match shape {
		GeoShape::Polygon(mp) => {
			let (inside, outside) = cut(mp, cutter);
			(GeoShape::Polygon(inside), GeoShape::Polygon(outside))
		}
		GeoShape::Point(mp) => {
			let (inside, outside): (Vec<geo::Point<f64>>, Vec<geo::Point<f64>>) = mp.0.iter().partition(|p| cutter.contains(*p));
			(GeoShape::Point(geo::MultiPoint::new(inside)), GeoShape::Point(geo::MultiPoint::new(outside)))
		}
		GeoShape::Line(mls) => {
			let mut inside_lines = Vec::new();
			let mut outside_lines = Vec::new();
			for line in &mls.0 {
				let mut inside_run = Vec::new();
				let mut outside_run = Vec::new();
				for coord in &line.0 {
					let point = geo::Point::new(coord.x, coord.y);
					if cutter.contains(&point) {
						if outside_run.len() > 1 {
							outside_lines.push(geo::LineString::from(std::mem::take(&mut outside_run)));
						} else {
							outside_run.clear();
						}
						inside_run.push(*coord);
					} else {
						if inside_run.len() > 1 {
							inside_lines.push(geo::LineString::from(std::mem::take(&mut inside_run)));
						} else {
							inside_run.clear();
						}
						outside_run.push(*coord);
					}
				}
				if inside_run.len() > 1 {
					inside_lines.push(geo::LineString::from(inside_run));
				}
				if outside_run.len() > 1 {
					outside_lines.push(geo::LineString::from(outside_run));
				}
			}
			(GeoShape::Line(geo::MultiLineString::new(inside_lines)), GeoShape::Line(geo::MultiLineString::new(outside_lines)))
		}
	}
}

pub fn polygon_to_geo(polygon: &PolygonGeometry) -> geo::Polygon<f64> {
	let mut rings = polygon.0.iter().map(ring_to_geo);
	let exterior = rings.next().unwrap_or_default();
	geo::Polygon::new(exterior, rings.collect())
}

pub fn multi_polygon_to_geo(mp: &MultiPolygonGeometry) -> geo::MultiPolygon<f64> {
	geo::MultiPolygon::new(mp.0.iter().map(polygon_to_geo).collect())
}

/// Converts any polygonal [`Geometry`] variant into a `geo::MultiPolygon`. Non-polygonal
/// variants convert to an empty multipolygon.
pub fn to_geo_multi_polygon(geometry: &Geometry) -> geo::MultiPolygon<f64> {
	match geometry {
		Geometry::Polygon(p) => geo::MultiPolygon::new(vec![polygon_to_geo(p)]),
		Geometry::MultiPolygon(mp) => multi_polygon_to_geo(mp),
		_ => geo::MultiPolygon::new(vec![]),
	}
}

/// Converts a `geo::MultiPolygon` back to our [`Geometry`], choosing the `Polygon`
/// variant when it holds exactly one ring-set, `MultiPolygon` otherwise.
pub fn from_geo_multi_polygon(mp: geo::MultiPolygon<f64>) -> Geometry {
	let polygons: Vec<PolygonGeometry> = mp.0.into_iter().map(PolygonGeometry::from).collect();
	match polygons.len() {
		1 => Geometry::Polygon(polygons.into_iter().next().unwrap()),
		_ => Geometry::MultiPolygon(MultiPolygonGeometry(polygons)),
	}
}

/// `shape ∩ cutter`, `shape \ cutter` (§4.4.1 "cut" intersect func).
pub fn cut(shape: &geo::MultiPolygon<f64>, cutter: &geo::MultiPolygon<f64>) -> (geo::MultiPolygon<f64>, geo::MultiPolygon<f64>) {
	(shape.intersection(cutter), shape.difference(cutter))
}

/// Bounding box in `[xmin, ymin, xmax, ymax]` form, used for the rstar envelope.
pub fn bounds(mp: &geo::MultiPolygon<f64>) -> Option<[f64; 4]> {
	mp.bounding_rect().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y])
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use geo::Area;
	use vectile_geometry::geo::GeometryTrait as _;

	fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonGeometry {
		PolygonGeometry::from(&[[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]])
	}

	#[test]
	fn polygon_to_geo_preserves_area() {
		let poly = square(0.0, 0.0, 10.0, 10.0);
		let geo_poly = polygon_to_geo(&poly);
		assert_relative_eq!(geo_poly.unsigned_area(), poly.area().abs(), epsilon = 1e-9);
	}

	#[test]
	fn cut_splits_overlapping_squares() {
		let shape = geo::MultiPolygon::new(vec![polygon_to_geo(&square(0.0, 0.0, 10.0, 10.0))]);
		let cutter = geo::MultiPolygon::new(vec![polygon_to_geo(&square(5.0, 0.0, 15.0, 10.0))]);
		let (inside, outside) = cut(&shape, &cutter);
		assert_relative_eq!(inside.unsigned_area(), 50.0, epsilon = 1e-6);
		assert_relative_eq!(outside.unsigned_area(), 50.0, epsilon = 1e-6);
	}

	#[test]
	fn roundtrip_through_our_geometry_type() {
		let poly = square(0.0, 0.0, 4.0, 4.0);
		let geo_mp = to_geo_multi_polygon(&Geometry::Polygon(poly));
		let back = from_geo_multi_polygon(geo_mp);
		assert!(matches!(back, Geometry::Polygon(_)));
	}

	#[test]
	fn point_shape_survives_cut() {
		let shape = to_geo_shape(&Geometry::Point(vectile_geometry::geo::PointGeometry::new(vectile_geometry::geo::Coordinates::new(5.0, 5.0)))).unwrap();
		let cutter = geo::MultiPolygon::new(vec![polygon_to_geo(&square(0.0, 0.0, 10.0, 10.0))]);
		let (inside, outside) = cut_shape(&shape, &cutter);
		assert!(!shape_is_empty(&inside));
		assert!(shape_is_empty(&outside));
		assert!(matches!(from_geo_shape(inside), Geometry::Point(_)));
	}

	#[test]
	fn line_shape_splits_into_runs() {
		use vectile_geometry::geo::{Coordinates, LineStringGeometry};

		let line = LineStringGeometry(vec![
			Coordinates::new(-5.0, 5.0),
			Coordinates::new(-3.0, 5.0),
			Coordinates::new(3.0, 5.0),
			Coordinates::new(7.0, 5.0),
			Coordinates::new(13.0, 5.0),
			Coordinates::new(15.0, 5.0),
		]);
		let shape = to_geo_shape(&Geometry::LineString(line)).unwrap();
		let cutter = geo::MultiPolygon::new(vec![polygon_to_geo(&square(0.0, 0.0, 10.0, 10.0))]);
		let (inside, outside) = cut_shape(&shape, &cutter);

		assert_relative_eq!(shape_measure(&inside), 4.0, epsilon = 1e-9);
		assert_relative_eq!(shape_measure(&outside), 4.0, epsilon = 1e-9);
	}
}
