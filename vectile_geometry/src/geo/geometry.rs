#![allow(dead_code)]

use super::*;
use std::fmt::Debug;
use vectile_core::json::{JsonObject, JsonValue};

#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(PointGeometry),
	LineString(LineStringGeometry),
	LinearRing(RingGeometry),
	Polygon(PolygonGeometry),
	MultiPoint(MultiPointGeometry),
	MultiLineString(MultiLineStringGeometry),
	MultiPolygon(MultiPolygonGeometry),
	GeometryCollection(Vec<Geometry>),
}

impl Geometry {
	pub fn new_point<T: Convertible>(value: [T; 2]) -> Self {
		Self::Point(PointGeometry::from(value))
	}
	pub fn new_line_string<T: Convertible>(value: Vec<[T; 2]>) -> Self {
		Self::LineString(LineStringGeometry::from(value))
	}
	pub fn new_linear_ring<T: Convertible>(value: Vec<[T; 2]>) -> Self {
		Self::LinearRing(RingGeometry::from(value))
	}
	pub fn new_polygon<T: Convertible>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::Polygon(PolygonGeometry::from(value))
	}
	pub fn new_multi_point<T: Convertible>(value: Vec<[T; 2]>) -> Self {
		Self::MultiPoint(MultiPointGeometry::from(value))
	}
	pub fn new_multi_line_string<T: Convertible>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::MultiLineString(MultiLineStringGeometry::from(value))
	}
	pub fn new_multi_polygon<T: Convertible>(value: Vec<Vec<Vec<[T; 2]>>>) -> Self {
		Self::MultiPolygon(MultiPolygonGeometry::from(value))
	}
	pub fn new_geometry_collection(value: Vec<Geometry>) -> Self {
		Self::GeometryCollection(value)
	}

	fn get_type(&self) -> &str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::LinearRing(_) => "LinearRing",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::GeometryCollection(_) => "GeometryCollection",
		}
	}

	/// Converts single-part geometries into their multi-part equivalent. A
	/// `LinearRing` is treated as a closed `LineString`; `GeometryCollection`
	/// has no multi-part form and is returned unchanged.
	pub fn into_multi(self) -> Self {
		match self {
			Geometry::Point(g) => Geometry::MultiPoint(g.into_multi()),
			Geometry::LineString(g) => Geometry::MultiLineString(g.into_multi()),
			Geometry::LinearRing(g) => Geometry::MultiLineString(LineStringGeometry(g.0).into_multi()),
			Geometry::Polygon(g) => Geometry::MultiPolygon(g.into_multi()),
			Geometry::MultiPoint(_)
			| Geometry::MultiLineString(_)
			| Geometry::MultiPolygon(_)
			| Geometry::GeometryCollection(_) => self,
		}
	}

	/// Encodes this geometry as a GeoJSON geometry object. `LinearRing` has no GeoJSON
	/// equivalent and is emitted as a `LineString`.
	pub fn to_json(&self, precision: Option<u8>) -> JsonValue {
		if let Geometry::GeometryCollection(geometries) = self {
			let mut obj = JsonObject::new();
			obj.insert("type".to_string(), JsonValue::from("GeometryCollection"));
			obj.insert(
				"geometries".to_string(),
				JsonValue::from(geometries.iter().map(|g| g.to_json(precision)).collect::<Vec<_>>()),
			);
			return JsonValue::Object(obj);
		}

		let (type_name, coordinates): (&str, JsonValue) = match self {
			Geometry::Point(g) => ("Point", g.to_coord_json(precision)),
			Geometry::LineString(g) => ("LineString", g.to_coord_json(precision)),
			Geometry::LinearRing(g) => ("LineString", g.to_coord_json(precision)),
			Geometry::Polygon(g) => ("Polygon", g.to_coord_json(precision)),
			Geometry::MultiPoint(g) => ("MultiPoint", g.to_coord_json(precision)),
			Geometry::MultiLineString(g) => ("MultiLineString", g.to_coord_json(precision)),
			Geometry::MultiPolygon(g) => ("MultiPolygon", g.to_coord_json(precision)),
			Geometry::GeometryCollection(_) => unreachable!(),
		};

		let mut obj = JsonObject::new();
		obj.insert("type".to_string(), JsonValue::from(type_name));
		obj.insert("coordinates".to_string(), coordinates);
		JsonValue::Object(obj)
	}

	pub fn new_example() -> Self {
		Self::new_multi_polygon(vec![
			vec![
				vec![[0.0, 0.0], [5.0, 0.0], [2.5, 4.0], [0.0, 0.0]],
				vec![[2.0, 1.0], [2.5, 2.0], [3.0, 1.0], [2.0, 1.0]],
			],
			vec![
				vec![[6.0, 0.0], [9.0, 0.0], [9.0, 4.0], [6.0, 4.0], [6.0, 0.0]],
				vec![[7.0, 1.0], [7.0, 3.0], [8.0, 3.0], [8.0, 1.0], [7.0, 1.0]],
			],
		])
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if let Geometry::GeometryCollection(geometries) = self {
			return f.debug_tuple("GeometryCollection").field(geometries).finish();
		}
		let (type_name, inner): (&str, &dyn Debug) = match self {
			Geometry::Point(g) => ("Point", g),
			Geometry::LineString(g) => ("LineString", g),
			Geometry::LinearRing(g) => ("LinearRing", g),
			Geometry::Polygon(g) => ("Polygon", g),
			Geometry::MultiPoint(g) => ("MultiPoint", g),
			Geometry::MultiLineString(g) => ("MultiLineString", g),
			Geometry::MultiPolygon(g) => ("MultiPolygon", g),
			Geometry::GeometryCollection(_) => unreachable!(),
		};
		f.debug_tuple(type_name).field(inner).finish()
	}
}
