//! Layer/database configuration (§6, §12). Loaded by the (out-of-scope, §1) config
//! file layer and handed to [`crate::response::render_tile`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// `dbinfo` (§6): the subset of connection parameters passed to the DB driver.
#[derive(Clone, Deserialize, Serialize)]
pub struct DbInfo {
	pub host: String,
	#[serde(default = "default_user")]
	pub user: String,
	pub password: String,
	#[serde(default)]
	pub database: Option<String>,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default)]
	pub dbname: Option<String>,
}

fn default_user() -> String {
	"postgres".to_string()
}

fn default_port() -> u16 {
	5432
}

/// Redacts `password` — `DbInfo` must never land in a log line unobscured.
impl fmt::Debug for DbInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DbInfo")
			.field("host", &self.host)
			.field("user", &self.user)
			.field("password", &"***")
			.field("database", &self.database)
			.field("port", &self.port)
			.field("dbname", &self.dbname)
			.finish()
	}
}

/// One `queries[z]` entry: `null` yields an empty tile at that zoom (§6).
pub type ZoomQuery = Option<String>;

/// Per-layer configuration (§6): the subquery-per-zoom table plus the clip/simplify/
/// transform/sort knobs `build_query` and the pipeline driver consume.
#[derive(Clone, Deserialize, Serialize)]
pub struct LayerConfig {
	pub name: String,
	pub dbinfo: DbInfo,
	pub queries: Vec<ZoomQuery>,
	#[serde(default = "default_true")]
	pub clip: bool,
	#[serde(default = "default_srid")]
	pub srid: i32,
	#[serde(default = "default_simplify")]
	pub simplify: f64,
	#[serde(default = "default_simplify_until")]
	pub simplify_until: u8,
	#[serde(default)]
	pub suppress_simplification: BTreeSet<u8>,
	#[serde(default)]
	pub geometry_types: BTreeSet<String>,
	#[serde(default)]
	pub transform_fns: Vec<String>,
	#[serde(default)]
	pub sort_fn: Option<String>,
	#[serde(default)]
	pub simplify_before_intersect: bool,
}

fn default_true() -> bool {
	true
}

fn default_srid() -> i32 {
	900_913
}

fn default_simplify() -> f64 {
	1.0
}

fn default_simplify_until() -> u8 {
	16
}

impl LayerConfig {
	/// Resolves the subquery applicable at `zoom`: the array entry at that index, or
	/// the last entry once `zoom` runs past the array's length (§6).
	#[must_use]
	pub fn query_for_zoom(&self, zoom: u8) -> Option<&str> {
		let index = usize::from(zoom).min(self.queries.len().saturating_sub(1));
		self.queries.get(index).and_then(Option::as_deref)
	}
}

/// A deployment's full set of layer configs, as loaded from one YAML or JSON file
/// (§6). One `render_tile` call walks every layer in `layers`.
#[derive(Clone, Deserialize, Serialize, Default)]
pub struct TilesetConfig {
	pub layers: Vec<LayerConfig>,
}

impl TilesetConfig {
	/// Loads a tileset config from `path`, parsing as YAML (teacher's
	/// `serde_yaml_ng` convention) since valid JSON is also valid YAML.
	pub fn from_file(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("failed to read config file {path:?}"))?;
		serde_yaml_ng::from_str(&text).with_context(|| format!("failed to parse config file {path:?}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(queries: Vec<ZoomQuery>) -> LayerConfig {
		LayerConfig {
			name: "roads".to_string(),
			dbinfo: DbInfo { host: "localhost".to_string(), user: "postgres".to_string(), password: "secret".to_string(), database: None, port: 5432, dbname: None },
			queries,
			clip: true,
			srid: 900_913,
			simplify: 1.0,
			simplify_until: 16,
			suppress_simplification: BTreeSet::new(),
			geometry_types: BTreeSet::new(),
			transform_fns: Vec::new(),
			sort_fn: None,
			simplify_before_intersect: false,
		}
	}

	#[test]
	fn null_entry_yields_no_query() {
		let cfg = config(vec![Some("SELECT 1".to_string()), None]);
		assert_eq!(cfg.query_for_zoom(1), None);
	}

	#[test]
	fn last_entry_applies_beyond_array_length() {
		let cfg = config(vec![Some("SELECT 1".to_string()), Some("SELECT 2".to_string())]);
		assert_eq!(cfg.query_for_zoom(10), Some("SELECT 2"));
	}

	#[test]
	fn debug_redacts_password() {
		let cfg = config(vec![]);
		let rendered = format!("{:?}", cfg.dbinfo);
		assert!(!rendered.contains("secret"));
		assert!(rendered.contains("***"));
	}

	#[test]
	fn tileset_config_loads_from_yaml_file() {
		let yaml = "layers:\n  - name: roads\n    dbinfo:\n      host: localhost\n      password: secret\n    queries:\n      - SELECT * FROM roads\n";
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("tileset.yaml");
		std::fs::write(&path, yaml).unwrap();
		let tileset = TilesetConfig::from_file(&path).unwrap();
		assert_eq!(tileset.layers.len(), 1);
		assert_eq!(tileset.layers[0].name, "roads");
	}
}
