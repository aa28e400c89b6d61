//! Column-set cache (§5, §9 Design Notes).
//!
//! The only long-lived mutable state in the pipeline: a `query → set of column names`
//! map, populated lazily on first use of each query and never invalidated. `moka`
//! (already in the teacher's dependency stack as a tile cache) is repurposed here as
//! a bounded, thread-safe map — read-mostly, small, no eviction policy needed beyond
//! the capacity backstop.

use crate::error::PipelineErrorKind;
use crate::pool::PgPool;
use anyhow::{Context, Result};
use moka::sync::Cache;
use std::sync::Arc;

/// Default capacity: comfortably above the number of distinct queries a single
/// deployment's layer configuration set will ever define.
const DEFAULT_CAPACITY: u64 = 4096;

#[derive(Clone)]
pub struct ColumnCache {
	inner: Cache<String, Arc<Vec<String>>>,
}

impl Default for ColumnCache {
	fn default() -> Self {
		ColumnCache { inner: Cache::new(DEFAULT_CAPACITY) }
	}
}

impl ColumnCache {
	#[must_use]
	pub fn new(capacity: u64) -> Self {
		ColumnCache { inner: Cache::new(capacity) }
	}

	/// Returns the column set for `query`, running `probe` (a zero-row `LIMIT 0` fetch
	/// against `pool`) on first use and caching the result for the query string's
	/// lifetime. The cache is never invalidated (§5): a schema change behind a running
	/// pipeline requires a process restart, matching the source's own lifecycle.
	pub fn columns_for(&self, pool: &PgPool, query: &str, probe: impl FnOnce(&PgPool, &str) -> Result<Vec<String>>) -> Result<Arc<Vec<String>>> {
		if let Some(columns) = self.inner.get(query) {
			return Ok(columns);
		}
		let columns = Arc::new(probe(pool, query).with_context(|| format!("failed to probe columns for query: {query}")).map_err(|e| e.context(PipelineErrorKind::Config))?);
		self.inner.insert(query.to_string(), columns.clone());
		Ok(columns)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_then_get_round_trips() {
		let cache = ColumnCache::new(16);
		cache.inner.insert("SELECT 1".to_string(), Arc::new(vec!["__geometry__".to_string(), "__id__".to_string()]));
		let columns = cache.inner.get("SELECT 1").unwrap();
		assert_eq!(*columns, vec!["__geometry__".to_string(), "__id__".to_string()]);
	}

	#[test]
	fn miss_returns_none_without_a_probe() {
		let cache = ColumnCache::new(16);
		assert!(cache.inner.get("SELECT 2").is_none());
	}
}
