//! Postgres connection pooling (§5, §12).
//!
//! A tile render takes a read-only, autocommit connection from the pool, scoped to
//! `render_tile` and released on every exit path. Substitutes `r2d2_postgres` for the
//! teacher's `r2d2_sqlite` manager — the one deliberate stack swap this crate makes
//! (see DESIGN.md) — but keeps the same `r2d2::Pool::builder().max_size(..).build(..)`
//! idiom as `MBTilesReader::load_from_sqlite`.

use crate::config::DbInfo;
use crate::error::PipelineErrorKind;
use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, trace, warn};
use postgres::NoTls;
use r2d2::Pool;
use r2d2_postgres::PostgresConnectionManager;

pub type PgPool = Pool<PostgresConnectionManager<NoTls>>;
pub type PgConnection = r2d2::PooledConnection<PostgresConnectionManager<NoTls>>;

/// Builds a connection pool for `dbinfo`, mirroring the teacher's fixed `max_size(10)`.
pub fn build_pool(dbinfo: &DbInfo) -> Result<PgPool> {
	trace!("build_pool {dbinfo:?}");
	let mut config = postgres::Config::new();
	config.host(&dbinfo.host).port(dbinfo.port).user(&dbinfo.user).password(&dbinfo.password);
	if let Some(database) = dbinfo.database.as_deref().or(dbinfo.dbname.as_deref()) {
		config.dbname(database);
	}
	let manager = PostgresConnectionManager::new(config, NoTls);
	Pool::builder().max_size(10).build(manager).context("failed to build Postgres connection pool").map_err(|e| e.context(PipelineErrorKind::Config))
}

fn dbinfo_key(dbinfo: &DbInfo) -> String {
	let database = dbinfo.database.as_deref().or(dbinfo.dbname.as_deref()).unwrap_or_default();
	format!("{}:{}@{}:{}/{}", dbinfo.user, dbinfo.password, dbinfo.host, dbinfo.port, database)
}

/// A pool per distinct [`DbInfo`], built lazily (§6: each layer config carries its own
/// `dbinfo`, so a tileset spanning several layers may need several pools; this avoids
/// opening one per render while still sharing a pool across layers/tiles that target
/// the same database).
#[derive(Default)]
pub struct PoolCache {
	pools: DashMap<String, PgPool>,
}

impl PoolCache {
	#[must_use]
	pub fn new() -> Self {
		PoolCache::default()
	}

	pub fn pool_for(&self, dbinfo: &DbInfo) -> Result<PgPool> {
		let key = dbinfo_key(dbinfo);
		if let Some(pool) = self.pools.get(&key) {
			return Ok(pool.clone());
		}
		let pool = build_pool(dbinfo)?;
		self.pools.insert(key, pool.clone());
		Ok(pool)
	}
}

/// Maximum retries for a serialization failure before surfacing it fatally (§5).
const MAX_SERIALIZATION_RETRIES: u32 = 5;

/// Returns `true` for a Postgres `SQLSTATE 40001` serialization-failure error — the
/// only error class this retry loop treats as transient (§5, §7).
fn is_serialization_failure(error: &postgres::Error) -> bool {
	error.code().is_some_and(|code| code.code() == "40001")
}

/// Runs `attempt` against a fresh, read-only autocommit connection from `pool`,
/// retrying up to [`MAX_SERIALIZATION_RETRIES`] times on a serialization failure
/// before surfacing it as a fatal [`PipelineErrorKind::TransientDb`] (§5).
pub fn with_retry<T>(pool: &PgPool, mut attempt: impl FnMut(&mut PgConnection) -> Result<T, postgres::Error>) -> Result<T> {
	for retry in 0..=MAX_SERIALIZATION_RETRIES {
		let mut conn = pool.get().context("failed to check out a Postgres connection").map_err(|e| e.context(PipelineErrorKind::TransientDb))?;
		conn.execute("SET TRANSACTION READ ONLY", &[]).context("failed to set read-only transaction").map_err(|e| e.context(PipelineErrorKind::Config))?;

		match attempt(&mut conn) {
			Ok(value) => return Ok(value),
			Err(error) if is_serialization_failure(&error) && retry < MAX_SERIALIZATION_RETRIES => {
				debug!("serialization failure on attempt {}/{MAX_SERIALIZATION_RETRIES}, retrying: {error}", retry + 1);
			}
			Err(error) => {
				if is_serialization_failure(&error) {
					warn!("serialization failure persisted past {MAX_SERIALIZATION_RETRIES} retries: {error}");
				}
				return Err(anyhow::Error::new(error).context(PipelineErrorKind::TransientDb));
			}
		}
	}
	unreachable!("loop always returns on its final iteration")
}
