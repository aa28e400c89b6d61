use anyhow::Result;

use crate::cache::{
	cache_in_memory::InMemoryCache,
	traits::{Cache, CacheKey, CacheValue},
};

pub struct CacheMap<K, V>
where
	K: CacheKey,
	V: CacheValue,
{
	inner: InMemoryCache<K, V>,
}

impl<K, V> CacheMap<K, V>
where
	K: CacheKey,
	V: CacheValue,
{
	pub fn new() -> Self {
		Self {
			inner: InMemoryCache::new(),
		}
	}
}

impl<K, V> Default for CacheMap<K, V>
where
	K: CacheKey,
	V: CacheValue,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> Cache<K, V> for CacheMap<K, V>
where
	K: CacheKey,
	V: CacheValue,
{
	fn contains_key(&self, key: &K) -> bool {
		self.inner.contains_key(key)
	}

	fn get_clone(&self, key: &K) -> Result<Option<Vec<V>>> {
		self.inner.get_clone(key)
	}

	fn remove(&mut self, key: &K) -> Result<Option<Vec<V>>> {
		self.inner.remove(key)
	}

	fn insert(&mut self, key: &K, value: Vec<V>) -> Result<()> {
		self.inner.insert(key, value)
	}

	fn append(&mut self, key: &K, value: Vec<V>) -> Result<()> {
		self.inner.append(key, value)
	}

	fn clean_up(&mut self) {
		self.inner.clean_up();
	}
}

impl<K, V> Drop for CacheMap<K, V>
where
	K: CacheKey,
	V: CacheValue,
{
	fn drop(&mut self) {
		self.clean_up();
	}
}
