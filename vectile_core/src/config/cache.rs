#[derive(Default)]
pub enum CacheKind {
	#[default]
	InMemory,
}

impl CacheKind {
	pub fn new_memory() -> Self {
		Self::InMemory
	}
}
