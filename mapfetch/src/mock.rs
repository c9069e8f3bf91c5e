//! Canned responses that stand in for the network.
//!
//! A [`MockProvider`] answers `(host, path)` lookups. Two ways to use it:
//!
//! - inject a provider into a [`Fetcher`](crate::Fetcher) at construction time
//!   (`FetcherBuilder::mock_provider`), or
//! - replace the process-wide [`MockRegistry`] with [`set_mock_request`]; fetchers built with the
//!   default settings consult it.
//!
//! The process-wide table is swapped atomically. Each request takes a snapshot when it is issued,
//! so replacing the table affects later requests only.
//!
//! ```
//! use mapfetch::mock::{MockProvider, MockRegistry, MockResponse};
//!
//! let registry = MockRegistry::new()
//! 	.with_body("tiles.example.com", "/v4/streets.json", r#"{"tiles":[]}"#)
//! 	.with_absent("tiles.example.com", "/v4/missing.json");
//!
//! assert!(matches!(registry.resolve("tiles.example.com", "/v4/streets.json"), Some(MockResponse::Body(_))));
//! assert_eq!(registry.resolve("tiles.example.com", "/v4/missing.json"), Some(MockResponse::NoBody));
//! assert_eq!(registry.resolve("tiles.example.com", "/v4/other.json"), None);
//! ```

use arc_swap::ArcSwap;
use mapfetch_core::Blob;
use std::{
	collections::HashMap,
	fmt::Debug,
	sync::{Arc, LazyLock},
};

/// Result of a successful mock lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockResponse {
	/// The entry holds a non-empty body.
	Body(Blob),
	/// The entry exists but holds no body (or an empty one).
	NoBody,
}

pub trait MockProvider: Debug + Send + Sync {
	/// Looks up a canned response. `None` means "not mocked, use the network".
	fn resolve(&self, host: &str, path: &str) -> Option<MockResponse>;
}

/// host → path → body-or-absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockRegistry {
	hosts: HashMap<String, HashMap<String, Option<Blob>>>,
}

impl MockRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, host: &str, path: &str, body: Option<Blob>) {
		self
			.hosts
			.entry(host.to_string())
			.or_default()
			.insert(path.to_string(), body);
	}

	pub fn with_body(mut self, host: &str, path: &str, body: impl Into<Blob>) -> Self {
		self.insert(host, path, Some(body.into()));
		self
	}

	pub fn with_absent(mut self, host: &str, path: &str) -> Self {
		self.insert(host, path, None);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.hosts.values().all(HashMap::is_empty)
	}
}

impl MockProvider for MockRegistry {
	fn resolve(&self, host: &str, path: &str) -> Option<MockResponse> {
		let entry = self.hosts.get(host)?.get(path)?;
		Some(match entry {
			Some(body) if !body.is_empty() => MockResponse::Body(body.clone()),
			_ => MockResponse::NoBody,
		})
	}
}

static MOCK_REGISTRY: LazyLock<ArcSwap<MockRegistry>> = LazyLock::new(|| ArcSwap::from_pointee(MockRegistry::new()));

/// Replaces the process-wide mock table.
///
/// The old table is not merged into the new one. Requests already issued keep the table they
/// started with.
pub fn set_mock_request(registry: MockRegistry) {
	log::debug!("replacing process-wide mock registry");
	MOCK_REGISTRY.store(Arc::new(registry));
}

/// Returns a snapshot of the process-wide mock table.
pub fn mock_registry() -> Arc<MockRegistry> {
	MOCK_REGISTRY.load_full()
}
