//! Parameters describing one outbound resource request.
//!
//! ```
//! use mapfetch_core::{Credentials, RequestParameters};
//!
//! let params = RequestParameters::new("https://tiles.example.com/v3/streets.json")
//! 	.with_header("X-Client", "demo")
//! 	.with_credentials(Credentials::Include);
//! assert!(params.sends_credentials());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials mode of a request.
///
/// Only [`Credentials::Include`] sends cookies to other origins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
	SameOrigin,
	Include,
}

impl Credentials {
	pub fn as_str(&self) -> &'static str {
		match self {
			Credentials::SameOrigin => "same-origin",
			Credentials::Include => "include",
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParameters {
	/// Absolute URL, or a URL relative to the fetcher's document origin.
	pub url: String,
	/// Extra request headers. Empty means none are sent.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub headers: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credentials: Option<Credentials>,
	#[serde(default)]
	pub collect_resource_timing: bool,
}

impl RequestParameters {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_string(),
			..Default::default()
		}
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		self.headers.insert(name.to_string(), value.to_string());
		self
	}

	pub fn with_credentials(mut self, credentials: Credentials) -> Self {
		self.credentials = Some(credentials);
		self
	}

	pub fn with_resource_timing(mut self, collect: bool) -> Self {
		self.collect_resource_timing = collect;
		self
	}

	/// Whether cookies should be sent cross-origin.
	pub fn sends_credentials(&self) -> bool {
		self.credentials == Some(Credentials::Include)
	}

	/// Case-insensitive check for a caller-supplied header.
	pub fn has_header(&self, name: &str) -> bool {
		self.headers.keys().any(|key| key.eq_ignore_ascii_case(name))
	}
}
