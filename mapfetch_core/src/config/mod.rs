//! Process-wide, read-only settings consumed by the fetch pipeline.
//!
//! [`Config`] is built once (from defaults, the environment or command line flags) and shared as
//! `Arc<Config>`. Nothing in the pipeline mutates it.

use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::sync::Arc;

pub const ENV_API_URL: &str = "MAPFETCH_API_URL";
pub const ENV_REQUIRE_ACCESS_TOKEN: &str = "MAPFETCH_REQUIRE_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN: &str = "MAPFETCH_ACCESS_TOKEN";

const DEFAULT_API_URL: &str = "https://api.mapbox.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	pub api_url: String,
	pub require_access_token: bool,
	pub access_token: Option<String>,
}

impl Config {
	pub fn arc(self) -> Arc<Self> {
		Arc::new(self)
	}

	/// Builds a config from the `MAPFETCH_*` environment variables, falling back to defaults for
	/// unset variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Same as [`Config::from_env`] but reads variables through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Config::default();

		if let Some(api_url) = lookup(ENV_API_URL) {
			config.api_url = api_url;
		}

		if let Some(value) = lookup(ENV_REQUIRE_ACCESS_TOKEN) {
			config.require_access_token =
				parse_bool(&value).with_context(|| format!("reading environment variable {ENV_REQUIRE_ACCESS_TOKEN}"))?;
		}

		config.access_token = lookup(ENV_ACCESS_TOKEN).filter(|token| !token.is_empty());

		config.api_base().with_context(|| format!("reading environment variable {ENV_API_URL}"))?;

		Ok(config)
	}

	/// The API URL parsed as a base for resolving relative request URLs.
	pub fn api_base(&self) -> Result<Url> {
		Url::parse(&self.api_url).with_context(|| format!("invalid API URL '{}'", self.api_url))
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_url: DEFAULT_API_URL.to_string(),
			require_access_token: true,
			access_token: None,
		}
	}
}

fn parse_bool(value: &str) -> Result<bool> {
	Ok(match value.trim().to_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => true,
		"0" | "false" | "no" | "off" => false,
		other => bail!("expected a boolean (true/false), got '{other}'"),
	})
}
