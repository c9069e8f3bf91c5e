//! Pure URL helpers: request URL resolution, mock-registry keys and same-origin checks.

use anyhow::{Context, Result, anyhow};
use reqwest::Url;

/// Parses `raw` as an absolute URL, or resolves it against `base` when it is relative.
///
/// ```
/// use mapfetch_core::utils::resolve_url;
/// use reqwest::Url;
///
/// let base = Url::parse("http://example.com/maps/index.html").unwrap();
/// assert_eq!(resolve_url(Some(&base), "tiles/0/0/0.png").unwrap().as_str(), "http://example.com/maps/tiles/0/0/0.png");
/// assert!(resolve_url(None, "/style.json").is_err());
/// ```
pub fn resolve_url(base: Option<&Url>, raw: &str) -> Result<Url> {
	match (Url::parse(raw), base) {
		(Ok(url), _) => Ok(url),
		(Err(_), Some(base)) => base.join(raw).with_context(|| format!("resolving '{raw}' against '{base}'")),
		(Err(e), None) => Err(anyhow!("cannot resolve URL '{raw}' without a base URL: {e}")),
	}
}

/// Splits a URL into the `(host, path)` pair used as mock registry key.
///
/// The host is the bare hostname (no port), the path excludes query and fragment.
/// URLs without a host yield an empty host.
pub fn parse_host_path(url: &Url) -> (String, String) {
	(url.host_str().unwrap_or_default().to_string(), url.path().to_string())
}

/// Returns `true` if `url` has the same scheme, host and port as `origin`.
pub fn is_same_origin(origin: &Url, url: &Url) -> bool {
	url.scheme() == origin.scheme()
		&& url.host_str() == origin.host_str()
		&& url.port_or_known_default() == origin.port_or_known_default()
}
