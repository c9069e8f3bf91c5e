//! Classified outcomes of a failed fetch.
//!
//! Every completed exchange is classified into at most one [`AjaxError`]. The checks run in a
//! fixed order and the first match wins:
//!
//! 1. [`AjaxError::Network`]: the exchange never completed (DNS, connect or body read failure).
//! 2. [`AjaxError::Http`]: the status is outside `200..300`.
//! 3. [`AjaxError::EmptyBody`]: status `200` with a zero-length payload (buffer fetches only).
//! 4. [`AjaxError::Decode`]: the payload is present but cannot be decoded.
//!
//! [`AjaxError::InvalidRequest`] and [`AjaxError::Aborted`] never come from a transport exchange;
//! they are delivered through the same channel so callers only ever see one result per request.

use std::fmt::Display;

/// Fieldless discriminant of [`AjaxError`], handy for matching and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AjaxErrorKind {
	InvalidRequest,
	Network,
	Http,
	EmptyBody,
	Decode,
	Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AjaxError {
	/// The request could not be built (unparseable URL, invalid header).
	InvalidRequest { url: String, message: String },
	/// The transport exchange could not complete.
	Network { url: String, message: String },
	/// The server answered with a status outside `200..300`.
	Http {
		status: u16,
		status_text: String,
		url: String,
	},
	/// A `200` response without content on a fetch that requires a payload.
	EmptyBody { url: String },
	/// The payload could not be parsed into the requested shape.
	Decode { url: String, message: String },
	/// The request was aborted before it completed.
	Aborted { url: String },
}

impl AjaxError {
	pub fn kind(&self) -> AjaxErrorKind {
		match self {
			AjaxError::InvalidRequest { .. } => AjaxErrorKind::InvalidRequest,
			AjaxError::Network { .. } => AjaxErrorKind::Network,
			AjaxError::Http { .. } => AjaxErrorKind::Http,
			AjaxError::EmptyBody { .. } => AjaxErrorKind::EmptyBody,
			AjaxError::Decode { .. } => AjaxErrorKind::Decode,
			AjaxError::Aborted { .. } => AjaxErrorKind::Aborted,
		}
	}

	/// The HTTP status code, for [`AjaxError::Http`] and [`AjaxError::EmptyBody`].
	pub fn status(&self) -> Option<u16> {
		match self {
			AjaxError::Http { status, .. } => Some(*status),
			AjaxError::EmptyBody { .. } => Some(200),
			_ => None,
		}
	}

	/// The URL of the request, exactly as the caller passed it.
	pub fn url(&self) -> &str {
		match self {
			AjaxError::InvalidRequest { url, .. }
			| AjaxError::Network { url, .. }
			| AjaxError::Http { url, .. }
			| AjaxError::EmptyBody { url }
			| AjaxError::Decode { url, .. }
			| AjaxError::Aborted { url } => url,
		}
	}
}

impl Display for AjaxError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AjaxError::InvalidRequest { url, message } => write!(f, "invalid request for '{url}': {message}"),
			AjaxError::Network { url, message } => write!(f, "network error for '{url}': {message}"),
			AjaxError::Http {
				status,
				status_text,
				url,
			} => {
				if status_text.is_empty() {
					write!(f, "HTTP {status} for '{url}'")
				} else {
					write!(f, "HTTP {status} ({status_text}) for '{url}'")
				}
			}
			AjaxError::EmptyBody { url } => write!(f, "HTTP 200 returned without content for '{url}'"),
			AjaxError::Decode { url, message } => write!(f, "failed to decode response from '{url}': {message}"),
			AjaxError::Aborted { url } => write!(f, "request for '{url}' was aborted"),
		}
	}
}

impl std::error::Error for AjaxError {}
