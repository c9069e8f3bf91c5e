//! Turns transport outcomes into results or classified [`AjaxError`]s.
//!
//! Each step only sees exchanges that passed the previous ones, which gives the fixed order
//! network → HTTP status → empty body → decode.

use crate::{
	AjaxError, ArrayBufferResponse, ResourceTiming,
	transport::{TransportError, TransportResult},
};
use serde::de::DeserializeOwned;

/// Network and HTTP-status classification, shared by all operations.
pub(crate) fn classify_exchange(
	url: &str,
	outcome: Result<TransportResult, TransportError>,
) -> Result<TransportResult, AjaxError> {
	let result = outcome.map_err(|e| {
		log::warn!("network error for '{url}': {e}");
		AjaxError::Network {
			url: url.to_string(),
			message: e.message,
		}
	})?;

	if !result.is_success() {
		log::warn!("HTTP {} ({}) for '{url}'", result.status, result.status_text);
		return Err(AjaxError::Http {
			status: result.status,
			status_text: result.status_text,
			url: url.to_string(),
		});
	}

	Ok(result)
}

/// Raw-buffer decoding: a `200` without content is an error, any other 2xx may be empty.
pub(crate) fn decode_array_buffer(
	url: &str,
	result: TransportResult,
	timing: Option<ResourceTiming>,
) -> Result<ArrayBufferResponse, AjaxError> {
	if result.status == 200 && result.body_len() == 0 {
		log::warn!("HTTP 200 without content for '{url}'");
		return Err(AjaxError::EmptyBody { url: url.to_string() });
	}

	let cache_control = result.header("cache-control").map(str::to_string);
	let expires = result.header("expires").map(str::to_string);

	Ok(ArrayBufferResponse {
		data: result.body.unwrap_or_default(),
		cache_control,
		expires,
		timing,
	})
}

/// Structural JSON decoding. An empty body has nothing to parse and is a decode error too.
pub(crate) fn decode_json<T: DeserializeOwned>(url: &str, result: &TransportResult) -> Result<T, AjaxError> {
	let body = match &result.body {
		Some(body) if !body.is_empty() => body,
		_ => {
			return Err(AjaxError::Decode {
				url: url.to_string(),
				message: "empty response body".to_string(),
			});
		}
	};

	serde_json::from_slice(body.as_slice()).map_err(|e| {
		log::warn!("failed to parse JSON from '{url}': {e}");
		AjaxError::Decode {
			url: url.to_string(),
			message: e.to_string(),
		}
	})
}
