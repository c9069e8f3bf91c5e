//! The outbound side of the pipeline: one GET request in, one [`TransportResult`] (or a
//! [`TransportError`]) out.
//!
//! [`Transport`] is the seam between the fetch operations and the network. [`HttpTransport`] talks
//! to real servers, [`MockTransport`] answers from a [`MockProvider`](crate::mock::MockProvider)
//! first and delegates misses. Tests can implement [`Transport`] directly to simulate any status
//! or failure.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MOCK_NO_BODY_STATUS_TEXT, MockTransport};

use async_trait::async_trait;
use mapfetch_core::Blob;
use reqwest::{Url, header::HeaderMap};
use std::fmt::{Debug, Display};

/// How the body of a response should be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseType {
	Text,
	ArrayBuffer,
	/// Complete the exchange as soon as status and headers are known; the body is not read.
	HeadersOnly,
}

#[derive(Clone, Debug)]
pub struct TransportRequest {
	pub url: Url,
	pub headers: HeaderMap,
	/// Send cookies to other origins.
	pub with_credentials: bool,
	pub response_type: ResponseType,
}

impl TransportRequest {
	pub fn get(url: Url, response_type: ResponseType) -> Self {
		Self {
			url,
			headers: HeaderMap::new(),
			with_credentials: false,
			response_type,
		}
	}
}

/// A completed exchange, whatever its status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResult {
	pub status: u16,
	pub status_text: String,
	pub headers: Vec<(String, String)>,
	pub body: Option<Blob>,
}

impl TransportResult {
	pub fn new(status: u16, status_text: &str) -> Self {
		Self {
			status,
			status_text: status_text.to_string(),
			..Default::default()
		}
	}

	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		self.headers.push((name.to_string(), value.to_string()));
		self
	}

	pub fn with_body(mut self, body: impl Into<Blob>) -> Self {
		self.body = Some(body.into());
		self
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Case-insensitive header lookup; returns the first match.
	pub fn header(&self, name: &str) -> Option<&str> {
		self
			.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Length of the body in bytes; a missing body counts as empty.
	pub fn body_len(&self) -> u64 {
		self.body.as_ref().map_or(0, Blob::len)
	}
}

/// The exchange could not complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError {
	pub message: String,
}

impl TransportError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl Display for TransportError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.message)
	}
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Debug + Send + Sync {
	async fn send(&self, request: TransportRequest) -> Result<TransportResult, TransportError>;
}
