//! [`Transport`] that answers from a [`MockProvider`] before touching the real transport.

use super::{ResponseType, Transport, TransportError, TransportRequest, TransportResult};
use crate::mock::{MockProvider, MockResponse};
use async_trait::async_trait;
use mapfetch_core::utils::parse_host_path;
use std::sync::Arc;

/// Status line of a mock entry that exists but holds no body.
pub const MOCK_NO_BODY_STATUS_TEXT: &str = "Not Found (mock registry entry has no body)";

#[derive(Clone, Debug)]
pub struct MockTransport {
	mocks: Arc<dyn MockProvider>,
	inner: Arc<dyn Transport>,
}

impl MockTransport {
	pub fn new(mocks: Arc<dyn MockProvider>, inner: Arc<dyn Transport>) -> Self {
		Self { mocks, inner }
	}

	/// The canned result for `request`, if the provider knows its host and path.
	pub fn lookup(&self, request: &TransportRequest) -> Option<TransportResult> {
		let (host, path) = parse_host_path(&request.url);
		let response = self.mocks.resolve(&host, &path)?;
		log::debug!("mock hit for {host}{path}");

		Some(match response {
			MockResponse::Body(body) => {
				let result = TransportResult::new(200, "OK");
				if request.response_type == ResponseType::HeadersOnly {
					result
				} else {
					result.with_body(body)
				}
			}
			MockResponse::NoBody => TransportResult::new(404, MOCK_NO_BODY_STATUS_TEXT),
		})
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn send(&self, request: TransportRequest) -> Result<TransportResult, TransportError> {
		match self.lookup(&request) {
			Some(result) => Ok(result),
			None => self.inner.send(request).await,
		}
	}
}
