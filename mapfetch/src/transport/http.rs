//! [`Transport`] backed by `reqwest`.
//!
//! Two clients are kept: an anonymous one, and a credentialed one with a cookie store. The
//! credentialed client is only used for requests that set `with_credentials`, so cookies never
//! leak into anonymous requests.

use super::{ResponseType, Transport, TransportError, TransportRequest, TransportResult};
use anyhow::Result;
use async_trait::async_trait;
use mapfetch_core::Blob;
use reqwest::{Client, ClientBuilder};
use std::{error::Error, time::Duration};

#[derive(Clone, Debug)]
pub struct HttpTransport {
	anonymous: Client,
	credentialed: Client,
}

fn client_builder() -> ClientBuilder {
	Client::builder().tcp_keepalive(Duration::from_secs(600))
}

impl HttpTransport {
	pub fn new() -> Result<Self> {
		Ok(Self {
			anonymous: client_builder().build()?,
			credentialed: client_builder().cookie_store(true).build()?,
		})
	}
}

/// Flattens an error and its sources into one line.
fn describe(err: &reqwest::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: TransportRequest) -> Result<TransportResult, TransportError> {
		let client = if request.with_credentials {
			&self.credentialed
		} else {
			&self.anonymous
		};

		log::debug!("GET {} ({:?})", request.url, request.response_type);

		let response = client
			.get(request.url.clone())
			.headers(request.headers)
			.send()
			.await
			.map_err(|e| TransportError::new(describe(&e)))?;

		let status = response.status();
		let headers = response
			.headers()
			.iter()
			.filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
			.collect();

		let body = match request.response_type {
			ResponseType::HeadersOnly => None,
			ResponseType::Text | ResponseType::ArrayBuffer => {
				let bytes = response.bytes().await.map_err(|e| TransportError::new(describe(&e)))?;
				Some(Blob::from(&*bytes))
			}
		};

		Ok(TransportResult {
			status: status.as_u16(),
			status_text: status.canonical_reason().unwrap_or_default().to_string(),
			headers,
			body,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reqwest::Url;

	#[test]
	fn new() {
		assert!(HttpTransport::new().is_ok());
	}

	#[tokio::test]
	async fn connection_refused_is_a_transport_error() {
		// nothing listens on the discard port
		let url = Url::parse("http://127.0.0.1:9/style.json").unwrap();
		let transport = HttpTransport::new().unwrap();
		let err = transport
			.send(TransportRequest::get(url, ResponseType::Text))
			.await
			.unwrap_err();
		assert!(!err.message.is_empty());
	}
}
