//! The fetch operations.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mapfetch::{Fetcher, RequestParameters};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = Fetcher::new()?;
//!
//!     let style = fetcher
//!         .get_json(&RequestParameters::new("https://demotiles.maplibre.org/style.json"))
//!         .await?;
//!     println!("style version {}", style["version"]);
//!
//!     let tile = fetcher
//!         .get_array_buffer(&RequestParameters::new("https://demotiles.maplibre.org/tiles/0/0/0.pbf"))
//!         .await?;
//!     println!("tile has {} bytes, cache-control {:?}", tile.data.len(), tile.cache_control);
//!
//!     Ok(())
//! }
//! ```

use crate::{
	AjaxError, ArrayBufferResponse, RequestHandle, ResourceTiming,
	classify::{classify_exchange, decode_array_buffer, decode_json},
	image::{ImageHandle, ObjectUrlStore, decode_image},
	mock::{MockProvider, mock_registry},
	transport::{HttpTransport, MockTransport, ResponseType, Transport, TransportRequest, TransportResult},
	video::{VideoElement, VideoHandle, probe_sources},
};
use anyhow::{Context, Result};
use mapfetch_core::{Config, RequestParameters, utils::resolve_url};
use reqwest::{
	Url,
	header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use std::{future::Future, sync::Arc, time::Instant};
use tokio::runtime::Handle;

/// Where mock responses come from.
#[derive(Clone, Debug)]
enum MockSource {
	/// The process-wide table set with [`set_mock_request`](crate::mock::set_mock_request).
	Global,
	Provider(Arc<dyn MockProvider>),
	Disabled,
}

/// Issues resource requests. Cheap to clone; clones share transport, config and object URLs.
#[derive(Clone, Debug)]
pub struct Fetcher {
	transport: Arc<dyn Transport>,
	mocks: MockSource,
	config: Arc<Config>,
	origin: Option<Url>,
	runtime: Handle,
	object_urls: Arc<ObjectUrlStore>,
}

#[derive(Debug)]
pub struct FetcherBuilder {
	transport: Option<Arc<dyn Transport>>,
	mocks: MockSource,
	config: Option<Arc<Config>>,
	origin: Option<Url>,
	runtime: Option<Handle>,
}

impl FetcherBuilder {
	/// Replaces the real network transport.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Consults `provider` instead of the process-wide mock table.
	pub fn mock_provider(mut self, provider: Arc<dyn MockProvider>) -> Self {
		self.mocks = MockSource::Provider(provider);
		self
	}

	/// Never consults any mock table.
	pub fn without_mocks(mut self) -> Self {
		self.mocks = MockSource::Disabled;
		self
	}

	pub fn config(mut self, config: Arc<Config>) -> Self {
		self.config = Some(config);
		self
	}

	/// Origin of the document the requests are made for. Relative URLs resolve against it and
	/// video sources are checked against it.
	pub fn origin(mut self, origin: Url) -> Self {
		self.origin = Some(origin);
		self
	}

	/// Runtime the exchanges run on. Defaults to the runtime `build` is called from.
	pub fn runtime(mut self, runtime: Handle) -> Self {
		self.runtime = Some(runtime);
		self
	}

	pub fn build(self) -> Result<Fetcher> {
		let transport: Arc<dyn Transport> = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new().context("creating HTTP transport")?),
		};

		let runtime = match self.runtime {
			Some(runtime) => runtime,
			None => Handle::try_current()
				.context("a Fetcher needs a tokio runtime: build it inside one or pass FetcherBuilder::runtime")?,
		};

		Ok(Fetcher {
			transport,
			mocks: self.mocks,
			config: self.config.unwrap_or_default(),
			origin: self.origin,
			runtime,
			object_urls: Arc::new(ObjectUrlStore::new()),
		})
	}
}

impl Fetcher {
	pub fn builder() -> FetcherBuilder {
		FetcherBuilder {
			transport: None,
			mocks: MockSource::Global,
			config: None,
			origin: None,
			runtime: None,
		}
	}

	/// A fetcher with the real network, the process-wide mock table and the default config.
	pub fn new() -> Result<Self> {
		Self::builder().build()
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn origin(&self) -> Option<&Url> {
		self.origin.as_ref()
	}

	/// Object URLs created for image decoding that are still alive.
	pub fn object_urls(&self) -> &ObjectUrlStore {
		&self.object_urls
	}

	/// Fetches and parses a JSON document.
	///
	/// Sends `Accept: application/json` unless the caller set an `Accept` header.
	pub fn get_json(&self, params: &RequestParameters) -> RequestHandle<serde_json::Value> {
		self.get_json_as(params)
	}

	/// Like [`Fetcher::get_json`], deserializing straight into `T`.
	pub fn get_json_as<T>(&self, params: &RequestParameters) -> RequestHandle<T>
	where
		T: DeserializeOwned + Send + 'static,
	{
		let url = params.url.clone();
		let exchange = self.exchange(params, ResponseType::Text, Some("application/json"));
		RequestHandle::spawn(&self.runtime, &params.url, async move {
			let (result, _timing) = exchange.await?;
			decode_json(&url, &result)
		})
	}

	/// Fetches raw bytes along with their `Cache-Control` and `Expires` headers.
	pub fn get_array_buffer(&self, params: &RequestParameters) -> RequestHandle<ArrayBufferResponse> {
		let task = self.array_buffer_task(params);
		RequestHandle::spawn(&self.runtime, &params.url, task)
	}

	/// Fetches raw bytes and decodes them into an image.
	///
	/// Errors of the buffer fetch are forwarded unchanged. A successful fetch without content
	/// yields the transparent placeholder pixel.
	pub fn get_image(&self, params: &RequestParameters) -> RequestHandle<ImageHandle> {
		let url = params.url.clone();
		let task = self.array_buffer_task(params);
		let object_urls = Arc::clone(&self.object_urls);
		RequestHandle::spawn(&self.runtime, &params.url, async move {
			let response = task.await?;
			decode_image(&object_urls, &url, response).await
		})
	}

	/// Builds a video element with one source per URL, in order, and starts watching for the
	/// first source that begins loading.
	pub fn get_video<S: AsRef<str>>(&self, urls: &[S]) -> VideoHandle {
		let element = VideoElement::with_base(self.origin.as_ref(), self.base_url().as_ref(), urls);
		let label = element
			.sources
			.iter()
			.map(|source| source.src.as_str())
			.collect::<Vec<_>>()
			.join(", ");
		let probe = probe_sources(self.request_transport(), element.clone());
		let load_start = RequestHandle::spawn(&self.runtime, &label, async move { Ok(probe.await) });
		VideoHandle::new(element, load_start)
	}

	fn array_buffer_task(
		&self,
		params: &RequestParameters,
	) -> impl Future<Output = Result<ArrayBufferResponse, AjaxError>> + Send + 'static {
		let url = params.url.clone();
		let exchange = self.exchange(params, ResponseType::ArrayBuffer, None);
		async move {
			let (result, timing) = exchange.await?;
			decode_array_buffer(&url, result, timing)
		}
	}

	/// Prepares one exchange. Everything that depends on the fetcher's state, including the mock
	/// snapshot, is captured now; the returned future only touches the transport.
	fn exchange(
		&self,
		params: &RequestParameters,
		response_type: ResponseType,
		default_accept: Option<&'static str>,
	) -> impl Future<Output = Result<(TransportResult, Option<ResourceTiming>), AjaxError>> + Send + 'static {
		let url = params.url.clone();
		let collect_timing = params.collect_resource_timing;
		let request = self.build_request(params, response_type, default_accept);
		let transport = self.request_transport();

		async move {
			let request = request?;
			let name = request.url.to_string();
			let start = Instant::now();
			let outcome = transport.send(request).await;
			let duration = start.elapsed();

			let result = classify_exchange(&url, outcome)?;
			let timing = collect_timing.then(|| ResourceTiming {
				name,
				duration,
				transfer_size: result.body_len(),
			});
			Ok((result, timing))
		}
	}

	fn build_request(
		&self,
		params: &RequestParameters,
		response_type: ResponseType,
		default_accept: Option<&'static str>,
	) -> Result<TransportRequest, AjaxError> {
		let invalid = |message: String| AjaxError::InvalidRequest {
			url: params.url.clone(),
			message,
		};

		let url = resolve_url(self.base_url().as_ref(), &params.url).map_err(|e| invalid(format!("{e:#}")))?;

		let mut headers = HeaderMap::new();
		for (name, value) in &params.headers {
			let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(format!("header name '{name}': {e}")))?;
			let value = HeaderValue::from_str(value).map_err(|e| invalid(format!("header value for '{name}': {e}")))?;
			headers.append(name, value);
		}
		if let Some(accept) = default_accept.filter(|_| !params.has_header(ACCEPT.as_str())) {
			headers.insert(ACCEPT, HeaderValue::from_static(accept));
		}

		Ok(TransportRequest {
			url,
			headers,
			with_credentials: params.sends_credentials(),
			response_type,
		})
	}

	fn base_url(&self) -> Option<Url> {
		self.origin.clone().or_else(|| self.config.api_base().ok())
	}

	/// The transport for a request issued now, with the mock table as of now in front of it.
	fn request_transport(&self) -> Arc<dyn Transport> {
		match &self.mocks {
			MockSource::Global => Arc::new(MockTransport::new(mock_registry(), Arc::clone(&self.transport))),
			MockSource::Provider(provider) => Arc::new(MockTransport::new(Arc::clone(provider), Arc::clone(&self.transport))),
			MockSource::Disabled => Arc::clone(&self.transport),
		}
	}
}
