//! Video element assembly for [`Fetcher::get_video`](crate::Fetcher::get_video).
//!
//! A [`VideoElement`] lists one [`VideoSource`] per input URL, in input order. If any source is
//! cross-origin relative to the document origin, the whole element switches to anonymous
//! cross-origin mode; later same-origin sources do not switch it back.
//!
//! Loading is signalled by [`VideoHandle::load_start`]: it resolves as soon as one source starts
//! loading (status and headers received), not when the video is fully downloaded. There is no
//! error channel. Failing sources are skipped, and if none starts the signal resolves to `None`.

use crate::{
	RequestHandle,
	transport::{ResponseType, Transport, TransportRequest},
};
use mapfetch_core::utils::{is_same_origin, resolve_url};
use reqwest::Url;
use std::{fmt::Display, sync::Arc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossOrigin {
	Anonymous,
}

impl Display for CrossOrigin {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CrossOrigin::Anonymous => f.write_str("anonymous"),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSource {
	/// The URL exactly as given.
	pub src: String,
	/// `src` resolved against the base URL; `None` if it cannot be resolved.
	pub url: Option<Url>,
	pub same_origin: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoElement {
	pub sources: Vec<VideoSource>,
	pub cross_origin: Option<CrossOrigin>,
}

impl VideoElement {
	/// Builds the element for `urls` as seen from a document at `origin`, resolving relative
	/// URLs against that origin.
	pub fn new<S: AsRef<str>>(origin: Option<&Url>, urls: &[S]) -> Self {
		Self::with_base(origin, origin, urls)
	}

	/// Like [`VideoElement::new`], resolving relative URLs against `base`.
	///
	/// Same-origin is decided on the resolved URL when there is a document origin. Without one,
	/// only path-relative URLs (not `//host/...`) count as same-origin.
	pub fn with_base<S: AsRef<str>>(origin: Option<&Url>, base: Option<&Url>, urls: &[S]) -> Self {
		let mut element = VideoElement::default();

		for src in urls {
			let src = src.as_ref();
			let url = resolve_url(base, src).ok();
			let same_origin = match (origin, &url) {
				(Some(origin), Some(url)) => is_same_origin(origin, url),
				(Some(_), None) => false,
				(None, _) => is_path_relative(src),
			};

			if !same_origin {
				element.cross_origin = Some(CrossOrigin::Anonymous);
			}

			element.sources.push(VideoSource {
				src: src.to_string(),
				url,
				same_origin,
			});
		}

		element
	}
}

/// A URL without scheme and host, e.g. `/a.mp4` or `a.mp4`.
fn is_path_relative(src: &str) -> bool {
	Url::parse(src).is_err() && !src.starts_with("//")
}

/// The source that started loading first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoStart {
	/// Position of the source in the element.
	pub index: usize,
	pub src: String,
	pub content_type: Option<String>,
}

/// A video element plus its pending "loading started" signal.
#[derive(Debug)]
pub struct VideoHandle {
	element: VideoElement,
	load_start: RequestHandle<Option<VideoStart>>,
}

impl VideoHandle {
	pub(crate) fn new(element: VideoElement, load_start: RequestHandle<Option<VideoStart>>) -> Self {
		Self { element, load_start }
	}

	pub fn element(&self) -> &VideoElement {
		&self.element
	}

	/// Stops probing sources; [`VideoHandle::load_start`] then resolves to `None`.
	pub fn abort(&self) {
		self.load_start.abort();
	}

	/// Resolves when the first source starts loading.
	pub async fn load_start(self) -> Option<VideoStart> {
		self.load_start.await.ok().flatten()
	}
}

/// Tries the sources in order and reports the first one that answers with a 2xx status.
pub(crate) async fn probe_sources(transport: Arc<dyn Transport>, element: VideoElement) -> Option<VideoStart> {
	for (index, source) in element.sources.iter().enumerate() {
		let Some(url) = source.url.clone() else {
			log::debug!("video source '{}' cannot be resolved, skipping", source.src);
			continue;
		};

		match transport.send(TransportRequest::get(url, ResponseType::HeadersOnly)).await {
			Ok(result) if result.is_success() => {
				log::debug!("video source '{}' started loading", source.src);
				return Some(VideoStart {
					index,
					src: source.src.clone(),
					content_type: result.header("content-type").map(str::to_string),
				});
			}
			Ok(result) => log::debug!("video source '{}' answered HTTP {}", source.src, result.status),
			Err(e) => log::debug!("video source '{}' failed: {e}", source.src),
		}
	}
	None
}
