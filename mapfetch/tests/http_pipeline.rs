//! End-to-end tests against a local HTTP server: real sockets, real `reqwest` transport.


use mapfetch::{AjaxError, AjaxErrorKind, Fetcher, ImageSource, RequestParameters, mock::MockRegistry};
use pretty_assertions::assert_eq;
use reqwest::Url;
use rstest::rstest;
use serde::Deserialize;
use std::sync::Arc;
use test_utilities::*;

/// A fetcher for the test server that never consults the process-wide mock table.
fn fetcher(origin: &Url) -> Fetcher {
	Fetcher::builder()
		.mock_provider(Arc::new(MockRegistry::new()))
		.origin(origin.clone())
		.build()
		.unwrap()
}

fn params(base: &Url, path: &str) -> RequestParameters {
	RequestParameters::new(base.join(path).unwrap().as_str())
}

#[tokio::test]
async fn json_style() {
	let base = spawn_server().await;
	let value = fetcher(&base).get_json(&params(&base, "style.json")).await.unwrap();
	assert_eq!(value, serde_json::from_str::<serde_json::Value>(STYLE_JSON).unwrap());
}

#[tokio::test]
async fn json_into_typed_value() {
	#[derive(Debug, Deserialize, PartialEq)]
	struct Style {
		version: u8,
		name: String,
	}

	let base = spawn_server().await;
	let style: Style = fetcher(&base)
		.get_json_as(&RequestParameters::new("/style.json"))
		.await
		.unwrap();
	assert_eq!(
		style,
		Style {
			version: 8,
			name: "test".into()
		}
	);
}

#[tokio::test]
async fn json_sends_accept_header() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);

	let value = fetcher.get_json(&params(&base, "echo-accept")).await.unwrap();
	assert_eq!(value["accept"], "application/json");

	let custom = params(&base, "echo-accept").with_header("Accept", "application/geo+json");
	let value = fetcher.get_json(&custom).await.unwrap();
	assert_eq!(value["accept"], "application/geo+json");
}

#[tokio::test]
async fn json_parse_failures_are_decode_errors() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);

	for path in ["broken.json", "empty", "not-an-image"] {
		let err = fetcher.get_json(&params(&base, path)).await.unwrap_err();
		assert_eq!(err.kind(), AjaxErrorKind::Decode, "{path}: {err}");
	}
}

#[rstest]
#[case("missing", 404, "Not Found")]
#[case("error", 500, "Internal Server Error")]
#[tokio::test]
async fn http_errors_keep_status_and_url(#[case] path: &str, #[case] status: u16, #[case] status_text: &str) {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);
	let request = params(&base, path);
	let expected = AjaxError::Http {
		status,
		status_text: status_text.into(),
		url: request.url.clone(),
	};

	assert_eq!(fetcher.get_json(&request).await.unwrap_err(), expected);
	assert_eq!(fetcher.get_array_buffer(&request).await.unwrap_err(), expected);
	assert_eq!(fetcher.get_image(&request).await.unwrap_err(), expected);
}

#[tokio::test]
async fn http_error_url_is_the_callers_url() {
	let base = spawn_server().await;
	let err = fetcher(&base)
		.get_array_buffer(&RequestParameters::new("/missing"))
		.await
		.unwrap_err();
	assert_eq!(err.status(), Some(404));
	assert_eq!(err.url(), "/missing");
}

#[tokio::test]
async fn buffer_with_cache_headers() {
	let base = spawn_server().await;
	let response = fetcher(&base)
		.get_array_buffer(&params(&base, "sprite.png"))
		.await
		.unwrap();
	assert_eq!(response.data.as_slice(), png_bytes(2, 3).as_slice());
	assert_eq!(response.cache_control.as_deref(), Some(CACHE_CONTROL));
	assert_eq!(response.expires.as_deref(), Some(EXPIRES));
	assert_eq!(response.timing, None);
}

#[tokio::test]
async fn buffer_timing() {
	let base = spawn_server().await;
	let request = params(&base, "style.json").with_resource_timing(true);
	let response = fetcher(&base).get_array_buffer(&request).await.unwrap();
	let timing = response.timing.unwrap();
	assert_eq!(timing.name, request.url);
	assert_eq!(timing.transfer_size, STYLE_JSON.len() as u64);
}

#[tokio::test]
async fn empty_200_is_an_empty_body_error() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);
	let request = params(&base, "empty");

	let err = fetcher.get_array_buffer(&request).await.unwrap_err();
	assert_eq!(err, AjaxError::EmptyBody { url: request.url.clone() });
	assert_eq!(err.status(), Some(200));

	let err = fetcher.get_image(&request).await.unwrap_err();
	assert_eq!(err.kind(), AjaxErrorKind::EmptyBody);
}

#[tokio::test]
async fn no_content_is_an_empty_buffer() {
	let base = spawn_server().await;
	let response = fetcher(&base)
		.get_array_buffer(&params(&base, "no-content"))
		.await
		.unwrap();
	assert!(response.data.is_empty());
}

#[tokio::test]
async fn no_content_image_is_a_transparent_pixel() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);
	let image = fetcher.get_image(&params(&base, "no-content")).await.unwrap();
	assert!(image.is_placeholder());
	assert_eq!((image.width(), image.height()), (1, 1));
	assert_eq!(image.image.to_rgba8().get_pixel(0, 0).0, mapfetch::TRANSPARENT_PIXEL_RGBA);
	assert!(fetcher.object_urls().is_empty());
}

#[tokio::test]
async fn image_decodes_and_revokes_object_url() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);
	let image = fetcher
		.get_image(&params(&base, "sprite.png").with_resource_timing(true))
		.await
		.unwrap();

	assert_eq!((image.width(), image.height()), (2, 3));
	assert_eq!(image.source, ImageSource::Decoded);
	assert_eq!(image.cache_control.as_deref(), Some(CACHE_CONTROL));
	assert_eq!(image.expires.as_deref(), Some(EXPIRES));
	assert!(image.timing.is_some());
	assert!(fetcher.object_urls().is_empty());
}

#[tokio::test]
async fn undecodable_image_is_a_decode_error() {
	let base = spawn_server().await;
	let fetcher = fetcher(&base);
	let err = fetcher.get_image(&params(&base, "not-an-image")).await.unwrap_err();
	assert_eq!(err.kind(), AjaxErrorKind::Decode);
	assert!(fetcher.object_urls().is_empty());
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
	let url = closed_port_url("/style.json");
	let fetcher = Fetcher::builder().without_mocks().build().unwrap();
	let err = fetcher.get_json(&RequestParameters::new(&url)).await.unwrap_err();
	assert_eq!(err.kind(), AjaxErrorKind::Network);
	assert_eq!(err.url(), url);
	assert_eq!(err.status(), None);
}

#[tokio::test]
async fn abort_pending_request() {
	let base = spawn_server().await;
	let request = params(&base, "slow");
	let handle = fetcher(&base).get_array_buffer(&request);
	tokio::task::yield_now().await;
	handle.abort();
	assert_eq!(handle.await.unwrap_err(), AjaxError::Aborted { url: request.url });
}

#[tokio::test]
async fn video_starts_with_first_working_source() {
	let base = spawn_server().await;
	let video = fetcher(&base).get_video(&["/missing", "/video.mp4", "/style.json"]);

	assert_eq!(video.element().cross_origin, None);
	assert_eq!(video.element().sources.len(), 3);

	let start = video.load_start().await.unwrap();
	assert_eq!(start.index, 1);
	assert_eq!(start.src, "/video.mp4");
	assert_eq!(start.content_type.as_deref(), Some("video/mp4"));
}
