//! Pipeline tests with scripted transports and injected mock providers.


use mapfetch::{
	AjaxError, AjaxErrorKind, Fetcher, RequestParameters,
	mock::MockRegistry,
	transport::{MOCK_NO_BODY_STATUS_TEXT, ResponseType, Transport, TransportError, TransportResult},
};
use pretty_assertions::assert_eq;
use reqwest::Url;
use rstest::rstest;
use std::sync::Arc;
use test_utilities::*;

const ORIGIN: &str = "https://maps.example.com/";

fn fetcher(transport: Arc<dyn Transport>, mocks: MockRegistry) -> Fetcher {
	Fetcher::builder()
		.transport(transport)
		.mock_provider(Arc::new(mocks))
		.origin(Url::parse(ORIGIN).unwrap())
		.build()
		.unwrap()
}

#[rstest]
#[case(403, "Forbidden")]
#[case(404, "Not Found")]
#[case(500, "Internal Server Error")]
#[case(503, "Service Unavailable")]
#[tokio::test]
async fn simulated_statuses(#[case] status: u16, #[case] status_text: &str) {
	let transport = ScriptedTransport::new()
		.answer("/tiles/3/4/2.pbf", Ok(TransportResult::new(status, status_text)))
		.arc();
	let url = "https://tiles.example.com/tiles/3/4/2.pbf?fresh=true";

	let err = fetcher(transport, MockRegistry::new())
		.get_array_buffer(&RequestParameters::new(url))
		.await
		.unwrap_err();
	assert_eq!(
		err,
		AjaxError::Http {
			status,
			status_text: status_text.into(),
			url: url.into()
		}
	);
	assert_eq!(err.to_string(), format!("HTTP {status} ({status_text}) for '{url}'"));
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
	let transport = ScriptedTransport::new()
		.answer("/style.json", Err(TransportError::new("connection reset by peer")))
		.arc();
	let err = fetcher(transport, MockRegistry::new())
		.get_json(&RequestParameters::new("/style.json"))
		.await
		.unwrap_err();
	assert_eq!(
		err,
		AjaxError::Network {
			url: "/style.json".into(),
			message: "connection reset by peer".into()
		}
	);
}

#[tokio::test]
async fn network_is_checked_before_anything_else() {
	let transport = ScriptedTransport::new()
		.answer("/a.png", Err(TransportError::new("dns failure")))
		.arc();
	let err = fetcher(transport, MockRegistry::new())
		.get_image(&RequestParameters::new("/a.png"))
		.await
		.unwrap_err();
	assert_eq!(err.kind(), AjaxErrorKind::Network);
}

#[tokio::test]
async fn mock_hit_skips_the_transport() {
	let transport = ScriptedTransport::new().arc();
	let mocks = MockRegistry::new().with_body("maps.example.com", "/style.json", r#"{"version":8}"#);
	let fetcher = fetcher(transport.clone(), mocks);

	let value = fetcher
		.get_json(&RequestParameters::new("/style.json?access_token=pk.x"))
		.await
		.unwrap();
	assert_eq!(value, serde_json::json!({"version": 8}));
	assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn mock_key_ignores_port() {
	let transport = ScriptedTransport::new().arc();
	let mocks = MockRegistry::new().with_body("tiles.example.com", "/0/0/0.pbf", &[1u8, 2, 3]);
	let response = fetcher(transport, mocks)
		.get_array_buffer(&RequestParameters::new("https://tiles.example.com:8443/0/0/0.pbf"))
		.await
		.unwrap();
	assert_eq!(response.data.as_slice(), &[1, 2, 3]);
}

#[tokio::test]
async fn mock_entry_without_body_is_a_404() {
	let transport = ScriptedTransport::new().arc();
	let mocks = MockRegistry::new().with_absent("maps.example.com", "/gone.json");
	let err = fetcher(transport.clone(), mocks)
		.get_json(&RequestParameters::new("/gone.json"))
		.await
		.unwrap_err();
	assert_eq!(
		err,
		AjaxError::Http {
			status: 404,
			status_text: MOCK_NO_BODY_STATUS_TEXT.into(),
			url: "/gone.json".into()
		}
	);
	assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn mock_miss_reaches_the_transport() {
	let transport = ScriptedTransport::new()
		.answer("/other.json", Ok(TransportResult::new(200, "OK").with_body("[]")))
		.arc();
	let mocks = MockRegistry::new().with_body("maps.example.com", "/style.json", "{}");
	let value = fetcher(transport.clone(), mocks)
		.get_json(&RequestParameters::new("/other.json"))
		.await
		.unwrap();
	assert_eq!(value, serde_json::json!([]));

	let sent = transport.sent();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].url.as_str(), "https://maps.example.com/other.json");
	assert_eq!(sent[0].response_type, ResponseType::Text);
}

#[tokio::test]
async fn image_from_mock_body() {
	let transport = ScriptedTransport::new().arc();
	let mocks = MockRegistry::new().with_body("maps.example.com", "/sprite.png", png_bytes(4, 2));
	let fetcher = fetcher(transport, mocks);
	let image = fetcher.get_image(&RequestParameters::new("/sprite.png")).await.unwrap();
	assert_eq!((image.width(), image.height()), (4, 2));
	assert!(!image.is_placeholder());
	assert!(fetcher.object_urls().is_empty());
}

#[tokio::test]
async fn invalid_url_is_delivered_through_the_handle() {
	let transport = ScriptedTransport::new().arc();
	let handle = fetcher(transport.clone(), MockRegistry::new()).get_json(&RequestParameters::new("http://[::1"));
	let err = handle.await.unwrap_err();
	assert_eq!(err.kind(), AjaxErrorKind::InvalidRequest);
	assert_eq!(err.url(), "http://[::1");
	assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn abort_stalled_request() {
	let fetcher = fetcher(Arc::new(StalledTransport), MockRegistry::new());
	let handles = [
		fetcher.get_json(&RequestParameters::new("/a.json")),
		fetcher.get_json(&RequestParameters::new("/b.json")),
	];
	handles[0].abort();
	let [first, second] = handles;
	assert_eq!(first.await.unwrap_err(), AjaxError::Aborted { url: "/a.json".into() });

	// The other request is unaffected.
	assert!(!second.is_finished());
	second.abort();
	assert_eq!(second.await.unwrap_err().kind(), AjaxErrorKind::Aborted);
}

#[tokio::test]
async fn video_probe_skips_failing_sources() {
	let transport = ScriptedTransport::new()
		.answer("/a.webm", Ok(TransportResult::new(404, "Not Found")))
		.answer("/b.mp4", Err(TransportError::new("reset")))
		.answer(
			"/c.mp4",
			Ok(TransportResult::new(200, "OK").with_header("Content-Type", "video/mp4")),
		)
		.arc();
	let video = fetcher(transport.clone(), MockRegistry::new()).get_video(&[
		"/a.webm",
		"https://cdn.example.net/b.mp4",
		"/c.mp4",
	]);

	let element = video.element().clone();
	assert_eq!(element.cross_origin, Some(mapfetch::CrossOrigin::Anonymous));
	assert_eq!(
		element.sources.iter().map(|s| s.same_origin).collect::<Vec<_>>(),
		[true, false, true]
	);

	let start = video.load_start().await.unwrap();
	assert_eq!(start.index, 2);
	assert_eq!(start.src, "/c.mp4");
	assert!(
		transport
			.sent()
			.iter()
			.all(|request| request.response_type == ResponseType::HeadersOnly)
	);
}

#[tokio::test]
async fn video_without_working_source() {
	let transport = ScriptedTransport::new().arc();
	let video = fetcher(transport, MockRegistry::new()).get_video(&["/a.mp4", "/b.mp4"]);
	assert_eq!(video.load_start().await, None);
}

#[tokio::test]
async fn video_abort() {
	let video = fetcher(Arc::new(StalledTransport), MockRegistry::new()).get_video(&["/a.mp4"]);
	video.abort();
	assert_eq!(video.load_start().await, None);
}
