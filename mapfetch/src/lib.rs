//! mapfetch: typed resource fetching for map clients.
//!
//! A [`Fetcher`] issues GET requests for the resources a map renderer needs and delivers each
//! result through a [`RequestHandle`]:
//! - [`Fetcher::get_json`] parses JSON documents such as styles and TileJSON,
//! - [`Fetcher::get_array_buffer`] returns raw bytes (tiles, glyphs) with their cache headers,
//! - [`Fetcher::get_image`] decodes sprites and raster tiles,
//! - [`Fetcher::get_video`] assembles a video element and reports when it starts loading.
//!
//! Failures are classified into [`AjaxError`]s in a fixed order: network, HTTP status, empty
//! body, decode. Requests may be answered by canned responses instead of the network, see
//! [`mock`].
//!
//! ```rust,no_run
//! use mapfetch::{Fetcher, RequestParameters, ResourceType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = Fetcher::new()?;
//!     let params = RequestParameters::new("https://demotiles.maplibre.org/style.json");
//!     let style = fetcher.get_json(&params).await?;
//!     println!("{} loaded, {} layers", ResourceType::Style, style["layers"].as_array().map_or(0, Vec::len));
//!     Ok(())
//! }
//! ```

mod classify;
mod error;
mod fetcher;
mod handle;
mod image;
pub mod mock;
mod response;
pub mod transport;
mod video;

pub use error::{AjaxError, AjaxErrorKind};
pub use fetcher::{Fetcher, FetcherBuilder};
pub use handle::RequestHandle;
pub use crate::image::{ImageHandle, ImageSource, ObjectUrl, ObjectUrlStore, TRANSPARENT_PIXEL_RGBA, transparent_pixel};
pub use mock::set_mock_request;
pub use response::{ArrayBufferResponse, ResourceTiming};
pub use video::{CrossOrigin, VideoElement, VideoHandle, VideoSource, VideoStart};

pub use mapfetch_core::{Blob, Config, Credentials, RequestParameters, ResourceType};
