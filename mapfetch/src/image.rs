//! Image decoding for [`Fetcher::get_image`](crate::Fetcher::get_image).
//!
//! Image bytes are always fetched as a raw buffer, so cache headers stay visible, and decoded
//! here. Non-empty payloads are registered under a revocable object URL for the duration of the
//! decode; the [`ObjectUrl`] guard revokes it when dropped, which happens right after decoding on
//! every path (success, decode failure, aborted task). Empty payloads decode to a fixed 1×1
//! transparent pixel.

use crate::{AjaxError, ArrayBufferResponse, ResourceTiming};
use dashmap::DashMap;
use image::{DynamicImage, Rgba, RgbaImage};
use mapfetch_core::Blob;
use std::sync::Arc;
use uuid::Uuid;

/// Colour of the placeholder pixel: fully transparent black.
pub const TRANSPARENT_PIXEL_RGBA: [u8; 4] = [0, 0, 0, 0];

const IMAGE_MIME_TYPE: &str = "image/png";

/// The 1×1 transparent placeholder used for successful fetches without content.
pub fn transparent_pixel() -> DynamicImage {
	DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba(TRANSPARENT_PIXEL_RGBA)))
}

/// Where the pixels of an [`ImageHandle`] came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
	/// Decoded from the fetched bytes. Their object URL is revoked once decoding finishes.
	Decoded,
	/// The fixed transparent placeholder.
	TransparentPixel,
}

/// A decoded image plus the cache metadata of the response it came from.
#[derive(Clone, Debug)]
pub struct ImageHandle {
	pub image: DynamicImage,
	pub source: ImageSource,
	pub cache_control: Option<String>,
	pub expires: Option<String>,
	pub timing: Option<ResourceTiming>,
}

impl ImageHandle {
	pub fn width(&self) -> u32 {
		self.image.width()
	}

	pub fn height(&self) -> u32 {
		self.image.height()
	}

	pub fn is_placeholder(&self) -> bool {
		self.source == ImageSource::TransparentPixel
	}
}

#[derive(Debug)]
struct ObjectUrlEntry {
	blob: Arc<Blob>,
	mime_type: String,
}

/// Process-local table of object URLs (`blob:` URLs addressing in-memory bytes).
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
	entries: DashMap<String, ObjectUrlEntry>,
}

impl ObjectUrlStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `blob` and returns the guard owning its URL.
	pub fn create(self: &Arc<Self>, blob: Blob, mime_type: &str) -> ObjectUrl {
		let url = format!("blob:mapfetch/{}", Uuid::new_v4());
		log::trace!("created object URL {url} ({} bytes, {mime_type})", blob.len());
		self.entries.insert(
			url.clone(),
			ObjectUrlEntry {
				blob: Arc::new(blob),
				mime_type: mime_type.to_string(),
			},
		);
		ObjectUrl {
			url,
			store: Arc::clone(self),
		}
	}

	/// The bytes behind a live URL.
	pub fn get(&self, url: &str) -> Option<Arc<Blob>> {
		self.entries.get(url).map(|entry| Arc::clone(&entry.blob))
	}

	pub fn mime_type(&self, url: &str) -> Option<String> {
		self.entries.get(url).map(|entry| entry.mime_type.clone())
	}

	/// Number of URLs not yet revoked.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn revoke(&self, url: &str) -> bool {
		let removed = self.entries.remove(url).is_some();
		if removed {
			log::trace!("revoked object URL {url}");
		}
		removed
	}
}

/// An object URL that is revoked exactly once, when the guard is dropped.
#[derive(Debug)]
pub struct ObjectUrl {
	url: String,
	store: Arc<ObjectUrlStore>,
}

impl ObjectUrl {
	pub fn as_str(&self) -> &str {
		&self.url
	}
}

impl Drop for ObjectUrl {
	fn drop(&mut self) {
		self.store.revoke(&self.url);
	}
}

/// Turns a successful buffer fetch into an [`ImageHandle`].
pub(crate) async fn decode_image(
	store: &Arc<ObjectUrlStore>,
	url: &str,
	response: ArrayBufferResponse,
) -> Result<ImageHandle, AjaxError> {
	let ArrayBufferResponse {
		data,
		cache_control,
		expires,
		timing,
	} = response;

	let (image, source) = if data.is_empty() {
		log::debug!("empty image payload from '{url}', using transparent placeholder");
		(transparent_pixel(), ImageSource::TransparentPixel)
	} else {
		let object_url = store.create(data, IMAGE_MIME_TYPE);
		let src = object_url.as_str().to_string();
		let bytes = store.get(&src).ok_or_else(|| AjaxError::Decode {
			url: url.to_string(),
			message: format!("object URL {src} was revoked before loading"),
		})?;

		let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(bytes.as_slice())).await;
		drop(object_url);

		let image = match decoded {
			Ok(Ok(image)) => image,
			Ok(Err(e)) => {
				return Err(AjaxError::Decode {
					url: url.to_string(),
					message: e.to_string(),
				});
			}
			Err(e) => {
				return Err(AjaxError::Decode {
					url: url.to_string(),
					message: format!("image decoding task failed: {e}"),
				});
			}
		};
		(image, ImageSource::Decoded)
	};

	Ok(ImageHandle {
		image,
		source,
		cache_control,
		expires,
		timing,
	})
}
