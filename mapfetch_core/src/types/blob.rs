//! [`Blob`]: the payload type of the fetch pipeline (mock bodies, transport responses, image bytes).
//!
//! ```rust
//! use mapfetch_core::Blob;
//!
//! let body = Blob::from(r#"{"version":8}"#);
//! assert_eq!(body.len(), 13);
//! assert!(!body.is_empty());
//! ```

use std::fmt::Debug;

/// Bytes shown by `Debug` before the output is cut off.
const PREVIEW_LEN: usize = 12;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	pub fn new_empty() -> Blob {
		Blob::default()
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Payload size in bytes.
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(bytes: Vec<u8>) -> Self {
		Blob(bytes)
	}
}

impl From<&[u8]> for Blob {
	fn from(bytes: &[u8]) -> Self {
		Blob(bytes.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(bytes: &[u8; N]) -> Self {
		Blob(bytes.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(text: &str) -> Self {
		Blob(text.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(text: String) -> Self {
		Blob(text.into_bytes())
	}
}

/// `Blob(<len> bytes: <hex preview>)`, payloads can be megabytes.
impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({} bytes:", self.0.len())?;
		for byte in self.0.iter().take(PREVIEW_LEN) {
			write!(f, " {byte:02x}")?;
		}
		if self.0.len() > PREVIEW_LEN {
			f.write_str(" …")?;
		}
		f.write_str(")")
	}
}
