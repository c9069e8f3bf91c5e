use mapfetch_core::Blob;
use std::time::Duration;

/// Raw bytes plus the cache headers a caller needs for its own cache bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayBufferResponse {
	pub data: Blob,
	pub cache_control: Option<String>,
	pub expires: Option<String>,
	/// Present when the request asked for resource timing.
	pub timing: Option<ResourceTiming>,
}

/// Timing of one transport exchange, collected on request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceTiming {
	/// The resolved request URL.
	pub name: String,
	/// Time from dispatch until the exchange completed.
	pub duration: Duration,
	/// Body size in bytes.
	pub transfer_size: u64,
}
