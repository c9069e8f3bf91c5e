//! [`RequestHandle`]: returned immediately by every fetch operation, resolved later with exactly
//! one result.

use crate::AjaxError;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tokio::{runtime::Handle, task::JoinHandle};

/// A pending fetch.
///
/// Await it to get the result. [`RequestHandle::abort`] cancels the exchange if it has not
/// completed yet; awaiting an aborted handle yields [`AjaxError::Aborted`]. Aborting a handle
/// whose exchange already completed changes nothing, the completed result is still delivered.
///
/// Dropping the handle without awaiting it lets the exchange run to completion in the background.
#[derive(Debug)]
pub struct RequestHandle<T> {
	url: String,
	task: JoinHandle<Result<T, AjaxError>>,
}

impl<T: Send + 'static> RequestHandle<T> {
	pub(crate) fn spawn<F>(runtime: &Handle, url: &str, future: F) -> Self
	where
		F: Future<Output = Result<T, AjaxError>> + Send + 'static,
	{
		Self {
			url: url.to_string(),
			task: runtime.spawn(future),
		}
	}
}

impl<T> RequestHandle<T> {
	/// Cancels the exchange. No-op once it has completed.
	pub fn abort(&self) {
		if !self.task.is_finished() {
			log::debug!("aborting request for '{}'", self.url);
		}
		self.task.abort();
	}

	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}

	/// The URL as the caller passed it.
	pub fn url(&self) -> &str {
		&self.url
	}
}

impl<T> Future for RequestHandle<T> {
	type Output = Result<T, AjaxError>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();
		match Pin::new(&mut this.task).poll(cx) {
			Poll::Pending => Poll::Pending,
			Poll::Ready(Ok(result)) => Poll::Ready(result),
			Poll::Ready(Err(e)) if e.is_cancelled() => Poll::Ready(Err(AjaxError::Aborted {
				url: this.url.clone(),
			})),
			Poll::Ready(Err(e)) => std::panic::resume_unwind(e.into_panic()),
		}
	}
}
