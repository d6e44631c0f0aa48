//! Cooperative cancellation signal.
//!
//! A [`CancelToken`] is observed by the limiter wait and the HTTP exchange;
//! firing it makes both return [`Error::Cancelled`](crate::Error::Cancelled).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Cloneable cancellation signal. Clones observe the same state.
#[derive(Clone, Default)]
pub struct CancelToken {
	inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
	cancelled: AtomicBool,
	notify: Notify,
}

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fires the signal. Idempotent.
	pub fn cancel(&self) {
		if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
			self.inner.notify.notify_waiters();
		}
	}

	pub fn is_cancelled(&self) -> bool {
		self.inner.cancelled.load(Ordering::SeqCst)
	}

	/// Completes once the signal has fired.
	///
	/// Creates the `Notified` future before checking the flag so a concurrent
	/// [`cancel`](Self::cancel) cannot be missed.
	pub async fn cancelled(&self) {
		loop {
			let notified = self.inner.notify.notified();
			if self.is_cancelled() {
				return;
			}
			notified.await;
		}
	}
}

impl std::fmt::Debug for CancelToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CancelToken").field("cancelled", &self.is_cancelled()).finish()
	}
}
