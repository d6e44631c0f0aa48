//! Token-bucket rate limiter.
//!
//! The bucket holds up to `burst` tokens and refills continuously at
//! `requests_per_second`. Acquisition reserves a token immediately, letting
//! the balance go negative; the debt is the time the caller must sleep. This
//! admits waiters first-come-first-served without a queue.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};

/// Rate-limit policy applied to every non-priority request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
	/// Sustained refill rate.
	pub requests_per_second: f64,
	/// Bucket capacity.
	pub burst: u32,
	/// Longest a request may wait for a token before failing.
	pub max_wait: Duration,
}

impl RateLimit {
	pub fn new(requests_per_second: f64, burst: u32, max_wait: Duration) -> Self {
		Self {
			requests_per_second,
			burst,
			max_wait,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
			return Err(Error::Config(format!(
				"rate limit needs a positive, finite requests_per_second (got {})",
				self.requests_per_second
			)));
		}
		if self.burst == 0 {
			return Err(Error::Config("rate limit burst must be at least 1".into()));
		}
		Ok(())
	}
}

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	updated: Instant,
}

/// Shared token bucket; acquisition is the synchronization point between callers.
#[derive(Debug)]
pub struct TokenBucket {
	policy: RateLimit,
	bucket: Mutex<Bucket>,
}

impl TokenBucket {
	/// Creates a full bucket.
	pub fn new(policy: RateLimit) -> Result<Self> {
		policy.validate()?;
		Ok(Self {
			policy,
			bucket: Mutex::new(Bucket {
				tokens: f64::from(policy.burst),
				updated: Instant::now(),
			}),
		})
	}

	pub fn policy(&self) -> &RateLimit {
		&self.policy
	}

	/// Tokens currently available; negative while reservations are outstanding.
	pub fn available(&self) -> f64 {
		let mut bucket = self.bucket.lock();
		self.refill(&mut bucket, Instant::now());
		bucket.tokens
	}

	/// Waits for one token.
	///
	/// Fails with [`Error::RateLimitTimeout`] straight away when the required
	/// wait exceeds the policy's `max_wait`, and with [`Error::Cancelled`] when
	/// `cancel` fires first. The reservation is handed back on either failure,
	/// and also when the returned future is dropped before it completes.
	pub async fn acquire(&self, cancel: &CancelToken) -> Result<()> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		let delay = self.reserve();
		if delay.is_zero() {
			return Ok(());
		}
		let reservation = Reservation { limiter: self, completed: false };
		if delay > self.policy.max_wait {
			debug!(?delay, max_wait = ?self.policy.max_wait, "rate limit wait exceeds maximum");
			return Err(Error::RateLimitTimeout {
				max_wait: self.policy.max_wait,
			});
		}

		debug!(?delay, "waiting for rate-limit token");
		tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			_ = tokio::time::sleep(delay) => {}
		}
		reservation.complete();
		Ok(())
	}

	fn reserve(&self) -> Duration {
		let mut bucket = self.bucket.lock();
		self.refill(&mut bucket, Instant::now());
		bucket.tokens -= 1.0;
		if bucket.tokens >= 0.0 {
			return Duration::ZERO;
		}
		Duration::try_from_secs_f64(-bucket.tokens / self.policy.requests_per_second).unwrap_or(Duration::MAX)
	}

	fn release(&self) {
		let mut bucket = self.bucket.lock();
		bucket.tokens = (bucket.tokens + 1.0).min(f64::from(self.policy.burst));
	}

	fn refill(&self, bucket: &mut Bucket, now: Instant) {
		let elapsed = now.saturating_duration_since(bucket.updated);
		bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.policy.requests_per_second).min(f64::from(self.policy.burst));
		bucket.updated = now;
	}
}

/// A token taken ahead of time; returned to the bucket unless completed.
struct Reservation<'a> {
	limiter: &'a TokenBucket,
	completed: bool,
}

impl Reservation<'_> {
	fn complete(mut self) {
		self.completed = true;
	}
}

impl Drop for Reservation<'_> {
	fn drop(&mut self) {
		if !self.completed {
			self.limiter.release();
		}
	}
}
