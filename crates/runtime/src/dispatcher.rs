//! Request dispatcher.
//!
//! Every call goes through [`Dispatcher::dispatch`], which takes a token from
//! the shared bucket before the HTTP exchange. [`Dispatcher::dispatch_now`]
//! skips the bucket and is reserved for session maintenance, so a saturated
//! limiter cannot starve `aaaRefresh`/`aaaKeepAlive`.

use std::sync::Arc;

use tracing::debug;
use ucs_protocol::{Method, Reply, codec, decode_reply};
use url::Url;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::limiter::{RateLimit, TokenBucket};
use crate::transport::{PostRequest, Transport};

/// How a request is admitted to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
	/// Wait for a rate-limit token first.
	Limited,
	/// Bypass the limiter.
	Immediate,
}

/// Serializes requests, posts them and decodes the replies.
pub struct Dispatcher {
	url: Url,
	transport: Arc<dyn Transport>,
	limiter: Option<TokenBucket>,
}

impl Dispatcher {
	/// Creates a dispatcher posting to `url`. `None` disables rate limiting.
	pub fn new(url: Url, transport: Arc<dyn Transport>, rate_limit: Option<RateLimit>) -> Result<Self> {
		let limiter = rate_limit.map(TokenBucket::new).transpose()?;
		Ok(Self { url, transport, limiter })
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	pub fn limiter(&self) -> Option<&TokenBucket> {
		self.limiter.as_ref()
	}

	/// Sends `request` once a rate-limit token is available.
	pub async fn dispatch<M: Method>(&self, request: &M, cancel: &CancelToken) -> Result<Reply<M::Response>> {
		self.send(Admission::Limited, request, cancel).await
	}

	/// Sends `request` without consulting the rate limiter.
	pub async fn dispatch_now<M: Method>(&self, request: &M, cancel: &CancelToken) -> Result<Reply<M::Response>> {
		self.send(Admission::Immediate, request, cancel).await
	}

	/// Sends `request` under the given admission policy.
	///
	/// A server-reported fault is returned as [`Reply::Fault`]; only transport,
	/// codec, limiter and cancellation failures are errors here.
	pub async fn send<M: Method>(&self, admission: Admission, request: &M, cancel: &CancelToken) -> Result<Reply<M::Response>> {
		if let (Admission::Limited, Some(limiter)) = (admission, &self.limiter) {
			limiter.acquire(cancel).await?;
		}

		let body = codec::encode(request)?;
		debug!(method = M::NAME, ?admission, bytes = body.len(), "sending request");

		let post = PostRequest::new(self.url.clone(), body);
		let response = tokio::select! {
			biased;
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			response = self.transport.post(post) => response?,
		};

		debug!(method = M::NAME, bytes = response.len(), "received response");
		Ok(decode_reply::<M>(&response)?)
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("url", &self.url.as_str())
			.field("limiter", &self.limiter)
			.finish_non_exhaustive()
	}
}
