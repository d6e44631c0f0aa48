//! The UCS Manager client handle.

use std::sync::Arc;

use tracing::debug;
use ucs_protocol::{Authenticated, Method};
use ucs_runtime::{Admission, CancelToken, Dispatcher, Error, HttpTransport, Result, Transport, api_url};

use crate::config::Config;
use crate::session::Session;

/// Async client for one UCS Manager endpoint.
///
/// `Client` is cheap to clone; clones share the session cookie and the rate
/// limiter and may be used from any number of tasks at once.
#[derive(Clone)]
pub struct Client {
	inner: Arc<Inner>,
	cancel: CancelToken,
	admission: Admission,
}

struct Inner {
	dispatcher: Dispatcher,
	session: Session,
}

impl Client {
	/// Validates `config` and builds an unauthenticated client.
	pub fn new(config: Config) -> Result<Self> {
		let url = api_url(&config.endpoint)?;
		let transport: Arc<dyn Transport> = match config.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(config.accept_invalid_certs)?),
		};
		let dispatcher = Dispatcher::new(url, transport, config.rate_limit)?;
		debug!(url = %dispatcher.url(), rate_limit = ?config.rate_limit, "created UCS client");

		Ok(Self {
			inner: Arc::new(Inner {
				dispatcher,
				session: Session::new(config.username, config.password),
			}),
			cancel: CancelToken::new(),
			admission: Admission::Limited,
		})
	}

	/// Host portion of the API URL.
	pub fn hostname(&self) -> &str {
		self.inner.dispatcher.url().host_str().unwrap_or_default()
	}

	/// Full URL every request is posted to.
	pub fn url(&self) -> &str {
		self.inner.dispatcher.url().as_str()
	}

	/// Returns a handle sharing this client's session and limiter but
	/// observing `cancel` for every call it makes.
	pub fn with_cancel(&self, cancel: CancelToken) -> Self {
		Self {
			cancel,
			..self.clone()
		}
	}

	pub fn cancel_token(&self) -> &CancelToken {
		&self.cancel
	}

	/// Returns a handle whose calls bypass the rate limiter.
	///
	/// Meant for session housekeeping (refresh, keep-alive, logout on
	/// shutdown) that must not queue behind bulk queries.
	pub fn priority(&self) -> Self {
		Self {
			admission: Admission::Immediate,
			..self.clone()
		}
	}

	pub fn admission(&self) -> Admission {
		self.admission
	}

	/// Current session cookie, if logged in.
	pub fn cookie(&self) -> Option<String> {
		self.session().cookie()
	}

	pub fn is_authenticated(&self) -> bool {
		self.session().is_authenticated()
	}

	/// Sends any authenticated request with the current session cookie.
	///
	/// A server-reported fault becomes [`Error::Remote`].
	pub async fn call<M: Authenticated>(&self, mut request: M) -> Result<M::Response> {
		let cookie = self.cookie().ok_or(Error::NotAuthenticated)?;
		request.set_cookie(cookie);
		self.send(&request).await
	}

	pub(crate) async fn send<M: Method>(&self, request: &M) -> Result<M::Response> {
		let reply = self.inner.dispatcher.send(self.admission, request, &self.cancel).await?;
		Ok(reply.into_result()?)
	}

	pub(crate) fn session(&self) -> &Session {
		&self.inner.session
	}
}

impl std::fmt::Debug for Client {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Client")
			.field("url", &self.url())
			.field("authenticated", &self.is_authenticated())
			.field("admission", &self.admission)
			.finish_non_exhaustive()
	}
}
