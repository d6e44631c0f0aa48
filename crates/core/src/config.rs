//! Client configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ucs_runtime::{RateLimit, Transport};

/// Everything a [`Client`](crate::Client) needs to reach and authenticate
/// against one UCS Manager endpoint.
#[derive(Clone)]
pub struct Config {
	/// Base address, e.g. `https://ucs01.example.org/`. The API path is
	/// resolved against it.
	pub endpoint: String,
	/// Login name sent with `aaaLogin` and `aaaRefresh`.
	pub username: String,
	pub password: String,
	/// Custom transport; `None` builds a `reqwest`-backed one.
	pub transport: Option<Arc<dyn Transport>>,
	/// Limits every non-priority request; `None` disables limiting.
	pub rate_limit: Option<RateLimit>,
	/// Accept self-signed certificates. Only used by the default transport.
	pub accept_invalid_certs: bool,
}

impl Config {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			username: String::new(),
			password: String::new(),
			transport: None,
			rate_limit: None,
			accept_invalid_certs: false,
		}
	}

	/// Sets the login credentials.
	pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = username.into();
		self.password = password.into();
		self
	}

	/// Replaces the default HTTP transport.
	pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Enables the token-bucket limiter.
	pub fn with_rate_limit(mut self, requests_per_second: f64, burst: u32, max_wait: Duration) -> Self {
		self.rate_limit = Some(RateLimit::new(requests_per_second, burst, max_wait));
		self
	}

	pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
		self.accept_invalid_certs = accept;
		self
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("endpoint", &self.endpoint)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.field("transport", &self.transport.as_ref().map(|_| "<custom>"))
			.field("rate_limit", &self.rate_limit)
			.field("accept_invalid_certs", &self.accept_invalid_certs)
			.finish()
	}
}
