//! HTTP transport seam.
//!
//! The dispatcher hands a fully encoded [`PostRequest`] to a [`Transport`] and
//! gets the raw response body back. [`HttpTransport`] is the `reqwest`-backed
//! default; tests and embedders can substitute their own implementation.

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, Result};

/// Relative path of the XML API endpoint, resolved against the configured base.
pub const API_PATH: &str = "nuova";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ucs-rs/", env!("CARGO_PKG_VERSION"));

/// Content type the endpoint expects for XML request bodies.
pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A single POST exchange with the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
	pub url: Url,
	pub user_agent: &'static str,
	pub content_type: &'static str,
	pub body: Vec<u8>,
}

impl PostRequest {
	pub fn new(url: Url, body: Vec<u8>) -> Self {
		Self {
			url,
			user_agent: USER_AGENT,
			content_type: CONTENT_TYPE,
			body,
		}
	}
}

/// Sends a POST and returns the full response body.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn post(&self, request: PostRequest) -> Result<Vec<u8>>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
	client: reqwest::Client,
}

impl HttpTransport {
	/// Builds a transport, optionally accepting self-signed certificates.
	pub fn new(accept_invalid_certs: bool) -> Result<Self> {
		let client = reqwest::Client::builder()
			.danger_accept_invalid_certs(accept_invalid_certs)
			.build()
			.map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;
		Ok(Self { client })
	}

	/// Wraps a preconfigured client (proxies, timeouts, root certificates).
	pub fn from_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn post(&self, request: PostRequest) -> Result<Vec<u8>> {
		let response = self
			.client
			.post(request.url)
			.header(reqwest::header::USER_AGENT, request.user_agent)
			.header(reqwest::header::CONTENT_TYPE, request.content_type)
			.body(request.body)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::transport(format!("unexpected HTTP status {status}")));
		}

		Ok(response.bytes().await?.to_vec())
	}
}

/// Resolves the API path against the endpoint base address.
pub fn api_url(endpoint: &str) -> Result<Url> {
	let base = Url::parse(endpoint).map_err(|e| Error::Config(format!("invalid endpoint '{endpoint}': {e}")))?;
	if base.cannot_be_a_base() {
		return Err(Error::Config(format!("endpoint '{endpoint}' cannot be used as a base URL")));
	}
	base.join(API_PATH)
		.map_err(|e| Error::Config(format!("cannot resolve '{API_PATH}' against '{endpoint}': {e}")))
}
