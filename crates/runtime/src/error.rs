//! Error types for the UCS runtime.

use std::time::Duration;

use thiserror::Error;
use ucs_protocol::{CodecError, Fault};

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by dispatch and session operations.
///
/// Nothing is retried internally; the variants carry enough detail for the
/// caller to decide on retry or backoff.
#[derive(Debug, Error)]
pub enum Error {
	/// Network or HTTP failure (connection refused, timeout, non-2xx status).
	#[error("Transport error: {message}")]
	Transport {
		message: String,
		#[source]
		source: Option<Box<dyn std::error::Error + Send + Sync>>,
	},

	/// The request could not be serialized.
	#[error("Encoding error: {0}")]
	Encoding(String),

	/// The response was not well-formed XML or did not fit the destination type.
	#[error("Decoding error: {0}")]
	Decoding(String),

	/// The server rejected the call through its error attributes.
	#[error("Remote error: {0}")]
	Remote(#[from] Fault),

	/// No rate-limit token became available within the configured wait.
	#[error("Rate limit: no token available within {max_wait:?}")]
	RateLimitTimeout { max_wait: Duration },

	/// The caller's cancel token fired.
	#[error("Operation cancelled")]
	Cancelled,

	/// The operation needs a session cookie but the client is not logged in.
	#[error("Not authenticated: log in first")]
	NotAuthenticated,

	/// Invalid client configuration.
	#[error("Invalid configuration: {0}")]
	Config(String),
}

impl Error {
	pub(crate) fn transport(message: impl Into<String>) -> Self {
		Error::Transport {
			message: message.into(),
			source: None,
		}
	}

	/// Returns the server-reported fault if this is a Remote error.
	pub fn fault(&self) -> Option<&Fault> {
		match self {
			Error::Remote(fault) => Some(fault),
			_ => None,
		}
	}

	/// Returns the server's `errorCode` if this is a Remote error.
	pub fn remote_code(&self) -> Option<&str> {
		self.fault().map(|f| f.code.as_str())
	}

	/// Returns true if this is a rate-limit timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::RateLimitTimeout { .. })
	}

	/// Returns true if the caller cancelled the operation.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}
}

impl From<CodecError> for Error {
	fn from(err: CodecError) -> Self {
		match err {
			CodecError::Encode(msg) => Error::Encoding(msg),
			CodecError::Decode(msg) => Error::Decoding(msg),
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		let message = if err.is_timeout() {
			"request timed out".to_string()
		} else if err.is_connect() {
			"connection failed".to_string()
		} else {
			err.to_string()
		};
		Error::Transport {
			message,
			source: Some(Box::new(err)),
		}
	}
}
