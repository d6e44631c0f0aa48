//! Session methods: `aaaLogin`, `aaaRefresh`, `aaaKeepAlive`, `aaaLogout`.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::codec::{self, Document};
use crate::envelope::{Authenticated, FromDocument, Method};

/// Initial authentication; answered with a session cookie.
#[derive(Clone, Serialize)]
#[serde(rename = "aaaLogin")]
pub struct AaaLogin {
	#[serde(rename = "@inName")]
	pub name: String,
	#[serde(rename = "@inPassword")]
	pub password: String,
}

impl AaaLogin {
	pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			password: password.into(),
		}
	}
}

impl fmt::Debug for AaaLogin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AaaLogin").field("name", &self.name).field("password", &"<redacted>").finish()
	}
}

impl Method for AaaLogin {
	const NAME: &'static str = "aaaLogin";
	type Response = LoginResponse;
}

/// Exchanges the current cookie for a fresh one.
#[derive(Clone, Serialize)]
#[serde(rename = "aaaRefresh")]
pub struct AaaRefresh {
	#[serde(rename = "@inName")]
	pub name: String,
	#[serde(rename = "@inPassword")]
	pub password: String,
	#[serde(rename = "@inCookie")]
	pub cookie: String,
}

impl AaaRefresh {
	pub fn new(name: impl Into<String>, password: impl Into<String>, cookie: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			password: password.into(),
			cookie: cookie.into(),
		}
	}
}

impl fmt::Debug for AaaRefresh {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AaaRefresh")
			.field("name", &self.name)
			.field("password", &"<redacted>")
			.field("cookie", &self.cookie)
			.finish()
	}
}

impl Method for AaaRefresh {
	const NAME: &'static str = "aaaRefresh";
	type Response = LoginResponse;
}

impl Authenticated for AaaRefresh {
	fn set_cookie(&mut self, cookie: String) {
		self.cookie = cookie;
	}
}

/// Output of `aaaLogin` and `aaaRefresh`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginResponse {
	/// `outCookie`: the session cookie to send with later requests.
	pub cookie: String,
	/// `outRefreshPeriod`, in seconds.
	pub refresh_period_secs: Option<u64>,
	pub privileges: String,
	pub domains: String,
	pub channel: String,
	pub event_channel: String,
	pub user_name: String,
	/// `outVersion`: API version of the endpoint.
	pub version: String,
	pub session_id: String,
}

impl LoginResponse {
	/// Interval after which the server expects the session to be refreshed.
	pub fn refresh_period(&self) -> Option<Duration> {
		self.refresh_period_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
	}
}

impl FromDocument for LoginResponse {
	fn from_document(doc: Document) -> codec::Result<Self> {
		Ok(Self {
			cookie: doc.text("outCookie"),
			refresh_period_secs: doc.parse_attr("outRefreshPeriod")?,
			privileges: doc.text("outPriv"),
			domains: doc.text("outDomains"),
			channel: doc.text("outChannel"),
			event_channel: doc.text("outEvtChannel"),
			user_name: doc.text("outName"),
			version: doc.text("outVersion"),
			session_id: doc.text("outSessionId"),
		})
	}
}

/// Extends the server-side lifetime of the current session.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "aaaKeepAlive")]
pub struct AaaKeepAlive {
	#[serde(rename = "@cookie")]
	pub cookie: String,
}

impl Method for AaaKeepAlive {
	const NAME: &'static str = "aaaKeepAlive";
	type Response = KeepAliveResponse;
}

impl Authenticated for AaaKeepAlive {
	fn set_cookie(&mut self, cookie: String) {
		self.cookie = cookie;
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepAliveResponse {
	pub cookie: String,
}

impl FromDocument for KeepAliveResponse {
	fn from_document(doc: Document) -> codec::Result<Self> {
		Ok(Self { cookie: doc.text("cookie") })
	}
}

/// Invalidates the session cookie.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "aaaLogout")]
pub struct AaaLogout {
	#[serde(rename = "@inCookie")]
	pub cookie: String,
}

impl Method for AaaLogout {
	const NAME: &'static str = "aaaLogout";
	type Response = LogoutResponse;
}

impl Authenticated for AaaLogout {
	fn set_cookie(&mut self, cookie: String) {
		self.cookie = cookie;
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoutResponse {
	/// `outStatus`, e.g. `"success"`.
	pub status: String,
}

impl FromDocument for LogoutResponse {
	fn from_document(doc: Document) -> codec::Result<Self> {
		Ok(Self { status: doc.text("outStatus") })
	}
}
