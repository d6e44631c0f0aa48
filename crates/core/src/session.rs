//! Session lifecycle: login, refresh, keep-alive, logout.
//!
//! The cookie is the only mutable session state. It is replaced only after a
//! successful reply, so a failed call never leaves a half-updated session.

use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use ucs_protocol::{AaaKeepAlive, AaaLogin, AaaLogout, AaaRefresh, KeepAliveResponse, LoginResponse, LogoutResponse};
use ucs_runtime::{CancelToken, Error, Result};

use crate::client::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Unauthenticated,
	Authenticated,
}

struct Credentials {
	username: String,
	password: String,
}

struct State {
	credentials: Credentials,
	cookie: Option<String>,
}

/// Credentials and cookie shared by every clone of a client.
pub(crate) struct Session {
	state: RwLock<State>,
}

impl Session {
	pub(crate) fn new(username: String, password: String) -> Self {
		Self {
			state: RwLock::new(State {
				credentials: Credentials { username, password },
				cookie: None,
			}),
		}
	}

	pub(crate) fn cookie(&self) -> Option<String> {
		self.state.read().cookie.clone()
	}

	pub(crate) fn is_authenticated(&self) -> bool {
		self.state.read().cookie.is_some()
	}

	fn login_request(&self) -> AaaLogin {
		let state = self.state.read();
		AaaLogin::new(&state.credentials.username, &state.credentials.password)
	}

	fn refresh_request(&self) -> Result<AaaRefresh> {
		let state = self.state.read();
		let cookie = state.cookie.as_ref().ok_or(Error::NotAuthenticated)?;
		Ok(AaaRefresh::new(&state.credentials.username, &state.credentials.password, cookie))
	}

	fn establish(&self, credentials: Option<Credentials>, cookie: String) {
		let mut state = self.state.write();
		if let Some(credentials) = credentials {
			state.credentials = credentials;
		}
		state.cookie = Some(cookie);
	}

	/// Swaps `old` for `new` unless the session changed while the call was in flight.
	fn replace_cookie(&self, old: &str, new: String) -> bool {
		let mut state = self.state.write();
		if state.cookie.as_deref() != Some(old) {
			return false;
		}
		state.cookie = Some(new);
		true
	}

	fn clear_cookie(&self, old: &str) {
		let mut state = self.state.write();
		if state.cookie.as_deref() == Some(old) {
			state.cookie = None;
		}
	}
}

impl Client {
	pub fn session_state(&self) -> SessionState {
		if self.is_authenticated() {
			SessionState::Authenticated
		} else {
			SessionState::Unauthenticated
		}
	}

	/// Logs in with the configured credentials.
	pub async fn login(&self) -> Result<LoginResponse> {
		let request = self.session().login_request();
		self.authenticate(request, false).await
	}

	/// Logs in as another user. The credentials replace the configured ones
	/// only if the login succeeds.
	pub async fn login_as(&self, username: impl Into<String>, password: impl Into<String>) -> Result<LoginResponse> {
		self.authenticate(AaaLogin::new(username, password), true).await
	}

	async fn authenticate(&self, request: AaaLogin, remember: bool) -> Result<LoginResponse> {
		let response = self.send(&request).await?;
		if response.cookie.is_empty() {
			return Err(Error::Decoding("aaaLogin response carried no outCookie".into()));
		}

		let credentials = remember.then(|| Credentials {
			username: request.name.clone(),
			password: request.password.clone(),
		});
		self.session().establish(credentials, response.cookie.clone());
		info!(
			host = self.hostname(),
			user = %request.name,
			version = %response.version,
			refresh_period = ?response.refresh_period(),
			"logged in"
		);
		Ok(response)
	}

	/// Exchanges the current cookie for a new one.
	///
	/// On failure the old cookie stays in place.
	pub async fn refresh(&self) -> Result<LoginResponse> {
		let request = self.session().refresh_request()?;
		let old = request.cookie.clone();
		let response = self.send(&request).await?;
		if response.cookie.is_empty() {
			return Err(Error::Decoding("aaaRefresh response carried no outCookie".into()));
		}

		if self.session().replace_cookie(&old, response.cookie.clone()) {
			debug!(host = self.hostname(), "session refreshed");
		} else {
			debug!(host = self.hostname(), "session changed during refresh; keeping current cookie");
		}
		Ok(response)
	}

	/// Extends the server-side lifetime of the session without changing it.
	pub async fn keep_alive(&self) -> Result<KeepAliveResponse> {
		self.call(AaaKeepAlive::default()).await
	}

	/// Invalidates the session. The cookie is dropped once the server confirms.
	pub async fn logout(&self) -> Result<LogoutResponse> {
		let cookie = self.cookie().ok_or(Error::NotAuthenticated)?;
		let response = self.send(&AaaLogout { cookie: cookie.clone() }).await?;
		self.session().clear_cookie(&cookie);
		info!(host = self.hostname(), status = %response.status, "logged out");
		Ok(response)
	}

	/// Refreshes the session every `period` in a background task.
	///
	/// Refreshes bypass the rate limiter. A failed refresh is logged and
	/// retried on the next tick. The task ends when the handle is stopped or
	/// dropped, or when this client's cancel token fires.
	///
	/// Must be called from within a Tokio runtime; outside one this returns
	/// [`Error::Config`].
	pub fn spawn_refresher(&self, period: Duration) -> Result<RefreshHandle> {
		if period.is_zero() {
			return Err(Error::Config("refresh period must be non-zero".into()));
		}
		let runtime = Handle::try_current().map_err(|err| Error::Config(format!("session refresher needs a Tokio runtime: {err}")))?;

		let client = self.priority();
		let stop = CancelToken::new();
		let task = runtime.spawn({
			let stop = stop.clone();
			async move {
				let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
				ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
				loop {
					tokio::select! {
						biased;
						_ = stop.cancelled() => break,
						_ = client.cancel_token().cancelled() => break,
						_ = ticker.tick() => match client.refresh().await {
							Ok(_) => {}
							Err(Error::NotAuthenticated) => debug!("no session to refresh"),
							Err(err) => warn!(host = client.hostname(), error = %err, "session refresh failed"),
						},
					}
				}
				debug!(host = client.hostname(), "refresher stopped");
			}
		});

		Ok(RefreshHandle { stop, task })
	}
}

/// Owns a background refresher. Dropping it stops the task.
#[derive(Debug)]
pub struct RefreshHandle {
	stop: CancelToken,
	task: JoinHandle<()>,
}

impl RefreshHandle {
	/// Stops the refresher and waits for it to exit.
	///
	/// A panic inside the task is logged rather than resumed.
	pub async fn stop(mut self) {
		self.stop.cancel();
		match (&mut self.task).await {
			Ok(()) => {}
			Err(err) if err.is_panic() => warn!(error = %err, "session refresher panicked"),
			Err(err) => debug!(error = %err, "session refresher did not finish"),
		}
	}

	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}
}

impl Drop for RefreshHandle {
	fn drop(&mut self) {
		self.stop.cancel();
	}
}
