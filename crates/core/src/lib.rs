//! Async client for the Cisco UCS Manager XML API.
//!
//! ```ignore
//! use ucs::{Client, Config, ConfigResolveClass, Filter};
//!
//! let client = Client::new(
//!     Config::new("https://ucs01.example.org/")
//!         .with_credentials("admin", "password")
//!         .with_rate_limit(5.0, 10, Duration::from_secs(2)),
//! )?;
//! let login = client.login().await?;
//! let _refresher = client.spawn_refresher(login.refresh_period().unwrap_or(Duration::from_secs(600)))?;
//!
//! let blades: Blades = client
//!     .resolve_class(ConfigResolveClass::new("computeBlade").filter(Filter::eq("computeBlade", "chassisId", "1")))
//!     .await?;
//!
//! client.priority().logout().await?;
//! ```
//!
//! Wire types come from `ucs-protocol`; dispatch, rate limiting and the error
//! taxonomy from `ucs-runtime`. Both are re-exported here.

mod client;
mod config;
mod query;
mod session;

pub use client::Client;
pub use config::Config;
pub use query::Resolved;
pub use session::{RefreshHandle, SessionState};
pub use ucs_protocol::{
	AaaKeepAlive, AaaLogin, AaaLogout, AaaRefresh, Authenticated, CodecError, Combinator, ConfigResolveChildren, ConfigResolveClass,
	ConfigResolveClasses, ConfigResolveDn, ConfigResolveDns, ConfigsResponse, Document, Fault, Filter, FromDocument, KeepAliveResponse,
	LoginResponse, LogoutResponse, Method, OpaqueDocument, Operator, Predicate, Reply, ResolveDnResponse, ResolveDnsResponse, codec,
};
pub use ucs_runtime::{Admission, CancelToken, Error, HttpTransport, PostRequest, RateLimit, Result, Transport};
