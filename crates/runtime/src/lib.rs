//! Transport and dispatch for the UCS Manager XML API.
//!
//! This crate turns the wire types from `ucs-protocol` into HTTP exchanges:
//!
//! - [`Transport`]: the POST seam, with [`HttpTransport`] as the `reqwest` default
//! - [`TokenBucket`]: shared rate limiter with bounded waits
//! - [`Dispatcher`]: limiter admission, encoding, exchange and reply decoding
//! - [`CancelToken`]: cooperative cancellation for waits and in-flight calls

pub mod cancel;
pub mod dispatcher;
pub mod error;
pub mod limiter;
pub mod transport;

pub use cancel::CancelToken;
pub use dispatcher::{Admission, Dispatcher};
pub use error::{Error, Result};
pub use limiter::{RateLimit, TokenBucket};
pub use transport::{API_PATH, HttpTransport, PostRequest, Transport, USER_AGENT, api_url};
