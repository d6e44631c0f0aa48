//! Wire types for the UCS Manager XML API.
//!
//! This crate contains the request/response envelopes, the filter language and
//! the XML codec used to talk to the `/nuova` endpoint. It performs no I/O.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond encoding and decoding
//! - **1:1 with protocol**: One request type per API method, named after its root element
//! - **Schema agnostic**: Managed objects stay opaque ([`OpaqueDocument`]) until the
//!   caller picks a type to decode them into
//!
//! Session handling and dispatch live in `ucs-runtime` and `ucs-rs`.

pub mod aaa;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod filter;

pub use aaa::*;
pub use codec::{CodecError, Document, OpaqueDocument};
pub use config::*;
pub use envelope::*;
pub use filter::*;
