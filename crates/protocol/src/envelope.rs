//! Request/response envelopes shared by every API method.
//!
//! Each method is a pair: a request type implementing [`Method`], serialized
//! as a single root element named after the method, and a response type
//! implementing [`FromDocument`]. Every response root also carries the
//! [`BaseResponse`] attributes; a non-empty `errorCode` means the call failed
//! and nothing else in the response may be interpreted.

use serde::Serialize;
use thiserror::Error;

use crate::codec::{self, CodecError, Document};

/// A request that can be sent to the XML API.
pub trait Method: Serialize + Send + Sync {
	/// Root element name, shared by the request and its response.
	const NAME: &'static str;

	/// Typed output of a successful call.
	type Response: FromDocument + Send;
}

/// A request that must carry the session cookie.
pub trait Authenticated: Method {
	fn set_cookie(&mut self, cookie: String);
}

/// Builds a typed response from a parsed, error-free response document.
pub trait FromDocument: Sized {
	fn from_document(doc: Document) -> codec::Result<Self>;
}

/// Attributes present on every response root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseResponse {
	pub cookie: String,
	pub response: String,
	pub error_code: String,
	pub invocation_result: String,
	pub error_description: String,
}

impl BaseResponse {
	pub fn from_document(doc: &Document) -> Self {
		Self {
			cookie: doc.text("cookie"),
			response: doc.text("response"),
			error_code: doc.text("errorCode"),
			invocation_result: doc.text("invocationResult"),
			error_description: doc.text("errorDescr"),
		}
	}

	/// Returns true when the server reported a failure.
	pub fn is_error(&self) -> bool {
		!self.error_code.is_empty()
	}

	/// The reported failure, if any.
	pub fn fault(&self) -> Option<Fault> {
		self.is_error().then(|| Fault {
			code: self.error_code.clone(),
			invocation_result: self.invocation_result.clone(),
			description: self.error_description.clone(),
		})
	}
}

/// A failure reported by the server through its error attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}: {invocation_result} (code {code})")]
pub struct Fault {
	/// `errorCode` attribute, e.g. `"551"`.
	pub code: String,
	/// `invocationResult` attribute, e.g. `"unidentified-fail"`.
	pub invocation_result: String,
	/// `errorDescr` attribute, human readable.
	pub description: String,
}

/// Outcome of a call: the typed response or the server's fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<R> {
	Success(R),
	Fault(Fault),
}

impl<R> Reply<R> {
	pub fn into_result(self) -> Result<R, Fault> {
		match self {
			Self::Success(response) => Ok(response),
			Self::Fault(fault) => Err(fault),
		}
	}

	pub fn is_fault(&self) -> bool {
		matches!(self, Self::Fault(_))
	}
}

/// Decodes the response to method `M`.
///
/// Faults are detected before the root name is checked: the endpoint answers
/// requests it cannot parse with an `<error .../>` root carrying the same
/// error attributes.
pub fn decode_reply<M: Method>(xml: &[u8]) -> codec::Result<Reply<M::Response>> {
	let doc = Document::parse(xml)?;

	if let Some(fault) = BaseResponse::from_document(&doc).fault() {
		return Ok(Reply::Fault(fault));
	}
	if doc.name() != M::NAME {
		return Err(CodecError::Decode(format!("expected <{}> response, got <{}>", M::NAME, doc.name())));
	}

	M::Response::from_document(doc).map(Reply::Success)
}
