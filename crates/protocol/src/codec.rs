//! XML codec for the UCS XML API.
//!
//! Requests are serialized through `quick-xml`'s serde support and then passed
//! through [`normalize_empty_elements`], which rewrites `<tag ...></tag>` pairs
//! into the self-closing `<tag .../>` form. The endpoint's parser rejects the
//! explicit pair, even though both spellings are equivalent XML.
//!
//! Responses are read into a [`Document`]: the root element's attributes plus
//! the raw bytes of every child sub-tree ([`OpaqueDocument`]). A sub-tree is
//! only decoded into a concrete type once the caller names one.

use std::str::FromStr;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while converting between Rust values and wire XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
	/// A request could not be serialized.
	#[error("cannot encode request: {0}")]
	Encode(String),

	/// A response was not well-formed or did not fit the destination type.
	#[error("cannot decode response: {0}")]
	Decode(String),
}

/// Serializes `value` to wire XML with empty elements self-closed.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
	let xml = quick_xml::se::to_string(value).map_err(|e| CodecError::Encode(e.to_string()))?;
	normalize_empty_elements(xml.as_bytes())
}

/// Like [`encode`], but an absent value produces no output at all.
pub fn encode_optional<T: Serialize>(value: Option<&T>) -> Result<Vec<u8>> {
	match value {
		Some(value) => encode(value),
		None => Ok(Vec::new()),
	}
}

/// Decodes a standalone XML fragment into `T`.
///
/// The root element's name is not checked; `T` describes its attributes and
/// children only.
pub fn decode<T: DeserializeOwned>(xml: &[u8]) -> Result<T> {
	let text = std::str::from_utf8(xml).map_err(|e| CodecError::Decode(format!("payload is not UTF-8: {e}")))?;
	quick_xml::de::from_str(text).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Rewrites every element with no content into self-closing form.
///
/// An element counts as empty when nothing but whitespace separates its start
/// and end tags. Attribute bytes, text, comments and declarations are copied
/// verbatim, so the transform is idempotent and never touches attribute values.
pub fn normalize_empty_elements(xml: &[u8]) -> Result<Vec<u8>> {
	let mut reader = Reader::from_reader(xml);
	let mut writer = Writer::new(Vec::with_capacity(xml.len()));
	let mut pending: Option<(BytesStart<'_>, Option<BytesText<'_>>)> = None;

	loop {
		let event = reader
			.read_event()
			.map_err(|e| CodecError::Encode(format!("malformed XML at byte {}: {e}", reader.buffer_position())))?;

		match event {
			Event::Eof => break,
			Event::End(end) => match pending.take() {
				Some((start, _)) => write(&mut writer, Event::Empty(start))?,
				None => write(&mut writer, Event::End(end))?,
			},
			Event::Text(text) if matches!(pending, Some((_, None))) && is_blank(&text) => {
				if let Some((_, slot)) = pending.as_mut() {
					*slot = Some(text);
				}
			}
			Event::Start(start) => {
				flush(&mut writer, pending.take())?;
				pending = Some((start, None));
			}
			other => {
				flush(&mut writer, pending.take())?;
				write(&mut writer, other)?;
			}
		}
	}

	flush(&mut writer, pending.take())?;
	Ok(writer.into_inner())
}

fn is_blank(text: &BytesText<'_>) -> bool {
	text.iter().all(u8::is_ascii_whitespace)
}

fn flush(writer: &mut Writer<Vec<u8>>, pending: Option<(BytesStart<'_>, Option<BytesText<'_>>)>) -> Result<()> {
	if let Some((start, text)) = pending {
		write(writer, Event::Start(start))?;
		if let Some(text) = text {
			write(writer, Event::Text(text))?;
		}
	}
	Ok(())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
	writer.write_event(event).map_err(|e| CodecError::Encode(e.to_string()))
}

/// A response document split into root attributes and raw child sub-trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	name: String,
	attributes: Vec<(String, String)>,
	children: Vec<OpaqueDocument>,
}

impl Document {
	/// Parses the root element of `xml`, keeping child sub-trees as raw bytes.
	pub fn parse(xml: &[u8]) -> Result<Self> {
		let text = std::str::from_utf8(xml).map_err(|e| CodecError::Decode(format!("response is not UTF-8: {e}")))?;
		let mut reader = Reader::from_str(text);

		let (root, self_closing) = loop {
			match reader.read_event().map_err(|e| malformed(&reader, e))? {
				Event::Start(start) => break (start, false),
				Event::Empty(start) => break (start, true),
				Event::Eof => return Err(CodecError::Decode("document has no root element".into())),
				_ => {}
			}
		};

		let name = utf8(root.name().as_ref())?;
		let attributes = root
			.attributes()
			.map(|attr| {
				let attr = attr.map_err(|e| CodecError::Decode(format!("bad attribute on <{name}>: {e}")))?;
				let value = attr
					.unescape_value()
					.map_err(|e| CodecError::Decode(format!("bad attribute value on <{name}>: {e}")))?;
				Ok((utf8(attr.key.as_ref())?, value.into_owned()))
			})
			.collect::<Result<Vec<_>>>()?;

		let mut children = Vec::new();
		if !self_closing {
			loop {
				match reader.read_event().map_err(|e| malformed(&reader, e))? {
					Event::Start(start) => {
						let child = start.name().as_ref().to_vec();
						let inner = reader.read_text(QName(&child)).map_err(|e| malformed(&reader, e))?;
						children.push(OpaqueDocument::new(utf8(&child)?, inner.as_bytes().to_vec()));
					}
					Event::Empty(start) => children.push(OpaqueDocument::new(utf8(start.name().as_ref())?, Vec::new())),
					Event::End(_) => break,
					Event::Eof => return Err(CodecError::Decode(format!("document ended inside <{name}>"))),
					_ => {}
				}
			}
		}

		Ok(Self {
			name,
			attributes,
			children,
		})
	}

	/// Root element name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the unescaped value of a root attribute.
	pub fn attr(&self, key: &str) -> Option<&str> {
		self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Returns a root attribute, or an empty string when it is absent.
	pub fn text(&self, key: &str) -> String {
		self.attr(key).unwrap_or_default().to_string()
	}

	/// Parses a root attribute; absent and empty attributes yield `None`.
	pub fn parse_attr<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		match self.attr(key) {
			None | Some("") => Ok(None),
			Some(raw) => raw
				.parse()
				.map(Some)
				.map_err(|e| CodecError::Decode(format!("attribute {key}=\"{raw}\" on <{}>: {e}", self.name))),
		}
	}

	/// Returns the first child sub-tree named `name`.
	pub fn child(&self, name: &str) -> Option<&OpaqueDocument> {
		self.children.iter().find(|c| c.name == name)
	}

	/// Removes and returns the first child named `name`, or an empty one.
	pub fn take_child(&mut self, name: &str) -> OpaqueDocument {
		match self.children.iter().position(|c| c.name == name) {
			Some(idx) => self.children.remove(idx),
			None => OpaqueDocument::new(name, Vec::new()),
		}
	}

	/// All child sub-trees in document order.
	pub fn children(&self) -> &[OpaqueDocument] {
		&self.children
	}
}

fn malformed(reader: &Reader<&[u8]>, err: quick_xml::Error) -> CodecError {
	CodecError::Decode(format!("malformed XML at byte {}: {err}", reader.buffer_position()))
}

fn utf8(bytes: &[u8]) -> Result<String> {
	std::str::from_utf8(bytes)
		.map(str::to_string)
		.map_err(|e| CodecError::Decode(format!("element name is not UTF-8: {e}")))
}

/// An XML sub-tree whose element name is known but whose structure is not.
///
/// The content bytes are kept exactly as received. [`to_xml`](Self::to_xml)
/// re-wraps them in the element's tag so they can be decoded on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaqueDocument {
	name: String,
	inner: Vec<u8>,
}

impl OpaqueDocument {
	pub fn new(name: impl Into<String>, inner: Vec<u8>) -> Self {
		Self {
			name: name.into(),
			inner,
		}
	}

	/// Element name of the sub-tree.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Raw bytes between the start and end tags.
	pub fn inner(&self) -> &[u8] {
		&self.inner
	}

	/// Returns true when the element has no content besides whitespace.
	pub fn is_empty(&self) -> bool {
		self.inner.iter().all(u8::is_ascii_whitespace)
	}

	/// Re-serializes the sub-tree: tag name plus verbatim content.
	pub fn to_xml(&self) -> Vec<u8> {
		if self.is_empty() {
			return format!("<{}/>", self.name).into_bytes();
		}
		let mut out = Vec::with_capacity(self.inner.len() + 2 * self.name.len() + 5);
		out.push(b'<');
		out.extend_from_slice(self.name.as_bytes());
		out.push(b'>');
		out.extend_from_slice(&self.inner);
		out.extend_from_slice(b"</");
		out.extend_from_slice(self.name.as_bytes());
		out.push(b'>');
		out
	}

	/// Decodes the re-wrapped sub-tree into `T`.
	pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
		decode(&self.to_xml())
	}

	/// Decodes the content alone into `T`; used when the sub-tree holds a single element.
	pub fn decode_inner<T: DeserializeOwned>(&self) -> Result<T> {
		decode(&self.inner)
	}
}
