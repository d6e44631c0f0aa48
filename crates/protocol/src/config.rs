//! Query methods: `configResolveDn`, `configResolveDns`, `configResolveClass`,
//! `configResolveClasses` and `configResolveChildren`.
//!
//! Requests are built without a cookie; the client stamps it just before
//! dispatch through [`Authenticated::set_cookie`]. Responses keep the returned
//! managed objects as [`OpaqueDocument`]s for the caller to decode.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Document, OpaqueDocument};
use crate::envelope::{Authenticated, FromDocument, Method};
use crate::filter::{Filter, InFilter};

/// A managed-object distinguished name, as listed inside `inDns`/`outUnresolved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dn {
	#[serde(rename = "@value")]
	pub value: String,
}

impl Dn {
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: value.into() }
	}
}

/// A class identifier, as listed inside `inIds`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassId {
	#[serde(rename = "@value")]
	pub value: String,
}

impl ClassId {
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: value.into() }
	}
}

/// `<inDns>` / `<outUnresolved>`: a list of `<dn value="..."/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnSet {
	#[serde(rename = "dn", default)]
	pub dns: Vec<Dn>,
}

/// `<inIds>`: a list of `<Id value="..."/>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassIdSet {
	#[serde(rename = "Id", default)]
	pub ids: Vec<ClassId>,
}

/// Retrieves the single managed object at a DN.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "configResolveDn")]
pub struct ConfigResolveDn {
	#[serde(rename = "@cookie")]
	cookie: String,
	#[serde(rename = "@dn")]
	pub dn: String,
	#[serde(rename = "@inHierarchical")]
	pub hierarchical: bool,
	#[serde(rename = "inFilter", skip_serializing_if = "Option::is_none")]
	pub filter: Option<InFilter>,
}

impl ConfigResolveDn {
	pub fn new(dn: impl Into<String>) -> Self {
		Self {
			dn: dn.into(),
			..Self::default()
		}
	}

	/// Includes descendant objects inline.
	pub fn hierarchical(mut self, hierarchical: bool) -> Self {
		self.hierarchical = hierarchical;
		self
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter.into());
		self
	}
}

/// Retrieves the managed objects at several DNs in one round trip.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "configResolveDns")]
pub struct ConfigResolveDns {
	#[serde(rename = "@cookie")]
	cookie: String,
	#[serde(rename = "@inHierarchical")]
	pub hierarchical: bool,
	#[serde(rename = "inDns")]
	pub dns: DnSet,
	#[serde(rename = "inFilter", skip_serializing_if = "Option::is_none")]
	pub filter: Option<InFilter>,
}

impl ConfigResolveDns {
	pub fn new<I, S>(dns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			dns: DnSet {
				dns: dns.into_iter().map(Dn::new).collect(),
			},
			..Self::default()
		}
	}

	pub fn hierarchical(mut self, hierarchical: bool) -> Self {
		self.hierarchical = hierarchical;
		self
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter.into());
		self
	}
}

/// Retrieves every managed object of one class.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "configResolveClass")]
pub struct ConfigResolveClass {
	#[serde(rename = "@cookie")]
	cookie: String,
	#[serde(rename = "@classId")]
	pub class_id: String,
	#[serde(rename = "@inHierarchical")]
	pub hierarchical: bool,
	#[serde(rename = "inFilter", skip_serializing_if = "Option::is_none")]
	pub filter: Option<InFilter>,
}

impl ConfigResolveClass {
	pub fn new(class_id: impl Into<String>) -> Self {
		Self {
			class_id: class_id.into(),
			..Self::default()
		}
	}

	pub fn hierarchical(mut self, hierarchical: bool) -> Self {
		self.hierarchical = hierarchical;
		self
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter.into());
		self
	}
}

/// Retrieves the managed objects of several classes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "configResolveClasses")]
pub struct ConfigResolveClasses {
	#[serde(rename = "@cookie")]
	cookie: String,
	#[serde(rename = "@inHierarchical")]
	pub hierarchical: bool,
	#[serde(rename = "inIds")]
	pub class_ids: ClassIdSet,
	#[serde(rename = "inFilter", skip_serializing_if = "Option::is_none")]
	pub filter: Option<InFilter>,
}

impl ConfigResolveClasses {
	pub fn new<I, S>(class_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			class_ids: ClassIdSet {
				ids: class_ids.into_iter().map(ClassId::new).collect(),
			},
			..Self::default()
		}
	}

	pub fn hierarchical(mut self, hierarchical: bool) -> Self {
		self.hierarchical = hierarchical;
		self
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter.into());
		self
	}
}

/// Retrieves the children of class `class_id` below a parent DN.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename = "configResolveChildren")]
pub struct ConfigResolveChildren {
	#[serde(rename = "@cookie")]
	cookie: String,
	#[serde(rename = "@classId")]
	pub class_id: String,
	#[serde(rename = "@inDn")]
	pub parent_dn: String,
	#[serde(rename = "@inHierarchical")]
	pub hierarchical: bool,
	#[serde(rename = "inFilter", skip_serializing_if = "Option::is_none")]
	pub filter: Option<InFilter>,
}

impl ConfigResolveChildren {
	pub fn new(parent_dn: impl Into<String>, class_id: impl Into<String>) -> Self {
		Self {
			parent_dn: parent_dn.into(),
			class_id: class_id.into(),
			..Self::default()
		}
	}

	pub fn hierarchical(mut self, hierarchical: bool) -> Self {
		self.hierarchical = hierarchical;
		self
	}

	pub fn filter(mut self, filter: Filter) -> Self {
		self.filter = Some(filter.into());
		self
	}
}

macro_rules! authenticated {
	($($ty:ty => $name:literal, $resp:ty;)*) => {$(
		impl Method for $ty {
			const NAME: &'static str = $name;
			type Response = $resp;
		}

		impl Authenticated for $ty {
			fn set_cookie(&mut self, cookie: String) {
				self.cookie = cookie;
			}
		}
	)*};
}

authenticated! {
	ConfigResolveDn => "configResolveDn", ResolveDnResponse;
	ConfigResolveDns => "configResolveDns", ResolveDnsResponse;
	ConfigResolveClass => "configResolveClass", ConfigsResponse;
	ConfigResolveClasses => "configResolveClasses", ConfigsResponse;
	ConfigResolveChildren => "configResolveChildren", ConfigsResponse;
}

/// Output of `configResolveDn`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveDnResponse {
	/// DN echoed by the server.
	pub dn: String,
	/// `outConfig`: the resolved object, empty when the DN does not exist.
	pub out_config: OpaqueDocument,
}

impl FromDocument for ResolveDnResponse {
	fn from_document(mut doc: Document) -> codec::Result<Self> {
		Ok(Self {
			dn: doc.text("dn"),
			out_config: doc.take_child("outConfig"),
		})
	}
}

/// Output of `configResolveDns`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveDnsResponse {
	/// DNs the server could not resolve, in the order it listed them.
	pub unresolved: Vec<String>,
	/// `outConfigs`: the objects that were resolved.
	pub out_configs: OpaqueDocument,
}

impl FromDocument for ResolveDnsResponse {
	fn from_document(mut doc: Document) -> codec::Result<Self> {
		let unresolved: DnSet = doc.take_child("outUnresolved").decode()?;
		Ok(Self {
			unresolved: unresolved.dns.into_iter().map(|dn| dn.value).collect(),
			out_configs: doc.take_child("outConfigs"),
		})
	}
}

/// Output of the class and children queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigsResponse {
	/// `outConfigs`: every matching object.
	pub out_configs: OpaqueDocument,
}

impl FromDocument for ConfigsResponse {
	fn from_document(mut doc: Document) -> codec::Result<Self> {
		Ok(Self {
			out_configs: doc.take_child("outConfigs"),
		})
	}
}
