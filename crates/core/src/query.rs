//! Managed-object queries.
//!
//! Each query dispatches its request, fails on a server fault and then
//! decodes the returned opaque document into a caller-chosen type. The target
//! type describes the expected XML shape with `serde` attributes, e.g.
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Blades {
//!     #[serde(rename = "computeBlade", default)]
//!     blades: Vec<ComputeBlade>,
//! }
//!
//! let blades: Blades = client.resolve_class(ConfigResolveClass::new("computeBlade")).await?;
//! ```

use serde::de::DeserializeOwned;
use ucs_protocol::{ConfigResolveChildren, ConfigResolveClass, ConfigResolveClasses, ConfigResolveDn, ConfigResolveDns};
use ucs_runtime::Result;

use crate::client::Client;

/// Output of [`Client::resolve_dns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved<T> {
	/// Objects the server found, decoded from `outConfigs`.
	pub objects: T,
	/// Requested DNs the server did not know.
	pub unresolved: Vec<String>,
}

impl<T> Resolved<T> {
	pub fn is_complete(&self) -> bool {
		self.unresolved.is_empty()
	}
}

impl Client {
	/// Retrieves the object at one DN.
	///
	/// `T` is the object itself (e.g. a `topSystem` struct). Returns `None`
	/// when the DN does not exist.
	pub async fn resolve_dn<T: DeserializeOwned>(&self, request: ConfigResolveDn) -> Result<Option<T>> {
		let response = self.call(request).await?;
		if response.out_config.is_empty() {
			return Ok(None);
		}
		Ok(Some(response.out_config.decode_inner()?))
	}

	/// Retrieves the objects at several DNs.
	///
	/// Unknown DNs do not fail the call; they are listed in
	/// [`Resolved::unresolved`]. `T` mirrors the `outConfigs` element.
	pub async fn resolve_dns<T: DeserializeOwned>(&self, request: ConfigResolveDns) -> Result<Resolved<T>> {
		let response = self.call(request).await?;
		Ok(Resolved {
			objects: response.out_configs.decode()?,
			unresolved: response.unresolved,
		})
	}

	/// Retrieves every object of one class. `T` mirrors `outConfigs`.
	pub async fn resolve_class<T: DeserializeOwned>(&self, request: ConfigResolveClass) -> Result<T> {
		let response = self.call(request).await?;
		Ok(response.out_configs.decode()?)
	}

	/// Retrieves the objects of several classes. `T` mirrors `outConfigs`.
	pub async fn resolve_classes<T: DeserializeOwned>(&self, request: ConfigResolveClasses) -> Result<T> {
		let response = self.call(request).await?;
		Ok(response.out_configs.decode()?)
	}

	/// Retrieves the children of one class below a DN. `T` mirrors `outConfigs`.
	pub async fn resolve_children<T: DeserializeOwned>(&self, request: ConfigResolveChildren) -> Result<T> {
		let response = self.call(request).await?;
		Ok(response.out_configs.decode()?)
	}
}
