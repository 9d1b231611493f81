//! Wire schema of persisted trees.

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::resource::Resource;

/// Type-identifier prefix marking a reference to a template resource.
pub const TEMPLATE_PREFIX: &str = "#sys__template#";

/// One node of a persisted tree.
///
/// `modifications` and `subnodes` are required on read; a document that
/// omits either is corrupt, not empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
	pub type_identifier: String,
	pub identifier: Option<String>,
	pub modifications: Vec<ModificationDocument>,
	pub subnodes: Vec<NodeDocument>,
}

/// One attached modification: its type and its own encoded fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationDocument {
	pub type_identifier: String,
	pub body: serde_json::Value,
}

impl NodeDocument {
	/// Parses a document from JSON bytes.
	///
	/// Nesting depth is unbounded so any tree that saves also loads; the
	/// stack grows on demand while parsing deep documents.
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		let mut json = serde_json::Deserializer::from_slice(bytes);
		json.disable_recursion_limit();
		let document = Self::deserialize(serde_stacker::Deserializer::new(&mut json))
			.map_err(DocumentError::CorruptDocument)?;
		json.end().map_err(DocumentError::CorruptDocument)?;
		Ok(document)
	}

	/// Serializes the document to JSON bytes.
	pub fn to_vec(&self, pretty: bool) -> Result<Vec<u8>> {
		let encoded = if pretty {
			serde_json::to_vec_pretty(self)
		} else {
			serde_json::to_vec(self)
		};
		encoded.map_err(DocumentError::Serialize)
	}

	/// Number of nodes in this document, including itself.
	pub fn node_count(&self) -> usize {
		1 + self.subnodes.iter().map(NodeDocument::node_count).sum::<usize>()
	}
}

/// Returns the template resource named by `type_identifier`, if it carries
/// the [`TEMPLATE_PREFIX`].
pub fn template_resource(type_identifier: &str) -> Option<Resource> {
	type_identifier.strip_prefix(TEMPLATE_PREFIX).map(Resource::new)
}
