use std::path::PathBuf;

use omr_registry::{RegistryError, TypeNamespace};

use crate::resource::ResourceError;

/// Errors raised while saving or loading documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	/// The bytes are not a structurally valid document.
	#[error("corrupt document: {0}")]
	CorruptDocument(#[source] serde_json::Error),

	/// The document names a type the registry does not know.
	#[error("unknown {namespace} type: {identifier:?}")]
	UnknownType {
		namespace: TypeNamespace,
		identifier: String,
	},

	/// The root node's type is not registered, so there is nothing to save.
	#[error("cannot encode unregistered root type {type_identifier}")]
	Encoding { type_identifier: String },

	/// The encoded tree could not be written out as JSON.
	#[error("cannot serialize document: {0}")]
	Serialize(#[source] serde_json::Error),

	/// A modification body failed to encode or decode.
	#[error("modification {modification} body: {source}")]
	Body {
		modification: String,
		#[source]
		source: serde_json::Error,
	},

	/// Rebuilding the tree hit a registry or node-tree error.
	#[error(transparent)]
	Registry(RegistryError),

	/// Reading or writing a document file failed.
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Resource(#[from] ResourceError),
}

impl From<RegistryError> for DocumentError {
	fn from(error: RegistryError) -> Self {
		match error {
			RegistryError::UnknownType { namespace, identifier } => Self::UnknownType { namespace, identifier },
			other => Self::Registry(other),
		}
	}
}

/// Result type for document operations.
pub type Result<T, E = DocumentError> = std::result::Result<T, E>;
