use std::fmt;

/// Separate identifier namespaces kept by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeNamespace {
	Node,
	Modification,
}

impl fmt::Display for TypeNamespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeNamespace::Node => write!(f, "node"),
			TypeNamespace::Modification => write!(f, "modification"),
		}
	}
}

/// Errors raised by the registry, the node tree and modification dispatch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
	/// An entry with the same identifier already exists in the namespace.
	#[error("{namespace} type already registered: {identifier:?}")]
	AlreadyRegistered {
		namespace: TypeNamespace,
		identifier: String,
	},

	/// No entry is registered under the identifier.
	#[error("unknown {namespace} type: {identifier:?}")]
	UnknownType {
		namespace: TypeNamespace,
		identifier: String,
	},

	/// The parent node cannot host the child.
	#[error("{parent} cannot host a child of type {child}")]
	IncompatibleChild { parent: String, child: String },

	/// A modification was handed a node of another concrete type.
	#[error("modification {modification} expects a {expected} node, got {found}")]
	ObjectMismatch {
		modification: &'static str,
		expected: &'static str,
		found: String,
	},

	/// A modification type was attached to a node it does not apply to.
	#[error("modification {modification} does not apply to {node}")]
	NotApplicable { modification: String, node: String },

	/// A batch attach stopped at `modification`; earlier ones stay attached.
	#[error("attaching {modification} to {node} failed: {source}")]
	AttachFailed {
		node: String,
		modification: String,
		source: Box<RegistryError>,
	},

	/// A registered factory reported failure.
	#[error("factory for {identifier} failed: {reason}")]
	Factory { identifier: String, reason: String },
}

impl RegistryError {
	/// Wraps a failure from a user-supplied factory.
	pub fn factory(identifier: impl Into<String>, reason: impl fmt::Display) -> Self {
		Self::Factory {
			identifier: identifier.into(),
			reason: reason.to_string(),
		}
	}

	pub(crate) fn unknown(namespace: TypeNamespace, identifier: &str) -> Self {
		Self::UnknownType {
			namespace,
			identifier: identifier.to_owned(),
		}
	}
}

/// Result type for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
