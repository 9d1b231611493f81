use omr_document::DocumentError;
use omr_registry::RegistryError;

/// Errors raised while routing or performing editor actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
	/// The action's identifier is routed to a handler for another payload type.
	#[error("action {identifier} is not a {expected}")]
	Mismatch {
		identifier: String,
		expected: &'static str,
	},

	#[error("clipboard is empty")]
	EmptyClipboard,

	/// Neither a selection nor an open root to insert into.
	#[error("no node to insert into")]
	NoTarget,

	/// The editor behind a handler was dropped.
	#[error("editor actions are no longer alive")]
	Detached,

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Document(#[from] DocumentError),
}

pub type Result<T, E = ActionError> = std::result::Result<T, E>;
