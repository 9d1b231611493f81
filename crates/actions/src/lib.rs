//! Typed editor actions.
//!
//! An [`ActionType`] names an action and fixes its payload and completion
//! types. Views build [`Action`]s from it and hand them, type-erased, to an
//! [`ActionsHandler`], which routes each to the handler registered for its
//! identifier. [`EditorActions`] implements the built-in set against a
//! [`TypeRegistry`](omr_registry::TypeRegistry):
//!
//! | Action | Input | Completion |
//! |---|---|---|
//! | [`MAKE_NEW`] | node type identifier | the created node |
//! | [`COPY`] | node to copy | `()` |
//! | [`PASTE`] | node to paste into | the pasted node |
//! | [`SELECT`] | node to select | `()` |

mod action;
mod editor;
mod error;
mod handler;

pub use action::{Action, ActionType, AnyAction};
pub use editor::EditorActions;
pub use error::{ActionError, Result};
pub use handler::ActionsHandler;
use omr_registry::NodeRef;

/// Create a node of the given type under the selection.
pub const MAKE_NEW: ActionType<String, NodeRef> = ActionType::new("makeNew");
/// Encode a node into the clipboard.
pub const COPY: ActionType<NodeRef, ()> = ActionType::new("copy");
/// Append the clipboard's tree to a node.
pub const PASTE: ActionType<NodeRef, NodeRef> = ActionType::new("paste");
pub const SELECT: ActionType<NodeRef, ()> = ActionType::new("select");
