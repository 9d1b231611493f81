//! Object-model type registry.
//!
//! This crate holds the runtime half of the object model:
//!
//! - [`OmNode`] / [`NodeRef`]: the capability set every tree element exposes
//! - [`Modification`] / [`AnyModification`]: serializable facets attached to nodes
//! - [`TypeRegistry`]: identifier → factory/decoder/predicate catalog
//! - modification dispatch: [`TypeRegistry::attach_applicable`],
//!   [`TypeRegistry::attach`], [`TypeRegistry::create_node`]
//!
//! # Registering types
//!
//! ```ignore
//! let mut registry = TypeRegistry::new();
//! registry.register_node_type(NodeTypeEntry::of(Frame::default))?;
//! registry.register_modification_type(ModificationTypeEntry::of::<FrameSize>())?;
//! let frame = registry.create_node("Frame")?;
//! ```
//!
//! The registry is built once at startup and passed by reference to whatever
//! needs type resolution. It is not `Sync`; all access happens on the thread
//! that owns the node trees.

mod dispatch;
mod entry;
mod error;
mod modification;
mod node;
mod registry;

pub use entry::{ModificationTypeEntry, NodeTypeEntry, TypeSummary};
pub use error::{RegistryError, Result, TypeNamespace};
pub use modification::{AnyModification, Modification, ModificationRef};
pub use node::{NodeCore, NodeKind, NodeRef, OmNode, WeakNodeRef};
pub use omr_reactive as reactive;
pub use registry::TypeRegistry;

/// Selects a provided value or falls back to a default.
#[doc(hidden)]
#[macro_export]
macro_rules! __om_opt {
	({$val:expr}, $default:expr) => {
		$val
	};
	(, $default:expr) => {
		$default
	};
}

/// Implements [`OmNode`] and [`NodeKind`] for a struct with a `core: NodeCore` field.
///
/// The type identifier defaults to the type name. A custom identifier and a
/// child-compatibility predicate can be supplied:
///
/// ```ignore
/// om_node!(Frame);
/// om_node!(Label, identifier = "ui.Label");
/// om_node!(Stack, accepts_child = |_, child| child.is::<Label>());
/// ```
#[macro_export]
macro_rules! om_node {
	($type:ty $(, identifier = $id:expr)? $(, accepts_child = $accepts:expr)? $(,)?) => {
		impl $crate::NodeKind for $type {
			const TYPE_IDENTIFIER: &'static str = $crate::__om_opt!($({$id})?, stringify!($type));
		}

		impl $crate::OmNode for $type {
			fn core(&self) -> &$crate::NodeCore {
				&self.core
			}

			fn type_identifier(&self) -> &'static str {
				<$type as $crate::NodeKind>::TYPE_IDENTIFIER
			}

			fn as_any(&self) -> &dyn ::std::any::Any {
				self
			}

			fn into_any(self: ::std::rc::Rc<Self>) -> ::std::rc::Rc<dyn ::std::any::Any> {
				self
			}

			$(
				fn accepts_child(&self, child: &$crate::NodeRef) -> bool {
					let accepts: fn(&Self, &$crate::NodeRef) -> bool = $accepts;
					accepts(self, child)
				}
			)?
		}
	};
}
