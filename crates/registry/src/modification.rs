use std::any::Any;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{RegistryError, Result};
use crate::node::{NodeKind, NodeRef};

/// Shared handle to an attached modification.
pub type ModificationRef = Rc<dyn AnyModification>;

/// Type-erased modification as seen by the registry and the serializer.
///
/// Every [`Modification`] gets this through a blanket impl; implement
/// [`Modification`] instead of this trait.
pub trait AnyModification: 'static {
	fn type_identifier(&self) -> &'static str;

	/// Encodes the modification's own fields.
	fn encode_body(&self) -> serde_json::Result<serde_json::Value>;

	/// Pulls the current state of `node` into the modification.
	fn update_from_node(&self, node: &NodeRef) -> Result<()>;

	/// Pushes the modification's state into `node`.
	fn update_node(&self, node: &NodeRef) -> Result<()>;

	/// Installs the live bindings between the modification and `node`.
	fn subscribe(&self, node: &NodeRef) -> Result<()>;

	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

/// A serializable facet of one node type.
///
/// The hooks receive the node transiently; a modification keeps no strong
/// reference to its node. Bindings installed by [`Modification::subscribe`]
/// should hold only weak node handles and store their subscriptions in the
/// modification (see [`Bindings`](omr_reactive::Bindings)).
pub trait Modification: Serialize + DeserializeOwned + 'static {
	/// Identifier the type is registered and persisted under.
	const TYPE_IDENTIFIER: &'static str;

	/// The node type this modification applies to.
	type Object: NodeKind;

	/// Pulls the current object state into the modification.
	fn update_from_object(&self, object: &Rc<Self::Object>) {
		let _ = object;
	}

	/// Pushes the modification state into the object.
	fn update_object(&self, object: &Rc<Self::Object>) {
		let _ = object;
	}

	/// Installs bindings so later edits flow between object and modification.
	fn subscribe(&self, object: &Rc<Self::Object>) {
		let _ = object;
	}
}

fn object_of<M: Modification>(node: &NodeRef) -> Result<Rc<M::Object>> {
	node.downcast::<M::Object>()
		.ok_or_else(|| RegistryError::ObjectMismatch {
			modification: M::TYPE_IDENTIFIER,
			expected: <M::Object as NodeKind>::TYPE_IDENTIFIER,
			found: node.type_identifier().to_owned(),
		})
}

impl<M: Modification> AnyModification for M {
	fn type_identifier(&self) -> &'static str {
		M::TYPE_IDENTIFIER
	}

	fn encode_body(&self) -> serde_json::Result<serde_json::Value> {
		serde_json::to_value(self)
	}

	fn update_from_node(&self, node: &NodeRef) -> Result<()> {
		self.update_from_object(&object_of::<M>(node)?);
		Ok(())
	}

	fn update_node(&self, node: &NodeRef) -> Result<()> {
		self.update_object(&object_of::<M>(node)?);
		Ok(())
	}

	fn subscribe(&self, node: &NodeRef) -> Result<()> {
		Modification::subscribe(self, &object_of::<M>(node)?);
		Ok(())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
		self
	}
}
