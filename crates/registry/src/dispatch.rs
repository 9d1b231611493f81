//! Modification dispatch.
//!
//! Every attachment runs the same sequence: construct through the registered
//! factory, pull the node's state (`update_from_node`), install bindings
//! (`subscribe`), then append to the node's modification list.

use crate::entry::ModificationTypeEntry;
use crate::error::{RegistryError, Result};
use crate::modification::ModificationRef;
use crate::node::NodeRef;
use crate::registry::TypeRegistry;

impl TypeRegistry {
	/// Attaches one instance of every applicable modification type, in
	/// registration order.
	///
	/// Stops at the first failure with [`RegistryError::AttachFailed`].
	/// Modifications attached before the failure are not rolled back, so the
	/// node should be treated as inconsistent and the failure surfaced.
	pub fn attach_applicable(&self, node: &NodeRef) -> Result<Vec<ModificationRef>> {
		let entries = self.applicable_modifications(node);
		let mut attached = Vec::with_capacity(entries.len());
		for entry in entries {
			match attach_entry(node, entry) {
				Ok(modification) => attached.push(modification),
				Err(source) => {
					tracing::warn!(
						node = node.type_identifier(),
						modification = entry.identifier(),
						attached = attached.len(),
						error = %source,
						"modification batch aborted"
					);
					return Err(RegistryError::AttachFailed {
						node: node.type_identifier().to_owned(),
						modification: entry.identifier().to_owned(),
						source: Box::new(source),
					});
				}
			}
		}
		Ok(attached)
	}

	/// Attaches one modification chosen by identifier.
	///
	/// Exclusivity is not enforced here; menus should offer
	/// [`TypeRegistry::offerable_modifications`].
	pub fn attach(&self, node: &NodeRef, identifier: &str) -> Result<ModificationRef> {
		let entry = self.lookup_modification_type(identifier)?;
		if !entry.applies_to(node) {
			return Err(RegistryError::NotApplicable {
				modification: entry.identifier().to_owned(),
				node: node.type_identifier().to_owned(),
			});
		}
		attach_entry(node, entry)
	}

	/// Constructs a node of the given type and attaches every applicable
	/// modification to it.
	pub fn create_node(&self, identifier: &str) -> Result<NodeRef> {
		let node = self.lookup_node_type(identifier)?.create()?;
		self.attach_applicable(&node)?;
		Ok(node)
	}
}

fn attach_entry(node: &NodeRef, entry: &ModificationTypeEntry) -> Result<ModificationRef> {
	let modification = entry.create()?;
	modification.update_from_node(node)?;
	modification.subscribe(node)?;
	node.push_modification(modification.clone());
	tracing::debug!(
		node = node.type_identifier(),
		modification = entry.identifier(),
		"attached modification"
	);
	Ok(modification)
}
