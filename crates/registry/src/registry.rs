use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::entry::{ModificationTypeEntry, NodeTypeEntry, TypeSummary};
use crate::error::{RegistryError, Result, TypeNamespace};
use crate::node::NodeRef;

/// Catalog of node and modification types keyed by identifier.
///
/// Node and modification identifiers live in separate namespaces. Listing
/// preserves registration order.
#[derive(Debug, Default)]
pub struct TypeRegistry {
	nodes: IndexMap<String, NodeTypeEntry>,
	modifications: IndexMap<String, ModificationTypeEntry>,
}

impl TypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a node type.
	///
	/// Fails with [`RegistryError::AlreadyRegistered`] if the identifier is taken.
	pub fn register_node_type(&mut self, entry: NodeTypeEntry) -> Result<()> {
		match self.nodes.entry(entry.identifier().to_owned()) {
			Entry::Occupied(o) => Err(RegistryError::AlreadyRegistered {
				namespace: TypeNamespace::Node,
				identifier: o.key().clone(),
			}),
			Entry::Vacant(v) => {
				tracing::debug!(identifier = %v.key(), name = entry.name(), "registered node type");
				v.insert(entry);
				Ok(())
			}
		}
	}

	/// Registers a modification type.
	///
	/// Fails with [`RegistryError::AlreadyRegistered`] if the identifier is taken.
	pub fn register_modification_type(&mut self, entry: ModificationTypeEntry) -> Result<()> {
		match self.modifications.entry(entry.identifier().to_owned()) {
			Entry::Occupied(o) => Err(RegistryError::AlreadyRegistered {
				namespace: TypeNamespace::Modification,
				identifier: o.key().clone(),
			}),
			Entry::Vacant(v) => {
				tracing::debug!(
					identifier = %v.key(),
					name = entry.name(),
					exclusive = entry.is_exclusive(),
					"registered modification type"
				);
				v.insert(entry);
				Ok(())
			}
		}
	}

	/// Registers every entry, stopping at the first duplicate.
	pub fn register_node_types(&mut self, entries: impl IntoIterator<Item = NodeTypeEntry>) -> Result<()> {
		entries
			.into_iter()
			.try_for_each(|entry| self.register_node_type(entry))
	}

	/// Registers every entry, stopping at the first duplicate.
	pub fn register_modification_types(
		&mut self,
		entries: impl IntoIterator<Item = ModificationTypeEntry>,
	) -> Result<()> {
		entries
			.into_iter()
			.try_for_each(|entry| self.register_modification_type(entry))
	}

	/// Returns node types in registration order.
	pub fn node_types(&self) -> impl Iterator<Item = &NodeTypeEntry> + '_ {
		self.nodes.values()
	}

	/// Returns modification types in registration order.
	pub fn modification_types(&self) -> impl Iterator<Item = &ModificationTypeEntry> + '_ {
		self.modifications.values()
	}

	/// Returns the modification types whose predicate accepts `node`.
	pub fn applicable_modifications(&self, node: &NodeRef) -> Vec<&ModificationTypeEntry> {
		self.modifications
			.values()
			.filter(|entry| entry.applies_to(node))
			.collect()
	}

	/// Applicable types minus exclusive ones already attached to `node`.
	pub fn offerable_modifications(&self, node: &NodeRef) -> Vec<&ModificationTypeEntry> {
		self.applicable_modifications(node)
			.into_iter()
			.filter(|entry| !(entry.is_exclusive() && node.has_modification(entry.identifier())))
			.collect()
	}

	pub fn lookup_node_type(&self, identifier: &str) -> Result<&NodeTypeEntry> {
		self.nodes
			.get(identifier)
			.ok_or_else(|| RegistryError::unknown(TypeNamespace::Node, identifier))
	}

	pub fn lookup_modification_type(&self, identifier: &str) -> Result<&ModificationTypeEntry> {
		self.modifications
			.get(identifier)
			.ok_or_else(|| RegistryError::unknown(TypeNamespace::Modification, identifier))
	}

	pub fn contains_node_type(&self, identifier: &str) -> bool {
		self.nodes.contains_key(identifier)
	}

	pub fn contains_modification_type(&self, identifier: &str) -> bool {
		self.modifications.contains_key(identifier)
	}

	/// `(name, identifier)` pairs for a "create node" menu.
	pub fn creatable_types(&self) -> Vec<TypeSummary> {
		self.nodes.values().map(NodeTypeEntry::summary).collect()
	}

	/// `(name, identifier)` pairs of the modifications applicable to `node`.
	pub fn applicable_summaries(&self, node: &NodeRef) -> Vec<TypeSummary> {
		self.applicable_modifications(node)
			.into_iter()
			.map(ModificationTypeEntry::summary)
			.collect()
	}
}
