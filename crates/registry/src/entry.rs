use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::error::{RegistryError, Result};
use crate::modification::{Modification, ModificationRef};
use crate::node::{NodeKind, NodeRef};

type NodeFactory = Box<dyn Fn() -> Result<NodeRef>>;
type ModificationFactory = Box<dyn Fn() -> Result<ModificationRef>>;
type ModificationDecoder = Box<dyn Fn(serde_json::Value) -> serde_json::Result<ModificationRef>>;
type AppliesTo = Box<dyn Fn(&NodeRef) -> bool>;

/// Display name and identifier pair offered to menus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeSummary {
	pub name: String,
	pub identifier: String,
}

/// Registration record for a node type.
pub struct NodeTypeEntry {
	name: String,
	identifier: String,
	factory: NodeFactory,
}

impl NodeTypeEntry {
	/// Creates an entry from a factory producing a whole node handle.
	///
	/// Use this form when the factory builds scaffolding children. The
	/// produced nodes must report `identifier` as their type identifier to
	/// be serializable.
	pub fn new(
		name: impl Into<String>,
		identifier: impl Into<String>,
		factory: impl Fn() -> Result<NodeRef> + 'static,
	) -> Self {
		Self {
			name: name.into(),
			identifier: identifier.into(),
			factory: Box::new(factory),
		}
	}

	/// Creates an entry for `N`, named and keyed by its type identifier.
	pub fn of<N: NodeKind>(factory: impl Fn() -> N + 'static) -> Self {
		Self::new(N::TYPE_IDENTIFIER, N::TYPE_IDENTIFIER, move || {
			Ok(NodeRef::new(factory()))
		})
	}

	/// Overrides the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Constructs a fresh node.
	///
	/// Children the factory created are scaffolding, not document content,
	/// so they come back marked ignored. A node reporting a type identifier
	/// other than this entry's is rejected, since it could never be saved.
	pub fn create(&self) -> Result<NodeRef> {
		let node = (self.factory)()?;
		if node.type_identifier() != self.identifier {
			return Err(RegistryError::factory(
				&self.identifier,
				format_args!("produced a node of type {}", node.type_identifier()),
			));
		}
		for child in node.children() {
			child.set_ignore(true);
		}
		Ok(node)
	}

	pub fn summary(&self) -> TypeSummary {
		TypeSummary {
			name: self.name.clone(),
			identifier: self.identifier.clone(),
		}
	}
}

impl fmt::Debug for NodeTypeEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeTypeEntry")
			.field("name", &self.name)
			.field("identifier", &self.identifier)
			.finish_non_exhaustive()
	}
}

/// Registration record for a modification type.
pub struct ModificationTypeEntry {
	name: String,
	identifier: String,
	exclusive: bool,
	factory: ModificationFactory,
	decoder: ModificationDecoder,
	applies_to: AppliesTo,
}

impl ModificationTypeEntry {
	/// Creates an entry from raw parts. The entry is exclusive by default.
	pub fn new(
		name: impl Into<String>,
		identifier: impl Into<String>,
		factory: impl Fn() -> Result<ModificationRef> + 'static,
		decoder: impl Fn(serde_json::Value) -> serde_json::Result<ModificationRef> + 'static,
		applies_to: impl Fn(&NodeRef) -> bool + 'static,
	) -> Self {
		Self {
			name: name.into(),
			identifier: identifier.into(),
			exclusive: true,
			factory: Box::new(factory),
			decoder: Box::new(decoder),
			applies_to: Box::new(applies_to),
		}
	}

	/// Creates an entry for `M` built from `M::default()`.
	pub fn of<M: Modification + Default>() -> Self {
		Self::of_with(M::default)
	}

	/// Creates an entry for `M` built by `factory`.
	///
	/// The entry applies exactly to nodes whose concrete type is `M::Object`.
	pub fn of_with<M: Modification>(factory: impl Fn() -> M + 'static) -> Self {
		Self::new(
			M::TYPE_IDENTIFIER,
			M::TYPE_IDENTIFIER,
			move || Ok(Rc::new(factory()) as ModificationRef),
			|body| serde_json::from_value::<M>(body).map(|m| Rc::new(m) as ModificationRef),
			|node| node.is::<M::Object>(),
		)
	}

	/// Overrides the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	/// Sets whether at most one instance should be attached per node.
	///
	/// Informational; the registry offers exclusive types only once but does
	/// not refuse explicit attachment.
	pub fn exclusive(mut self, exclusive: bool) -> Self {
		self.exclusive = exclusive;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	pub fn is_exclusive(&self) -> bool {
		self.exclusive
	}

	/// Constructs a modification with default state.
	pub fn create(&self) -> Result<ModificationRef> {
		(self.factory)()
	}

	/// Rebuilds a modification from its encoded body.
	pub fn decode(&self, body: serde_json::Value) -> serde_json::Result<ModificationRef> {
		(self.decoder)(body)
	}

	/// Returns true if this modification type may be attached to `node`.
	pub fn applies_to(&self, node: &NodeRef) -> bool {
		(self.applies_to)(node)
	}

	pub fn summary(&self) -> TypeSummary {
		TypeSummary {
			name: self.name.clone(),
			identifier: self.identifier.clone(),
		}
	}
}

impl fmt::Debug for ModificationTypeEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModificationTypeEntry")
			.field("name", &self.name)
			.field("identifier", &self.identifier)
			.field("exclusive", &self.exclusive)
			.finish_non_exhaustive()
	}
}
