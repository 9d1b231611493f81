use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{RegistryError, Result};
use crate::modification::{Modification, ModificationRef};

/// Tree state every node embeds.
///
/// Concrete node types hold one of these in a `core` field and implement
/// [`OmNode`] with [`om_node!`](crate::om_node). All mutation goes through
/// [`NodeRef`].
#[derive(Default)]
pub struct NodeCore {
	identifier: RefCell<Option<String>>,
	ignore: Cell<bool>,
	modifications: RefCell<Vec<ModificationRef>>,
	children: RefCell<Vec<NodeRef>>,
	parent: RefCell<Option<WeakNodeRef>>,
}

impl NodeCore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl fmt::Debug for NodeCore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeCore")
			.field("identifier", &self.identifier.borrow())
			.field("ignore", &self.ignore.get())
			.field("modifications", &self.modifications.borrow().len())
			.field("children", &self.children.borrow().len())
			.finish()
	}
}

/// Capability set of a tree element.
///
/// Implemented by [`om_node!`](crate::om_node); the only method worth
/// overriding by hand is [`OmNode::accepts_child`].
pub trait OmNode: 'static {
	/// Returns the shared tree state.
	fn core(&self) -> &NodeCore;

	/// Returns the identifier this node's type is registered under.
	///
	/// Must not change over the node's lifetime.
	fn type_identifier(&self) -> &'static str;

	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Rc<Self>) -> Rc<dyn Any>;

	/// Returns true if `child` may be hosted by this node.
	fn accepts_child(&self, child: &NodeRef) -> bool {
		let _ = child;
		true
	}
}

/// Statically known node type.
pub trait NodeKind: OmNode + Sized {
	const TYPE_IDENTIFIER: &'static str;
}

/// Shared handle to a node in a tree.
///
/// A node is owned by its parent's child list (or by whoever holds the root
/// handle). The parent link is weak, so detaching a subtree and dropping every
/// handle to it frees it.
#[derive(Clone)]
pub struct NodeRef(Rc<dyn OmNode>);

/// Non-owning handle to a node.
#[derive(Clone)]
pub struct WeakNodeRef(Weak<dyn OmNode>);

impl WeakNodeRef {
	pub fn upgrade(&self) -> Option<NodeRef> {
		self.0.upgrade().map(NodeRef)
	}
}

impl fmt::Debug for WeakNodeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakNodeRef")
			.field("alive", &(self.0.strong_count() > 0))
			.finish()
	}
}

impl NodeRef {
	/// Wraps a freshly constructed node.
	pub fn new<N: OmNode>(node: N) -> Self {
		Self(Rc::new(node))
	}

	pub fn from_rc(node: Rc<dyn OmNode>) -> Self {
		Self(node)
	}

	/// Returns the underlying trait object.
	pub fn as_node(&self) -> &dyn OmNode {
		&*self.0
	}

	fn core(&self) -> &NodeCore {
		self.0.core()
	}

	pub fn type_identifier(&self) -> &'static str {
		self.0.type_identifier()
	}

	pub fn identifier(&self) -> Option<String> {
		self.core().identifier.borrow().clone()
	}

	pub fn set_identifier(&self, identifier: Option<String>) {
		*self.core().identifier.borrow_mut() = identifier;
	}

	/// Returns true if this subtree is skipped by the next save.
	pub fn is_ignored(&self) -> bool {
		self.core().ignore.get()
	}

	pub fn set_ignore(&self, ignore: bool) {
		self.core().ignore.set(ignore);
	}

	/// Returns the attached modifications in attachment order.
	pub fn modifications(&self) -> Vec<ModificationRef> {
		self.core().modifications.borrow().clone()
	}

	/// Replaces the whole modification list.
	pub fn set_modifications(&self, modifications: Vec<ModificationRef>) {
		let previous = std::mem::replace(&mut *self.core().modifications.borrow_mut(), modifications);
		drop(previous);
	}

	pub fn push_modification(&self, modification: ModificationRef) {
		self.core().modifications.borrow_mut().push(modification);
	}

	/// Detaches the modification at `index`.
	///
	/// Its bindings go away once the returned handle (and any other) is dropped.
	pub fn remove_modification(&self, index: usize) -> Option<ModificationRef> {
		let mut modifications = self.core().modifications.borrow_mut();
		(index < modifications.len()).then(|| modifications.remove(index))
	}

	pub fn modification_count(&self) -> usize {
		self.core().modifications.borrow().len()
	}

	/// Returns true if a modification with this type identifier is attached.
	pub fn has_modification(&self, type_identifier: &str) -> bool {
		self.core()
			.modifications
			.borrow()
			.iter()
			.any(|m| m.type_identifier() == type_identifier)
	}

	/// Returns the first attached modification of type `M`.
	pub fn modification<M: Modification>(&self) -> Option<Rc<M>> {
		self.modifications()
			.into_iter()
			.find_map(|m| m.into_any().downcast::<M>().ok())
	}

	/// Returns the children in order, including ignored ones.
	pub fn children(&self) -> Vec<NodeRef> {
		self.core().children.borrow().clone()
	}

	pub fn child_count(&self) -> usize {
		self.core().children.borrow().len()
	}

	pub fn parent(&self) -> Option<NodeRef> {
		self.core().parent.borrow().as_ref().and_then(WeakNodeRef::upgrade)
	}

	/// Appends `child`, moving it out of its current tree if it has one.
	///
	/// Fails with [`RegistryError::IncompatibleChild`] when this node's type
	/// rejects the child, or when the child is this node or one of its
	/// ancestors. The tree is left unchanged on failure.
	pub fn add_child(&self, child: NodeRef) -> Result<()> {
		if child.ptr_eq(self) || child.is_ancestor_of(self) || !self.0.accepts_child(&child) {
			return Err(RegistryError::IncompatibleChild {
				parent: self.type_identifier().to_owned(),
				child: child.type_identifier().to_owned(),
			});
		}

		child.remove_from_parent();
		*child.core().parent.borrow_mut() = Some(self.downgrade());
		self.core().children.borrow_mut().push(child);
		Ok(())
	}

	/// Detaches this node from its parent. No-op for a root.
	pub fn remove_from_parent(&self) {
		let parent = self.core().parent.borrow_mut().take();
		let Some(parent) = parent.and_then(|p| p.upgrade()) else {
			return;
		};
		let removed = {
			let mut siblings = parent.core().children.borrow_mut();
			siblings
				.iter()
				.position(|c| c.ptr_eq(self))
				.map(|pos| siblings.remove(pos))
		};
		drop(removed);
	}

	/// Returns true if `self` is a strict ancestor of `other`.
	pub fn is_ancestor_of(&self, other: &NodeRef) -> bool {
		let mut current = other.parent();
		while let Some(node) = current {
			if node.ptr_eq(self) {
				return true;
			}
			current = node.parent();
		}
		false
	}

	/// Visits this node and its descendants depth-first, pre-order.
	///
	/// The callback receives each node and its depth below `self`.
	pub fn walk(&self, f: &mut impl FnMut(&NodeRef, usize)) {
		self.walk_at(0, f);
	}

	fn walk_at(&self, depth: usize, f: &mut impl FnMut(&NodeRef, usize)) {
		f(self, depth);
		for child in self.children() {
			child.walk_at(depth + 1, f);
		}
	}

	pub fn is<N: OmNode>(&self) -> bool {
		self.0.as_any().is::<N>()
	}

	pub fn downcast_ref<N: OmNode>(&self) -> Option<&N> {
		self.0.as_any().downcast_ref::<N>()
	}

	pub fn downcast<N: OmNode>(&self) -> Option<Rc<N>> {
		self.0.clone().into_any().downcast::<N>().ok()
	}

	pub fn downgrade(&self) -> WeakNodeRef {
		WeakNodeRef(Rc::downgrade(&self.0))
	}

	pub fn ptr_eq(&self, other: &NodeRef) -> bool {
		std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
	}
}

impl fmt::Debug for NodeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeRef")
			.field("type", &self.type_identifier())
			.field("identifier", &self.identifier())
			.field("ignore", &self.is_ignored())
			.field("modifications", &self.modification_count())
			.field("children", &self.child_count())
			.finish()
	}
}
