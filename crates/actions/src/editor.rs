use std::cell::RefCell;
use std::rc::{Rc, Weak};

use omr_document::{DocumentCodec, DocumentOptions};
use omr_reactive::ValueContainer;
use omr_registry::{NodeRef, TypeRegistry, WeakNodeRef};

use crate::error::{ActionError, Result};
use crate::handler::ActionsHandler;
use crate::{COPY, MAKE_NEW, PASTE, SELECT};

/// Editing state the built-in actions operate on: the open tree, the
/// current selection and a clipboard of encoded documents.
pub struct EditorActions {
	registry: Rc<TypeRegistry>,
	options: DocumentOptions,
	root: RefCell<Option<NodeRef>>,
	selection: ValueContainer<Option<WeakNodeRef>>,
	clipboard: RefCell<Option<Vec<u8>>>,
}

impl EditorActions {
	pub fn new(registry: Rc<TypeRegistry>) -> Self {
		Self {
			registry,
			options: DocumentOptions::default(),
			root: RefCell::new(None),
			selection: ValueContainer::default(),
			clipboard: RefCell::new(None),
		}
	}

	pub fn with_options(mut self, options: DocumentOptions) -> Self {
		self.options = options;
		self
	}

	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	fn codec(&self) -> DocumentCodec<'_> {
		DocumentCodec::new(&self.registry).with_options(self.options)
	}

	/// Makes `root` the edited tree and clears the selection.
	pub fn open(&self, root: NodeRef) {
		*self.root.borrow_mut() = Some(root);
		self.selection.set(None);
	}

	/// Closes the edited tree, returning it.
	pub fn close(&self) -> Option<NodeRef> {
		self.selection.set(None);
		self.root.take()
	}

	pub fn root(&self) -> Option<NodeRef> {
		self.root.borrow().clone()
	}

	/// Observable selection; views subscribe to it.
	///
	/// The selection does not keep its node alive. A node dropped from the
	/// tree reads as unselected.
	pub fn selection(&self) -> &ValueContainer<Option<WeakNodeRef>> {
		&self.selection
	}

	pub fn selected(&self) -> Option<NodeRef> {
		self.selection.with(|node| node.as_ref().and_then(WeakNodeRef::upgrade))
	}

	pub fn select(&self, node: Option<&NodeRef>) {
		self.selection.set(node.map(NodeRef::downgrade));
	}

	/// Creates a node of type `identifier` under the selection, or under the
	/// root when nothing is selected, then attaches every applicable
	/// modification.
	pub fn make_new(&self, identifier: &str) -> Result<NodeRef> {
		let parent = self
			.selected()
			.or_else(|| self.root())
			.ok_or(ActionError::NoTarget)?;
		let node = self.registry.lookup_node_type(identifier)?.create()?;
		parent.add_child(node.clone())?;
		self.registry.attach_applicable(&node)?;
		tracing::debug!(node = identifier, parent = parent.type_identifier(), "created node");
		Ok(node)
	}

	/// Encodes `node` into the clipboard.
	pub fn copy(&self, node: &NodeRef) -> Result<()> {
		let bytes = self.codec().save_tree(node)?;
		tracing::debug!(node = node.type_identifier(), bytes = bytes.len(), "copied node");
		*self.clipboard.borrow_mut() = Some(bytes);
		Ok(())
	}

	/// Decodes the clipboard into a fresh subtree appended to `target`.
	pub fn paste(&self, target: &NodeRef) -> Result<NodeRef> {
		let bytes = self.clipboard.borrow().clone().ok_or(ActionError::EmptyClipboard)?;
		let node = self.codec().load_tree(&bytes)?;
		target.add_child(node.clone())?;
		Ok(node)
	}

	pub fn clipboard(&self) -> Option<Vec<u8>> {
		self.clipboard.borrow().clone()
	}

	/// Builds a handler routing the built-in actions to this editor.
	///
	/// The handler holds the editor weakly; once the editor is dropped every
	/// action fails with [`ActionError::Detached`].
	pub fn handler(self: &Rc<Self>) -> ActionsHandler {
		let editor = Rc::downgrade(self);
		let mut handler = ActionsHandler::new();

		handler.register(MAKE_NEW, {
			let editor = editor.clone();
			move |action| {
				let node = upgrade(&editor)?.make_new(&action.input)?;
				action.complete(node);
				Ok(())
			}
		});
		handler.register(COPY, {
			let editor = editor.clone();
			move |action| {
				upgrade(&editor)?.copy(&action.input)?;
				action.complete(());
				Ok(())
			}
		});
		handler.register(PASTE, {
			let editor = editor.clone();
			move |action| {
				let node = upgrade(&editor)?.paste(&action.input)?;
				action.complete(node);
				Ok(())
			}
		});
		handler.register(SELECT, move |action| {
			upgrade(&editor)?.select(Some(&action.input));
			action.complete(());
			Ok(())
		});
		handler
	}
}

fn upgrade(editor: &Weak<EditorActions>) -> Result<Rc<EditorActions>> {
	editor.upgrade().ok_or(ActionError::Detached)
}
