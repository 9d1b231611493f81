//! Node families used across the serializer tests.

use std::rc::Rc;

use omr_registry::reactive::{Bindings, ValueContainer};
use omr_registry::{
	Modification, ModificationTypeEntry, NodeCore, NodeRef, NodeTypeEntry, TypeRegistry, om_node,
};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct BoxNode {
	pub core: NodeCore,
	pub width: ValueContainer<i64>,
	pub height: ValueContainer<i64>,
}
om_node!(BoxNode, identifier = "Box");

#[derive(Default)]
pub struct Label {
	pub core: NodeCore,
	pub text: ValueContainer<String>,
}
om_node!(Label);

/// Panel whose factory adds a header label as scaffolding.
#[derive(Default)]
pub struct Panel {
	pub core: NodeCore,
}
om_node!(Panel);

/// Row hosts labels only.
#[derive(Default)]
pub struct Row {
	pub core: NodeCore,
}
om_node!(Row, accepts_child = |_, child| child.is::<Label>());

/// Never registered.
#[derive(Default)]
pub struct Scratch {
	pub core: NodeCore,
}
om_node!(Scratch);

#[derive(Default, Serialize, Deserialize)]
pub struct Size {
	pub width: ValueContainer<i64>,
	pub height: ValueContainer<i64>,
	#[serde(skip)]
	bindings: Bindings,
}

impl Modification for Size {
	const TYPE_IDENTIFIER: &'static str = "Size";
	type Object = BoxNode;

	fn update_from_object(&self, object: &Rc<BoxNode>) {
		self.width.set(object.width.get());
		self.height.set(object.height.get());
	}

	fn update_object(&self, object: &Rc<BoxNode>) {
		object.width.set(self.width.get());
		object.height.set(self.height.get());
	}

	fn subscribe(&self, object: &Rc<BoxNode>) {
		self.bindings.hold_all([
			self.width.bind_to(&object.width),
			self.height.bind_to(&object.height),
			object.width.bind_to(&self.width),
			object.height.bind_to(&self.height),
		]);
	}
}

#[derive(Default, Serialize, Deserialize)]
pub struct Caption {
	pub text: ValueContainer<String>,
	#[serde(skip)]
	bindings: Bindings,
}

impl Modification for Caption {
	const TYPE_IDENTIFIER: &'static str = "Caption";
	type Object = Label;

	fn update_from_object(&self, object: &Rc<Label>) {
		self.text.set(object.text.get());
	}

	fn update_object(&self, object: &Rc<Label>) {
		object.text.set(self.text.get());
	}

	fn subscribe(&self, object: &Rc<Label>) {
		self.bindings.hold(self.text.bind_to(&object.text));
	}
}

pub fn registry() -> TypeRegistry {
	let _ = tracing_subscriber::fmt::try_init();

	let mut registry = TypeRegistry::new();
	registry
		.register_node_types([
			NodeTypeEntry::of(BoxNode::default).with_name("Box"),
			NodeTypeEntry::of(Label::default),
			NodeTypeEntry::new("Panel", "Panel", || {
				let panel = NodeRef::new(Panel::default());
				panel.add_child(label("header"))?;
				Ok(panel)
			}),
			NodeTypeEntry::of(Row::default),
		])
		.unwrap();
	registry
		.register_modification_types([
			ModificationTypeEntry::of::<Size>(),
			ModificationTypeEntry::of::<Caption>(),
		])
		.unwrap();
	registry
}

pub fn label(text: &str) -> NodeRef {
	let label = Label::default();
	label.text.set(text.to_owned());
	NodeRef::new(label)
}

pub fn with_id(node: NodeRef, identifier: &str) -> NodeRef {
	node.set_identifier(Some(identifier.to_owned()));
	node
}

/// `Box` with an attached `Size` of `width` x `height`.
pub fn sized_box(registry: &TypeRegistry, width: i64, height: i64) -> NodeRef {
	let node = registry.create_node("Box").unwrap();
	let size = node.modification::<Size>().unwrap();
	size.width.set(width);
	size.height.set(height);
	node
}
