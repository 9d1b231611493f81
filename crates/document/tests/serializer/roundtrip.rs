use omr_document::{DocumentCodec, DocumentError, DocumentOptions, NodeDocument};
use omr_registry::NodeRef;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{self, BoxNode, Caption, Label, Scratch, Size, label, sized_box, with_id};

const BOX_DOCUMENT: &str = r#"{"typeIdentifier":"Box","identifier":null,"modifications":[{"typeIdentifier":"Size","body":{"width":10,"height":20}}],"subnodes":[]}"#;

#[test]
fn sized_box_saves_exact_document() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	let node = sized_box(&registry, 10, 20);

	let bytes = codec.save_tree(&node).unwrap();
	assert_eq!(String::from_utf8(bytes).unwrap(), BOX_DOCUMENT);
}

#[test]
fn loading_pushes_state_and_binds() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let node = codec.load_tree(BOX_DOCUMENT.as_bytes()).unwrap();
	assert_eq!(node.type_identifier(), "Box");
	assert_eq!(node.identifier(), None);
	assert_eq!(node.modification_count(), 1);

	let size = node.modification::<Size>().unwrap();
	let object = node.downcast::<BoxNode>().unwrap();
	assert_eq!((size.width.get(), size.height.get()), (10, 20));
	assert_eq!((object.width.get(), object.height.get()), (10, 20));

	object.width.set(50);
	assert_eq!(size.width.get(), 50);
}

#[test]
fn deep_chain_round_trips() {
	const DEPTH: usize = 200;
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let root = sized_box(&registry, 0, 0);
	let mut tip = root.clone();
	for depth in 1..DEPTH {
		let next = sized_box(&registry, depth as i64, 0);
		tip.add_child(next.clone()).unwrap();
		tip = next;
	}

	let bytes = codec.save_tree(&root).unwrap();
	let loaded = codec.load_tree(&bytes).unwrap();

	let mut seen = 0;
	loaded.walk(&mut |node, depth| {
		assert_eq!(node.downcast::<BoxNode>().unwrap().width.get(), depth as i64);
		seen += 1;
	});
	assert_eq!(seen, DEPTH);
	assert_eq!(codec.save_tree(&loaded).unwrap(), bytes);
}

#[test]
fn nested_tree_round_trips() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let root = with_id(registry.create_node("Panel").unwrap(), "root");
	let row = with_id(registry.create_node("Row").unwrap(), "row");
	let caption = with_id(registry.create_node("Label").unwrap(), "b");
	caption.modification::<Caption>().unwrap().text.set("hi".into());
	row.add_child(caption).unwrap();
	root.add_child(with_id(sized_box(&registry, 1, 2), "a")).unwrap();
	root.add_child(row).unwrap();

	let first = codec.encode_tree(&root).unwrap();
	assert_eq!(
		serde_json::to_value(&first).unwrap(),
		json!({
			"typeIdentifier": "Panel",
			"identifier": "root",
			"modifications": [],
			"subnodes": [
				{
					"typeIdentifier": "Box",
					"identifier": "a",
					"modifications": [{"typeIdentifier": "Size", "body": {"width": 1, "height": 2}}],
					"subnodes": []
				},
				{
					"typeIdentifier": "Row",
					"identifier": "row",
					"modifications": [],
					"subnodes": [{
						"typeIdentifier": "Label",
						"identifier": "b",
						"modifications": [{"typeIdentifier": "Caption", "body": {"text": "hi"}}],
						"subnodes": []
					}]
				}
			]
		})
	);

	let loaded = codec.load_tree(&codec.save_tree(&root).unwrap()).unwrap();
	assert_eq!(codec.encode_tree(&loaded).unwrap(), first);

	let children = loaded.children();
	assert_eq!(children.len(), 3);
	assert!(children[0].is_ignored(), "factory header stays as ignored scaffolding");
	assert_eq!(children[1].downcast::<BoxNode>().unwrap().height.get(), 2);
	let text = children[2].children()[0].downcast::<Label>().unwrap().text.get();
	assert_eq!(text, "hi");
}

#[test]
fn ignored_children_are_excluded_at_any_depth() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let root = sized_box(&registry, 0, 0);
	let row = with_id(NodeRef::new(common::Row::default()), "row");
	let hidden = with_id(label("x"), "hidden");
	hidden.set_ignore(true);
	row.add_child(hidden).unwrap();
	row.add_child(with_id(label("y"), "kept")).unwrap();
	root.add_child(row).unwrap();
	let skipped = with_id(sized_box(&registry, 3, 3), "skipped");
	skipped.set_ignore(true);
	root.add_child(skipped).unwrap();

	let doc = codec.encode_tree(&root).unwrap();
	assert_eq!(doc.subnodes.len(), 1);
	let row_doc = &doc.subnodes[0];
	let ids: Vec<_> = row_doc.subnodes.iter().map(|n| n.identifier.as_deref()).collect();
	assert_eq!(ids, vec![Some("kept")]);
}

#[test]
fn unregistered_subtrees_are_dropped() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let root = sized_box(&registry, 0, 0);
	let scratch = NodeRef::new(Scratch::default());
	scratch.add_child(with_id(label("inner"), "inner")).unwrap();
	root.add_child(scratch).unwrap();
	root.add_child(with_id(label("after"), "after")).unwrap();

	let doc = codec.encode_tree(&root).unwrap();
	assert_eq!(doc.node_count(), 2);
	assert_eq!(doc.subnodes[0].identifier.as_deref(), Some("after"));
}

#[test]
fn unregistered_root_fails_to_save() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	let root = NodeRef::new(Scratch::default());

	assert!(codec.encode_node(&root).unwrap().is_none());
	assert!(matches!(
		codec.save_tree(&root),
		Err(DocumentError::Encoding { ref type_identifier }) if type_identifier == "Scratch"
	));
}

#[test]
fn document_subnodes_replace_factory_scaffolding() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	let document = json!({
		"typeIdentifier": "Panel",
		"identifier": "p",
		"modifications": [],
		"subnodes": [
			{"typeIdentifier": "Label", "identifier": "title", "modifications": [], "subnodes": []}
		]
	});

	let panel = codec.load_tree(&serde_json::to_vec(&document).unwrap()).unwrap();
	assert_eq!(panel.child_count(), 2);

	let saved: serde_json::Value = serde_json::from_slice(&codec.save_tree(&panel).unwrap()).unwrap();
	assert_eq!(saved, document);
}

#[test]
fn loading_does_not_auto_attach_modifications() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	let node = codec
		.load_tree(br#"{"typeIdentifier":"Box","identifier":"bare","modifications":[],"subnodes":[]}"#)
		.unwrap();
	assert_eq!(node.modification_count(), 0);
	assert_eq!(node.identifier().as_deref(), Some("bare"));
}

#[test]
fn duplicate_produces_an_independent_copy() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	let original = with_id(sized_box(&registry, 4, 5), "orig");

	let copy = codec.duplicate(&original).unwrap();
	assert!(!copy.ptr_eq(&original));
	assert_eq!(codec.encode_tree(&copy).unwrap(), codec.encode_tree(&original).unwrap());

	copy.modification::<Size>().unwrap().width.set(99);
	assert_eq!(original.downcast::<BoxNode>().unwrap().width.get(), 4);
}

#[test]
fn pretty_output_parses_to_the_same_document() {
	let registry = common::registry();
	let node = sized_box(&registry, 10, 20);
	let pretty = DocumentCodec::new(&registry).with_options(DocumentOptions { pretty: true });

	let bytes = pretty.save_tree(&node).unwrap();
	assert!(bytes.contains(&b'\n'));
	assert_eq!(
		NodeDocument::from_slice(&bytes).unwrap(),
		NodeDocument::from_slice(BOX_DOCUMENT.as_bytes()).unwrap()
	);
}
