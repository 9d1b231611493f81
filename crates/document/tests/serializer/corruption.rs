use omr_document::{DocumentCodec, DocumentError};
use omr_registry::{RegistryError, TypeNamespace};
use rstest::rstest;
use serde_json::{Value, json};

use crate::common;

fn load(document: &Value) -> Result<omr_registry::NodeRef, DocumentError> {
	let registry = common::registry();
	DocumentCodec::new(&registry).load_tree(&serde_json::to_vec(document).unwrap())
}

#[rstest]
#[case::missing_subnodes(json!({"typeIdentifier": "Box", "identifier": null, "modifications": []}))]
#[case::missing_modifications(json!({"typeIdentifier": "Box", "identifier": null, "subnodes": []}))]
#[case::subnodes_not_a_list(json!({"typeIdentifier": "Box", "modifications": [], "subnodes": {}}))]
#[case::nested_missing_subnodes(json!({
	"typeIdentifier": "Box",
	"identifier": null,
	"modifications": [],
	"subnodes": [{"typeIdentifier": "Label", "identifier": null, "modifications": []}]
}))]
#[case::modification_without_body(json!({
	"typeIdentifier": "Box",
	"identifier": null,
	"modifications": [{"typeIdentifier": "Size"}],
	"subnodes": []
}))]
#[case::root_not_an_object(json!([1, 2, 3]))]
fn malformed_documents_are_corrupt(#[case] document: Value) {
	assert!(matches!(load(&document), Err(DocumentError::CorruptDocument(_))));
}

#[test]
fn invalid_json_is_corrupt() {
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	assert!(matches!(
		codec.load_tree(b"{\"typeIdentifier\":"),
		Err(DocumentError::CorruptDocument(_))
	));
}

#[test]
fn unknown_node_type_fails() {
	let err = load(&json!({
		"typeIdentifier": "Box",
		"identifier": null,
		"modifications": [],
		"subnodes": [{"typeIdentifier": "Scratch", "identifier": null, "modifications": [], "subnodes": []}]
	}))
	.unwrap_err();

	assert!(matches!(
		err,
		DocumentError::UnknownType { namespace: TypeNamespace::Node, ref identifier } if identifier == "Scratch"
	));
}

#[test]
fn unknown_modification_type_fails() {
	let err = load(&json!({
		"typeIdentifier": "Box",
		"identifier": null,
		"modifications": [{"typeIdentifier": "Color", "body": {}}],
		"subnodes": []
	}))
	.unwrap_err();

	assert!(matches!(
		err,
		DocumentError::UnknownType { namespace: TypeNamespace::Modification, .. }
	));
}

#[test]
fn template_identifiers_are_not_resolved_by_default_load() {
	let err = load(&json!({
		"typeIdentifier": "#sys__template#ui/box.json",
		"identifier": null,
		"modifications": [],
		"subnodes": []
	}))
	.unwrap_err();

	assert!(matches!(err, DocumentError::UnknownType { .. }));
}

#[test]
fn mistyped_body_reports_the_modification() {
	let err = load(&json!({
		"typeIdentifier": "Box",
		"identifier": null,
		"modifications": [{"typeIdentifier": "Size", "body": {"width": "wide", "height": 1}}],
		"subnodes": []
	}))
	.unwrap_err();

	assert!(matches!(err, DocumentError::Body { ref modification, .. } if modification == "Size"));
}

#[test]
fn incompatible_child_in_document_fails() {
	let err = load(&json!({
		"typeIdentifier": "Row",
		"identifier": null,
		"modifications": [],
		"subnodes": [{"typeIdentifier": "Box", "identifier": null, "modifications": [], "subnodes": []}]
	}))
	.unwrap_err();

	assert!(matches!(
		err,
		DocumentError::Registry(RegistryError::IncompatibleChild { ref parent, ref child })
			if parent == "Row" && child == "Box"
	));
}

#[test]
fn modification_for_another_node_type_fails() {
	let err = load(&json!({
		"typeIdentifier": "Label",
		"identifier": null,
		"modifications": [{"typeIdentifier": "Size", "body": {"width": 1, "height": 1}}],
		"subnodes": []
	}))
	.unwrap_err();

	assert!(matches!(
		err,
		DocumentError::Registry(RegistryError::ObjectMismatch { modification: "Size", .. })
	));
}
