use omr_document::{
	DEFAULT_CONTAINER, DocumentCodec, DocumentError, FolderContainer, ResourceError, ResourcePool,
};
use omr_registry::NodeRef;
use pretty_assertions::assert_eq;

use crate::common::{self, BoxNode, Scratch, sized_box, with_id};

#[test]
fn saved_file_loads_back() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("scene.json");
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	codec.save_to_path(&with_id(sized_box(&registry, 7, 8), "saved"), &path).unwrap();
	let loaded = codec.load_from_path(&path).unwrap();

	assert_eq!(loaded.identifier().as_deref(), Some("saved"));
	assert_eq!(loaded.downcast::<BoxNode>().unwrap().width.get(), 7);
}

#[test]
fn failed_save_keeps_previous_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("scene.json");
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);

	codec.save_to_path(&sized_box(&registry, 1, 1), &path).unwrap();
	let before = std::fs::read(&path).unwrap();

	let err = codec.save_to_path(&NodeRef::new(Scratch::default()), &path).unwrap_err();
	assert!(matches!(err, DocumentError::Encoding { .. }));
	assert_eq!(std::fs::read(&path).unwrap(), before);
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn save_into_missing_directory_reports_io() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing").join("scene.json");
	let registry = common::registry();

	let err = DocumentCodec::new(&registry)
		.save_to_path(&sized_box(&registry, 1, 1), &path)
		.unwrap_err();
	assert!(matches!(err, DocumentError::Io { path: ref p, .. } if *p == path));
}

#[test]
fn load_of_missing_file_reports_io() {
	let dir = tempfile::tempdir().unwrap();
	let registry = common::registry();

	let err = DocumentCodec::new(&registry)
		.load_from_path(dir.path().join("absent.json"))
		.unwrap_err();
	assert!(matches!(err, DocumentError::Io { .. }));
}

#[test]
fn templates_load_through_the_resource_pool() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::create_dir(dir.path().join("templates")).unwrap();
	let registry = common::registry();
	let codec = DocumentCodec::new(&registry);
	codec
		.save_to_path(&with_id(sized_box(&registry, 2, 3), "template"), dir.path().join("templates/box.json"))
		.unwrap();
	let pool = ResourcePool::new().with_container(DEFAULT_CONTAINER, FolderContainer::new(dir.path()));

	let node = codec
		.load_template("#sys__template#templates/box.json", &pool)
		.unwrap()
		.unwrap();
	assert_eq!(node.identifier().as_deref(), Some("template"));
	assert_eq!(node.downcast::<BoxNode>().unwrap().height.get(), 3);

	assert!(codec.load_template("Box", &pool).unwrap().is_none());
	assert!(matches!(
		codec.load_template("#sys__template#templates/none.json", &pool),
		Err(DocumentError::Resource(ResourceError::NotFound { .. }))
	));
}
