//! Tree serializer.

use std::io::Write;
use std::path::Path;

use omr_registry::{AnyModification, NodeRef, TypeRegistry};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::resource::ResourceProvider;
use crate::schema::{ModificationDocument, NodeDocument, template_resource};

/// Output options for saved documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentOptions {
	/// Pretty-print the JSON output.
	pub pretty: bool,
}

/// Converts node trees to documents and back, resolving types through a
/// borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct DocumentCodec<'r> {
	registry: &'r TypeRegistry,
	options: DocumentOptions,
}

impl<'r> DocumentCodec<'r> {
	pub fn new(registry: &'r TypeRegistry) -> Self {
		Self {
			registry,
			options: DocumentOptions::default(),
		}
	}

	pub fn with_options(mut self, options: DocumentOptions) -> Self {
		self.options = options;
		self
	}

	pub fn registry(&self) -> &'r TypeRegistry {
		self.registry
	}

	pub fn options(&self) -> DocumentOptions {
		self.options
	}

	/// Encodes `root` and its kept subtree to bytes.
	///
	/// Fails with [`DocumentError::Encoding`] when the root type itself is
	/// not registered.
	pub fn save_tree(&self, root: &NodeRef) -> Result<Vec<u8>> {
		self.encode_tree(root)?.to_vec(self.options.pretty)
	}

	/// Like [`save_tree`](Self::save_tree) but stops at the document value.
	pub fn encode_tree(&self, root: &NodeRef) -> Result<NodeDocument> {
		self.encode_node(root)?.ok_or_else(|| DocumentError::Encoding {
			type_identifier: root.type_identifier().to_owned(),
		})
	}

	/// Encodes one node, depth-first and pre-order.
	///
	/// Returns `None` when the node's type is unregistered; its whole subtree
	/// is left out. Children flagged `ignore` are skipped.
	pub fn encode_node(&self, node: &NodeRef) -> Result<Option<NodeDocument>> {
		let type_identifier = node.type_identifier();
		if !self.registry.contains_node_type(type_identifier) {
			tracing::debug!(node = type_identifier, "dropping unregistered subtree");
			return Ok(None);
		}

		let modifications = node
			.modifications()
			.iter()
			.map(|m| encode_modification(&**m))
			.collect::<Result<Vec<_>>>()?;

		let mut subnodes = Vec::new();
		for child in node.children().iter().filter(|c| !c.is_ignored()) {
			if let Some(doc) = self.encode_node(child)? {
				subnodes.push(doc);
			}
		}

		tracing::trace!(
			node = type_identifier,
			modifications = modifications.len(),
			subnodes = subnodes.len(),
			"encoded node"
		);
		Ok(Some(NodeDocument {
			type_identifier: type_identifier.to_owned(),
			identifier: node.identifier(),
			modifications,
			subnodes,
		}))
	}

	/// Parses and rebuilds a tree.
	///
	/// The whole document is parsed before any node is constructed, so
	/// structural corruption anywhere fails before factories run.
	pub fn load_tree(&self, bytes: &[u8]) -> Result<NodeRef> {
		let document = NodeDocument::from_slice(bytes)?;
		self.decode_node(document)
	}

	/// Rebuilds one node and its subtree from a parsed document.
	///
	/// Children are attached in document order before the node's
	/// modifications are decoded. Each decoded modification is appended,
	/// pushed into the node, then subscribed.
	pub fn decode_node(&self, document: NodeDocument) -> Result<NodeRef> {
		let NodeDocument {
			type_identifier,
			identifier,
			modifications,
			subnodes,
		} = document;

		let node = self.registry.lookup_node_type(&type_identifier)?.create()?;
		node.set_identifier(identifier);
		for existing in node.children() {
			existing.set_ignore(true);
		}

		for subnode in subnodes {
			let child = self.decode_node(subnode)?;
			node.add_child(child)?;
		}

		for ModificationDocument { type_identifier, body } in modifications {
			let entry = self.registry.lookup_modification_type(&type_identifier)?;
			let modification = entry.decode(body).map_err(|source| DocumentError::Body {
				modification: type_identifier.clone(),
				source,
			})?;
			node.push_modification(modification.clone());
			modification.update_node(&node)?;
			modification.subscribe(&node)?;
		}

		tracing::trace!(
			node = %type_identifier,
			modifications = node.modification_count(),
			children = node.child_count(),
			"decoded node"
		);
		Ok(node)
	}

	/// Copies a tree by encoding and decoding it.
	pub fn duplicate(&self, node: &NodeRef) -> Result<NodeRef> {
		let document = self.encode_tree(node)?;
		self.decode_node(document)
	}

	/// Saves `root` to `path`.
	///
	/// The document is fully encoded first, then written to a temporary file
	/// in the target directory and renamed over `path`. Any failure leaves an
	/// existing file untouched.
	pub fn save_to_path(&self, root: &NodeRef, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.save_tree(root)?;

		let io = |source: std::io::Error| DocumentError::Io {
			path: path.to_path_buf(),
			source,
		};
		let dir = match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io)?;
		file.write_all(&bytes).map_err(io)?;
		file.as_file().sync_all().map_err(io)?;
		file.persist(path).map_err(|e| io(e.error))?;

		tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved document");
		Ok(())
	}

	pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<NodeRef> {
		let path = path.as_ref();
		let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		self.load_tree(&bytes)
	}

	/// Loads the template document referenced by a `#sys__template#` type
	/// identifier.
	///
	/// Returns `Ok(None)` for ordinary identifiers. [`load_tree`](Self::load_tree)
	/// never calls this; template references in a document resolve only when
	/// the caller asks.
	pub fn load_template(&self, type_identifier: &str, resources: &dyn ResourceProvider) -> Result<Option<NodeRef>> {
		let Some(resource) = template_resource(type_identifier) else {
			return Ok(None);
		};
		tracing::debug!(%resource, "loading template");
		let bytes = resources.data(&resource)?;
		self.load_tree(&bytes).map(Some)
	}
}

fn encode_modification(modification: &dyn AnyModification) -> Result<ModificationDocument> {
	let type_identifier = modification.type_identifier();
	let body = modification.encode_body().map_err(|source| DocumentError::Body {
		modification: type_identifier.to_owned(),
		source,
	})?;
	Ok(ModificationDocument {
		type_identifier: type_identifier.to_owned(),
		body,
	})
}
