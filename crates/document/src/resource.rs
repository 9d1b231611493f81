//! Named resource lookup.
//!
//! A [`Resource`] is written `"container:path"`; without a prefix it lives in
//! [`DEFAULT_CONTAINER`]. A [`ResourcePool`] maps container names to
//! [`ResourceContainer`]s and reads bytes for modification bodies that
//! reference external files.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Container used when a resource carries no `name:` prefix.
pub const DEFAULT_CONTAINER: &str = "default";

/// Errors raised while resolving resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
	#[error("resource not found: {resource}")]
	NotFound { resource: Resource },

	#[error("failed to read resource {resource} from {path}: {source}")]
	Io {
		resource: Resource,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Reference to a file inside a named container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource {
	full_path: String,
}

impl Resource {
	pub fn new(full_path: impl Into<String>) -> Self {
		Self {
			full_path: full_path.into(),
		}
	}

	pub fn full_path(&self) -> &str {
		&self.full_path
	}

	/// Container name: the text before the first `:`, or [`DEFAULT_CONTAINER`].
	pub fn container(&self) -> &str {
		match self.full_path.split_once(':') {
			Some((container, _)) => container,
			None => DEFAULT_CONTAINER,
		}
	}

	/// Path inside the container: the text after the last `:`.
	pub fn path(&self) -> &str {
		match self.full_path.rsplit_once(':') {
			Some((_, path)) => path,
			None => &self.full_path,
		}
	}
}

impl fmt::Display for Resource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full_path)
	}
}

impl From<&str> for Resource {
	fn from(full_path: &str) -> Self {
		Self::new(full_path)
	}
}

impl From<String> for Resource {
	fn from(full_path: String) -> Self {
		Self::new(full_path)
	}
}

/// Source of raw resource bytes.
pub trait ResourceProvider {
	/// Filesystem location of an existing resource.
	fn locate(&self, resource: &Resource) -> Option<PathBuf>;

	/// Reads the whole resource.
	fn data(&self, resource: &Resource) -> Result<Vec<u8>, ResourceError>;
}

/// A named root that resource paths resolve against.
pub trait ResourceContainer {
	fn root(&self) -> &Path;

	/// Location `path` would have in this container; it may not exist.
	fn resolve(&self, path: &str) -> PathBuf;
}

/// Container backed by a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderContainer {
	root: PathBuf,
}

impl FolderContainer {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

impl ResourceContainer for FolderContainer {
	fn root(&self) -> &Path {
		&self.root
	}

	fn resolve(&self, path: &str) -> PathBuf {
		self.root.join(path.trim_start_matches('/'))
	}
}

/// Named resource containers, in insertion order.
#[derive(Default)]
pub struct ResourcePool {
	containers: IndexMap<String, Box<dyn ResourceContainer>>,
}

impl ResourcePool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces the container registered under `name`.
	pub fn add_container(&mut self, name: impl Into<String>, container: impl ResourceContainer + 'static) {
		let name = name.into();
		tracing::debug!(container = %name, root = %container.root().display(), "added resource container");
		self.containers.insert(name, Box::new(container));
	}

	pub fn with_container(mut self, name: impl Into<String>, container: impl ResourceContainer + 'static) -> Self {
		self.add_container(name, container);
		self
	}

	pub fn container(&self, name: &str) -> Option<&dyn ResourceContainer> {
		self.containers.get(name).map(|c| c.as_ref())
	}

	pub fn container_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.containers.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.containers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.containers.is_empty()
	}
}

impl ResourceProvider for ResourcePool {
	fn locate(&self, resource: &Resource) -> Option<PathBuf> {
		let (container, path) = (resource.container(), resource.path());
		if container.is_empty() || path.is_empty() {
			return None;
		}
		let location = self.containers.get(container)?.resolve(path);
		location.is_file().then_some(location)
	}

	fn data(&self, resource: &Resource) -> Result<Vec<u8>, ResourceError> {
		let path = self.locate(resource).ok_or_else(|| ResourceError::NotFound {
			resource: resource.clone(),
		})?;
		std::fs::read(&path).map_err(|source| ResourceError::Io {
			resource: resource.clone(),
			path,
			source,
		})
	}
}

impl fmt::Debug for ResourcePool {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map()
			.entries(self.containers.iter().map(|(name, c)| (name, c.root())))
			.finish()
	}
}
