//! Runtime configuration for the object-model runtime.
//!
//! Configuration is written in TOML. Every section is optional:
//!
//! ```toml
//! [document]
//! pretty = true
//!
//! [resources]
//! default = "/home/me/project"
//!
//! [resources.containers]
//! assets = "/home/me/project/assets"
//! shared = "/opt/shared"
//! ```
//!
//! `resources.default` backs resources written without a `name:` prefix.
//! Unknown keys are rejected so typos surface at startup.

pub mod error;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
pub use error::{ConfigError, Result};
use omr_document::{DEFAULT_CONTAINER, DocumentCodec, DocumentOptions, FolderContainer, ResourcePool};
use omr_registry::TypeRegistry;
use serde::Deserialize;

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Options for saved documents.
	pub document: DocumentOptions,
	/// Resource container locations.
	pub resources: ResourcesConfig,
}

/// The `[resources]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcesConfig {
	/// Root of the default container.
	pub default: Option<PathBuf>,
	/// Named containers, in file order.
	pub containers: IndexMap<String, PathBuf>,
}

impl Config {
	/// Parse a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		tracing::debug!(
			containers = config.resources.containers.len(),
			default = config.resources.default.is_some(),
			"parsed config"
		);
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Merge another config into this one.
	///
	/// Values from `other` override values in `self`; containers are merged
	/// by name.
	pub fn merge(&mut self, other: Config) {
		self.document = other.document;
		if other.resources.default.is_some() {
			self.resources.default = other.resources.default;
		}
		self.resources.containers.extend(other.resources.containers);
	}

	/// Builds a pool with one [`FolderContainer`] per configured container.
	///
	/// `resources.default` is registered as [`DEFAULT_CONTAINER`]; a named
	/// container called `default` takes precedence over it.
	pub fn resource_pool(&self) -> ResourcePool {
		let mut pool = ResourcePool::new();
		if let Some(root) = &self.resources.default {
			pool.add_container(DEFAULT_CONTAINER, FolderContainer::new(root));
		}
		for (name, root) in &self.resources.containers {
			pool.add_container(name.as_str(), FolderContainer::new(root));
		}
		pool
	}

	/// Builds a codec over `registry` using the `[document]` options.
	pub fn codec<'r>(&self, registry: &'r TypeRegistry) -> DocumentCodec<'r> {
		DocumentCodec::new(registry).with_options(self.document)
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(input: &str) -> Result<Self> {
		Self::parse(input)
	}
}
