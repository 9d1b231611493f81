//! Document persistence for object-model trees.
//!
//! A live [`NodeRef`](omr_registry::NodeRef) tree is converted to a
//! [`NodeDocument`] and written as JSON:
//!
//! ```json
//! {
//!   "typeIdentifier": "Box",
//!   "identifier": null,
//!   "modifications": [{ "typeIdentifier": "Size", "body": { "width": 10, "height": 20 } }],
//!   "subnodes": []
//! }
//! ```
//!
//! [`DocumentCodec`] drives both directions through a borrowed
//! [`TypeRegistry`](omr_registry::TypeRegistry). Subtrees whose type is not
//! registered, and children flagged `ignore`, never reach the document.
//! Loading either returns a fully built tree or an error; no partial tree is
//! handed back.
//!
//! [`ResourcePool`] resolves `"container:path"` resources to bytes for
//! modification bodies and template documents.

mod codec;
mod error;
mod resource;
mod schema;

pub use codec::{DocumentCodec, DocumentOptions};
pub use error::{DocumentError, Result};
pub use resource::{
	DEFAULT_CONTAINER, FolderContainer, Resource, ResourceContainer, ResourceError, ResourcePool,
	ResourceProvider,
};
pub use schema::{ModificationDocument, NodeDocument, TEMPLATE_PREFIX, template_resource};
