//! Reactive value containers.
//!
//! A [`ValueContainer`] is a single mutable slot that fans every write out to
//! its listeners. It is the building block for binding modification fields to
//! node state and to live views.
//!
//! # Ownership
//!
//! The container never owns its listeners. [`ValueContainer::add_listener`]
//! returns a [`Subscription`] token and the listener lives exactly as long as
//! that token. Dropping the token frees the slot; a notification pass that
//! meets a freed slot skips it.
//!
//! # Re-entrancy
//!
//! At most one notification pass runs per container. A write issued while a
//! pass is in progress (typically a listener writing back into the container
//! it observes) is stored but does not start a nested pass.
//!
//! # Threading
//!
//! Containers are `!Send` and `!Sync`: all reads and writes happen on the
//! thread that owns the node tree.

mod bindings;
mod container;
mod subscription;

pub use bindings::Bindings;
pub use container::{ValueContainer, WeakValueContainer};
pub use subscription::{ListenerId, Subscription};
