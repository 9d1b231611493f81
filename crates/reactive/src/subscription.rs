use std::fmt;
use std::rc::Weak;

/// Slot handle of one listener inside a single container.
///
/// Ids are never reused by the container that issued them, so removing a
/// stale id is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
	/// Returns the raw slot number.
	#[inline]
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ListenerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ListenerId({})", self.0)
	}
}

/// Type-erased view of a container that can free one of its slots.
pub(crate) trait Detach {
	fn detach(&self, id: ListenerId);
}

/// Owning token for a container listener.
///
/// The token is the only strong owner of the listener. Dropping it (or calling
/// [`Subscription::unsubscribe`]) frees the slot in the container; if the
/// container is already gone, nothing happens.
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
	id: ListenerId,
	owner: Weak<dyn Detach>,
}

impl Subscription {
	pub(crate) fn new(id: ListenerId, owner: Weak<dyn Detach>) -> Self {
		Self { id, owner }
	}

	/// Returns the slot id inside the owning container.
	pub fn id(&self) -> ListenerId {
		self.id
	}

	/// Returns true while the container that issued this token is alive.
	pub fn is_attached(&self) -> bool {
		self.owner.strong_count() > 0
	}

	/// Frees the listener slot now.
	pub fn unsubscribe(self) {
		drop(self);
	}

	pub(crate) fn belongs_to(&self, owner: *const ()) -> bool {
		std::ptr::addr_eq(self.owner.as_ptr(), owner)
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(owner) = self.owner.upgrade() {
			owner.detach(self.id);
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("attached", &self.is_attached())
			.finish()
	}
}
