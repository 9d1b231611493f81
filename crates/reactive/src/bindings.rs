use std::cell::RefCell;
use std::fmt;

use crate::Subscription;

/// Owner for the subscriptions a subscriber installs.
///
/// Modifications keep one of these next to their editable fields so the
/// listeners they register die together with the modification.
#[derive(Default)]
pub struct Bindings {
	subscriptions: RefCell<Vec<Subscription>>,
}

impl Bindings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Keeps `subscription` alive until [`Bindings::clear`] or drop.
	pub fn hold(&self, subscription: Subscription) {
		self.subscriptions.borrow_mut().push(subscription);
	}

	/// Keeps every subscription in `subscriptions` alive.
	pub fn hold_all(&self, subscriptions: impl IntoIterator<Item = Subscription>) {
		self.subscriptions.borrow_mut().extend(subscriptions);
	}

	/// Drops every held subscription.
	pub fn clear(&self) {
		let released = std::mem::take(&mut *self.subscriptions.borrow_mut());
		drop(released);
	}

	pub fn len(&self) -> usize {
		self.subscriptions.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.subscriptions.borrow().is_empty()
	}
}

impl fmt::Debug for Bindings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Bindings").field("len", &self.len()).finish()
	}
}
