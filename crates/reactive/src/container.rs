use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::subscription::{Detach, ListenerId, Subscription};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
	id: ListenerId,
	handler: Handler<T>,
}

struct Shared<T> {
	value: RefCell<T>,
	notifying: Cell<bool>,
	next_id: Cell<u64>,
	slots: RefCell<Vec<Slot<T>>>,
}

impl<T> Shared<T> {
	fn handler(&self, id: ListenerId) -> Option<Handler<T>> {
		self.slots
			.borrow()
			.iter()
			.find(|slot| slot.id == id)
			.map(|slot| slot.handler.clone())
	}
}

impl<T> Detach for Shared<T> {
	fn detach(&self, id: ListenerId) {
		self.slots.borrow_mut().retain(|slot| slot.id != id);
	}
}

/// Resets the notification flag even if a listener panics.
struct PassGuard<'a>(&'a Cell<bool>);

impl Drop for PassGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// A single mutable slot with change notification.
///
/// Cloning a `ValueContainer` clones the handle, not the slot: every clone
/// reads and writes the same value and shares one listener list.
pub struct ValueContainer<T> {
	shared: Rc<Shared<T>>,
}

impl<T> Clone for ValueContainer<T> {
	fn clone(&self) -> Self {
		Self {
			shared: self.shared.clone(),
		}
	}
}

impl<T: 'static> ValueContainer<T> {
	/// Creates a container holding `value` with no listeners.
	pub fn new(value: T) -> Self {
		Self {
			shared: Rc::new(Shared {
				value: RefCell::new(value),
				notifying: Cell::new(false),
				next_id: Cell::new(0),
				slots: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Runs `f` against the current value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&*self.shared.value.borrow())
	}

	/// Registers a listener invoked after every write.
	///
	/// The returned token owns the listener; keep it for as long as the
	/// listener should stay active.
	pub fn add_listener(&self, handler: impl Fn(&T) + 'static) -> Subscription {
		let id = ListenerId(self.shared.next_id.get());
		self.shared.next_id.set(id.0 + 1);
		self.shared.slots.borrow_mut().push(Slot {
			id,
			handler: Rc::new(handler),
		});
		let owner: Rc<dyn Detach> = self.shared.clone();
		Subscription::new(id, Rc::downgrade(&owner))
	}

	/// Removes the listener held by `subscription`.
	///
	/// Removing a listener twice, or one issued by another container, does
	/// nothing.
	pub fn remove_listener(&self, subscription: &Subscription) {
		if subscription.belongs_to(Rc::as_ptr(&self.shared).cast()) {
			self.shared.detach(subscription.id());
		}
	}

	/// Returns the number of live listener slots.
	pub fn listener_count(&self) -> usize {
		self.shared.slots.borrow().len()
	}

	/// Returns true while a notification pass is running.
	pub fn is_notifying(&self) -> bool {
		self.shared.notifying.get()
	}

	/// Returns a non-owning handle to this container.
	pub fn downgrade(&self) -> WeakValueContainer<T> {
		WeakValueContainer {
			shared: Rc::downgrade(&self.shared),
		}
	}

	/// Returns true if both handles point at the same slot.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.shared, &other.shared)
	}
}

impl<T: Clone + 'static> ValueContainer<T> {
	/// Returns a copy of the current value.
	pub fn get(&self) -> T {
		self.shared.value.borrow().clone()
	}

	/// Stores `value` and notifies listeners.
	///
	/// Inside a running notification pass the value is stored but no nested
	/// pass starts.
	pub fn set(&self, value: T) {
		*self.shared.value.borrow_mut() = value;
		self.notify();
	}

	/// Mutates the value in place and notifies listeners.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		f(&mut *self.shared.value.borrow_mut());
		self.notify();
	}

	/// Pushes every write of this container into `target`.
	///
	/// The binding does not keep `target` alive; once it is dropped the
	/// listener does nothing.
	pub fn bind_to(&self, target: &ValueContainer<T>) -> Subscription {
		self.map_to(target, T::clone)
	}

	/// Pushes every write of this container into `target` through `map`.
	pub fn map_to<U: Clone + 'static>(
		&self,
		target: &ValueContainer<U>,
		map: impl Fn(&T) -> U + 'static,
	) -> Subscription {
		let target = target.downgrade();
		self.add_listener(move |value| {
			if let Some(target) = target.upgrade() {
				target.set(map(value));
			}
		})
	}

	fn notify(&self) {
		let shared = &self.shared;
		if shared.notifying.replace(true) {
			tracing::trace!("suppressed re-entrant notification");
			return;
		}
		let _pass = PassGuard(&shared.notifying);

		let ids: Vec<ListenerId> = shared.slots.borrow().iter().map(|slot| slot.id).collect();
		for id in ids {
			// Slots freed earlier in this pass are skipped.
			let Some(handler) = shared.handler(id) else {
				continue;
			};
			let value = shared.value.borrow().clone();
			handler(&value);
		}
	}
}

impl<T: Default + 'static> Default for ValueContainer<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for ValueContainer<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("ValueContainer");
		match self.shared.value.try_borrow() {
			Ok(value) => s.field("value", &*value),
			Err(_) => s.field("value", &"<borrowed>"),
		};
		s.field("listeners", &self.shared.slots.borrow().len()).finish()
	}
}

impl<T: Serialize> Serialize for ValueContainer<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.shared.value.borrow().serialize(serializer)
	}
}

impl<'de, T: Deserialize<'de> + 'static> Deserialize<'de> for ValueContainer<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		T::deserialize(deserializer).map(Self::new)
	}
}

/// Non-owning handle to a [`ValueContainer`].
pub struct WeakValueContainer<T> {
	shared: Weak<Shared<T>>,
}

impl<T> Clone for WeakValueContainer<T> {
	fn clone(&self) -> Self {
		Self {
			shared: self.shared.clone(),
		}
	}
}

impl<T> WeakValueContainer<T> {
	/// Returns a strong handle if the container is still alive.
	pub fn upgrade(&self) -> Option<ValueContainer<T>> {
		self.shared.upgrade().map(|shared| ValueContainer { shared })
	}
}

impl<T> fmt::Debug for WeakValueContainer<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakValueContainer")
			.field("alive", &(self.shared.strong_count() > 0))
			.finish()
	}
}
