use std::fmt;

use indexmap::IndexMap;

use crate::action::{Action, ActionType, AnyAction};
use crate::error::Result;

type Handler = Box<dyn Fn(Box<dyn AnyAction>) -> Result<()>>;

/// Routes type-erased actions to typed handlers by identifier.
#[derive(Default)]
pub struct ActionsHandler {
	handlers: IndexMap<&'static str, Handler>,
}

impl ActionsHandler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `action_type`, replacing any previous one.
	///
	/// An action routed here whose payload is not `Action<I, O>` fails with
	/// [`ActionError::Mismatch`](crate::ActionError::Mismatch) before the
	/// handler runs.
	pub fn register<I: 'static, O: 'static>(
		&mut self,
		action_type: ActionType<I, O>,
		handler: impl Fn(Action<I, O>) -> Result<()> + 'static,
	) {
		let replaced = self
			.handlers
			.insert(
				action_type.identifier(),
				Box::new(move |action: Box<dyn AnyAction>| handler(action_type.cast(action)?)),
			)
			.is_some();
		tracing::debug!(action = action_type.identifier(), replaced, "registered action handler");
	}

	pub fn with<I: 'static, O: 'static>(
		mut self,
		action_type: ActionType<I, O>,
		handler: impl Fn(Action<I, O>) -> Result<()> + 'static,
	) -> Self {
		self.register(action_type, handler);
		self
	}

	pub fn handles(&self, identifier: &str) -> bool {
		self.handlers.contains_key(identifier)
	}

	/// Registered identifiers in registration order.
	pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.handlers.keys().copied()
	}

	/// Routes `action` to its handler.
	///
	/// Returns `Ok(false)` when no handler is registered for the identifier.
	pub fn handle(&self, action: Box<dyn AnyAction>) -> Result<bool> {
		let Some(handler) = self.handlers.get(action.identifier()) else {
			tracing::trace!(action = action.identifier(), "no handler for action");
			return Ok(false);
		};
		handler(action)?;
		Ok(true)
	}

	pub fn dispatch<I: 'static, O: 'static>(&self, action: Action<I, O>) -> Result<bool> {
		self.handle(Box::new(action))
	}
}

impl fmt::Debug for ActionsHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.handlers.keys()).finish()
	}
}
