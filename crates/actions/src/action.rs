use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;

use crate::error::{ActionError, Result};

/// Type-erased action as routed by [`ActionsHandler`](crate::ActionsHandler).
pub trait AnyAction: 'static {
	fn identifier(&self) -> &'static str;

	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Typed handle for one kind of action.
///
/// `I` is the payload the action carries and `O` what its completion
/// receives. Handles are `const`-constructible so built-ins can live in
/// statics.
pub struct ActionType<I, O> {
	identifier: &'static str,
	_marker: PhantomData<fn(I) -> O>,
}

impl<I, O> ActionType<I, O> {
	pub const fn new(identifier: &'static str) -> Self {
		Self {
			identifier,
			_marker: PhantomData,
		}
	}

	pub const fn identifier(&self) -> &'static str {
		self.identifier
	}
}

impl<I: 'static, O: 'static> ActionType<I, O> {
	pub fn make(&self, input: I) -> Action<I, O> {
		Action {
			identifier: self.identifier,
			input,
			completion: None,
		}
	}

	/// Builds an action whose handler reports its output to `completion`.
	pub fn make_with(&self, input: I, completion: impl FnOnce(O) + 'static) -> Action<I, O> {
		Action {
			identifier: self.identifier,
			input,
			completion: Some(Box::new(completion)),
		}
	}

	/// Borrows `action` as this type if both identifier and payload match.
	pub fn peek<'a>(&self, action: &'a dyn AnyAction) -> Option<&'a Action<I, O>> {
		if action.identifier() != self.identifier {
			return None;
		}
		action.as_any().downcast_ref()
	}

	/// Recovers the typed action.
	pub fn cast(&self, action: Box<dyn AnyAction>) -> Result<Action<I, O>> {
		let identifier = action.identifier();
		let mismatch = || ActionError::Mismatch {
			identifier: identifier.to_owned(),
			expected: type_name::<Action<I, O>>(),
		};
		if identifier != self.identifier {
			return Err(mismatch());
		}
		action
			.into_any()
			.downcast::<Action<I, O>>()
			.map(|action| *action)
			.map_err(|_| mismatch())
	}
}

impl<I, O> Clone for ActionType<I, O> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<I, O> Copy for ActionType<I, O> {}

impl<I, O> fmt::Debug for ActionType<I, O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ActionType").field(&self.identifier).finish()
	}
}

/// One requested action: its payload plus an optional completion.
pub struct Action<I, O> {
	identifier: &'static str,
	pub input: I,
	completion: Option<Box<dyn FnOnce(O)>>,
}

impl<I, O> Action<I, O> {
	pub fn identifier(&self) -> &'static str {
		self.identifier
	}

	pub fn has_completion(&self) -> bool {
		self.completion.is_some()
	}

	/// Consumes the action and hands `output` to its completion, if any.
	pub fn complete(self, output: O) {
		if let Some(completion) = self.completion {
			completion(output);
		}
	}
}

impl<I: 'static, O: 'static> AnyAction for Action<I, O> {
	fn identifier(&self) -> &'static str {
		self.identifier
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any> {
		self
	}
}

impl<I: fmt::Debug, O> fmt::Debug for Action<I, O> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Action")
			.field("identifier", &self.identifier)
			.field("input", &self.input)
			.field("has_completion", &self.completion.is_some())
			.finish()
	}
}
