//! Error types for wrapping and calling functions.

use thiserror::Error;

use crate::ValueTypeError;

/// Errors raised while constructing a wrapper. No wrapper exists afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrapError {
	/// The target has no variadic positional parameter to adapt.
	#[error("cannot wrap `{function}{signature}`: no variadic positional parameter")]
	UnsupportedSignature {
		/// Name of the rejected function.
		function: String,
		/// Rendered parameter list of the rejected function.
		signature: String,
	},

	/// A parameter list violates the ordering or naming rules.
	#[error("invalid signature: {0}")]
	InvalidSignature(String),
}

/// Errors raised while calling a function, wrapped or not.
///
/// The flattening wrapper never creates or rewrites these: whatever the
/// original function or a supplied iterable returns reaches the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
	#[error("{function}() missing required argument: '{name}'")]
	MissingArgument { function: String, name: String },

	#[error("{function}() takes {max} positional arguments but {given} were given")]
	TooManyPositional { function: String, max: usize, given: usize },

	#[error("{function}() got an unexpected keyword argument '{name}'")]
	UnexpectedKeyword { function: String, name: String },

	#[error("{function}() got multiple values for argument '{name}'")]
	DuplicateArgument { function: String, name: String },

	#[error(transparent)]
	Type(#[from] ValueTypeError),

	/// Error raised by a function body or an iterable.
	#[error("{0}")]
	Raised(String),
}

impl CallError {
	pub fn raised(message: impl Into<String>) -> Self {
		Self::Raised(message.into())
	}
}

/// Result type for call-time operations.
pub type Result<T> = std::result::Result<T, CallError>;
