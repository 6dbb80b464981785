//! Signature inspection for wrap targets.

use std::sync::Arc;

use crate::{Callable, ParameterSpec, WrapError};

/// Structural facts about a callable with a variadic positional slot.
#[derive(Debug, Clone, PartialEq)]
pub struct VariadicShape {
	signature: Arc<ParameterSpec>,
	rest: String,
	prefix_len: usize,
}

impl VariadicShape {
	/// The callable's full parameter list.
	pub fn signature(&self) -> &ParameterSpec {
		&self.signature
	}

	/// Name of the variadic positional slot.
	pub fn rest(&self) -> &str {
		&self.rest
	}

	/// Number of named positional parameters preceding the rest slot.
	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}
}

/// Reads the parameter list of `callable`.
///
/// Fails with [`WrapError::UnsupportedSignature`] when there is no variadic
/// positional slot, since there would be nothing to flatten.
pub fn inspect(callable: &dyn Callable) -> Result<VariadicShape, WrapError> {
	let signature = callable.signature();
	let Some(rest) = signature.rest() else {
		return Err(WrapError::UnsupportedSignature {
			function: callable.name().to_string(),
			signature: signature.to_string(),
		});
	};
	Ok(VariadicShape {
		rest: rest.to_string(),
		prefix_len: signature.positional_count(),
		signature: Arc::new(signature.clone()),
	})
}
