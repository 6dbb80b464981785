//! Scalar versus iterable classification of variadic arguments.

use crate::{ElementType, Value};

/// How a value supplied to a variadic slot contributes to the flat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
	/// Contributes itself as one element.
	Scalar,
	/// Contributes each of its items, in order.
	IterableOfElements,
}

/// Classifies one variadic argument against the declared element type.
///
/// Element membership is checked first, so an element type that is itself
/// iterable is never expanded. Anything that is neither an element nor
/// iterable is a scalar; type mismatches are left to the wrapped function.
pub fn classify(value: &Value, element_type: &ElementType) -> Classification {
	let classification = if element_type.matches(value) || !value.is_iterable() {
		Classification::Scalar
	} else {
		Classification::IterableOfElements
	};
	tracing::trace!(value_type = %value.get_type(), %element_type, ?classification, "variadic.classify");
	classification
}
