//! Flattening invoker.
//!
//! Splits the raw positional values of a call into the named prefix and the
//! variadic tail, expands iterables found in the tail one level deep, and
//! forwards everything to the original function. Keywords are never touched.

use std::fmt;
use std::iter::FusedIterator;

use crate::classify::{Classification, classify};
use crate::inspect::VariadicShape;
use crate::{CallArguments, CallError, Callable, ElementType, Function, Items, RestArgs, Value};

/// Splits positional values into at most `prefix_len` leading values and the tail.
///
/// Supplying fewer values than the prefix needs is not an error here: the
/// original function's binding reports missing arguments itself.
pub fn partition(mut positional: Vec<Value>, prefix_len: usize) -> (Vec<Value>, Vec<Value>) {
	let tail = if positional.len() > prefix_len {
		positional.split_off(prefix_len)
	} else {
		Vec::new()
	};
	(positional, tail)
}

/// Lazy flat view over variadic tail values.
///
/// Each tail value is classified only when reached. Items of an iterable are
/// pulled one at a time, so infinite iterables are fine as long as the
/// consumer stops reading. Every supplied iterable is traversed at most once.
pub struct Flatten {
	element_type: ElementType,
	pending: std::vec::IntoIter<Value>,
	current: Option<Items>,
}

impl Flatten {
	pub fn new(values: Vec<Value>, element_type: ElementType) -> Self {
		Self {
			element_type,
			pending: values.into_iter(),
			current: None,
		}
	}
}

/// Flattens `values` one level against `element_type`.
pub fn flatten(values: Vec<Value>, element_type: &ElementType) -> Flatten {
	Flatten::new(values, element_type.clone())
}

impl Iterator for Flatten {
	type Item = Result<Value, CallError>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(items) = &mut self.current {
				match items.next() {
					Some(item) => return Some(item),
					None => self.current = None,
				}
			}
			let value = self.pending.next()?;
			match classify(&value, &self.element_type) {
				Classification::Scalar => return Some(Ok(value)),
				Classification::IterableOfElements => match value.into_items() {
					Ok(items) => self.current = Some(items),
					Err(value) => return Some(Ok(value)),
				},
			}
		}
	}
}

impl FusedIterator for Flatten {}

impl fmt::Debug for Flatten {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Flatten")
			.field("element_type", &self.element_type)
			.field("pending", &self.pending.len())
			.field("expanding", &self.current.is_some())
			.finish()
	}
}

/// Calls `function` with the flattened form of `args`.
///
/// Errors from the function, its binding, or a supplied iterable propagate
/// unchanged.
pub fn invoke(function: &Function, shape: &VariadicShape, element_type: &ElementType, args: CallArguments) -> Result<Value, CallError> {
	let CallArguments { positional, keywords } = args;
	let (prefix, tail) = partition(positional, shape.prefix_len());
	tracing::trace!(
		function = function.name(),
		prefix = prefix.len(),
		tail = tail.len(),
		keywords = keywords.len(),
		"variadic.invoke"
	);
	let rest = RestArgs::flattened(Flatten::new(tail, element_type.clone()));
	function.call_with_rest(prefix, rest, keywords)
}
