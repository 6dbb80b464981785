//! Call-time argument containers.
//!
//! * [`CallArguments`]: the raw call shape supplied by a caller.
//! * [`RestArgs`]: the lazy item sequence bound to a variadic positional slot.
//! * [`Arguments`]: the fully bound view handed to a function body.

use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use indexmap::IndexMap;

use crate::flatten::Flatten;
use crate::{CallError, Value};

/// Keyword arguments in call order.
pub type Keywords = IndexMap<String, Value>;

/// Positional values and keyword mapping supplied to one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments {
	pub positional: Vec<Value>,
	pub keywords: Keywords,
}

impl CallArguments {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.keywords.insert(name.into(), value.into());
		self
	}
}

impl<V: Into<Value>> FromIterator<V> for CallArguments {
	fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
		Self {
			positional: iter.into_iter().map(Into::into).collect(),
			keywords: Keywords::new(),
		}
	}
}

impl From<Vec<Value>> for CallArguments {
	fn from(positional: Vec<Value>) -> Self {
		Self {
			positional,
			keywords: Keywords::new(),
		}
	}
}

enum RestSource {
	Values(std::vec::IntoIter<Value>),
	Flattened(Flatten),
}

/// Items bound to a variadic positional slot, produced on demand.
///
/// A direct call yields the supplied values verbatim; a call through a
/// flattening wrapper yields the flattened sequence, pulling from supplied
/// iterables only as far as the body reads.
pub struct RestArgs {
	source: RestSource,
}

impl RestArgs {
	pub fn from_values(values: Vec<Value>) -> Self {
		Self {
			source: RestSource::Values(values.into_iter()),
		}
	}

	pub(crate) fn flattened(flatten: Flatten) -> Self {
		Self {
			source: RestSource::Flattened(flatten),
		}
	}

	/// Drains every remaining item, stopping at the first error.
	pub fn collect_values(self) -> Result<Vec<Value>, CallError> {
		self.collect()
	}
}

impl Default for RestArgs {
	fn default() -> Self {
		Self::from_values(Vec::new())
	}
}

impl Iterator for RestArgs {
	type Item = Result<Value, CallError>;

	fn next(&mut self) -> Option<Self::Item> {
		match &mut self.source {
			RestSource::Values(values) => values.next().map(Ok),
			RestSource::Flattened(flatten) => flatten.next(),
		}
	}
}

impl FusedIterator for RestArgs {}

impl fmt::Debug for RestArgs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.source {
			RestSource::Values(values) => f.debug_tuple("RestArgs").field(&values.as_slice()).finish(),
			RestSource::Flattened(flatten) => f.debug_tuple("RestArgs").field(flatten).finish(),
		}
	}
}

/// Arguments bound to a function's parameters, handed to its body.
#[derive(Debug)]
pub struct Arguments {
	function: String,
	values: IndexMap<String, Value>,
	rest: RestArgs,
	extra: Keywords,
}

impl Arguments {
	pub(crate) fn new(function: String, values: IndexMap<String, Value>, rest: RestArgs, extra: Keywords) -> Self {
		Self {
			function,
			values,
			rest,
			extra,
		}
	}

	/// Name of the function being called.
	pub fn function(&self) -> &str {
		&self.function
	}

	/// Value bound to a positional or keyword-only parameter.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Bound named values in declaration order.
	pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Moves a bound value out.
	pub fn take(&mut self, name: &str) -> Result<Value, CallError> {
		self.values.shift_remove(name).ok_or_else(|| CallError::MissingArgument {
			function: self.function.clone(),
			name: name.to_string(),
		})
	}

	pub fn rest(&mut self) -> &mut RestArgs {
		&mut self.rest
	}

	pub fn take_rest(&mut self) -> RestArgs {
		mem::take(&mut self.rest)
	}

	/// Keywords collected by the variadic keyword slot.
	pub fn extra_keywords(&self) -> &Keywords {
		&self.extra
	}

	pub fn take_extra_keywords(&mut self) -> Keywords {
		mem::take(&mut self.extra)
	}
}
