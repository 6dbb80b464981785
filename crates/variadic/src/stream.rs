//! Shared single-pass sequences.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{CallError, Value};

type Source = Box<dyn Iterator<Item = Result<Value, CallError>> + Send>;

/// A lazy, possibly infinite, sequence of values that can be traversed once.
///
/// Clones share the underlying iterator: an item pulled through one handle is
/// gone for every other handle. Nothing is buffered or pre-measured.
#[derive(Clone)]
pub struct ValueStream {
	source: Arc<Mutex<Source>>,
}

impl ValueStream {
	pub fn new<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Value>,
		I::IntoIter: Send + 'static,
	{
		Self::fallible(items.into_iter().map(Ok))
	}

	/// Builds a stream whose items may fail; errors reach the consumer as-is.
	pub fn fallible<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Result<Value, CallError>>,
		I::IntoIter: Send + 'static,
	{
		Self {
			source: Arc::new(Mutex::new(Box::new(items.into_iter()))),
		}
	}

	/// Whether both handles share the same underlying source.
	pub fn same_source(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.source, &other.source)
	}
}

impl Iterator for ValueStream {
	type Item = Result<Value, CallError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.source.lock().next()
	}
}

impl PartialEq for ValueStream {
	fn eq(&self, other: &Self) -> bool {
		self.same_source(other)
	}
}

impl fmt::Debug for ValueStream {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValueStream").finish_non_exhaustive()
	}
}
