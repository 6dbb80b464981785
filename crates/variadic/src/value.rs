//! Runtime value model passed through wrapped calls.
//!
//! Values are dynamically typed. A subset of them (lists, ranges, streams and
//! strings) carries the iteration capability used by the element classifier.

use std::fmt;
use std::iter::FusedIterator;

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::{CallError, ValueStream, ValueType, ValueTypeError};

/// Insertion-ordered record used by [`Value::Record`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
	inner: Vec<(String, Value)>,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn push(&mut self, key: impl Into<String>, value: Value) {
		self.inner.push((key.into(), value));
	}

	pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
		let key = key.as_ref();
		self.inner.iter().rfind(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
		self.inner.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
	fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
		Self {
			inner: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}
}

/// Half-open integer range, unbounded when `end` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntRange {
	start: i64,
	end: Option<i64>,
	step: i64,
}

impl IntRange {
	pub const fn new(start: i64, end: i64) -> Self {
		Self {
			start,
			end: Some(end),
			step: 1,
		}
	}

	pub const fn unbounded(start: i64) -> Self {
		Self { start, end: None, step: 1 }
	}

	/// Returns `None` for a zero step.
	pub const fn stepped(start: i64, end: Option<i64>, step: i64) -> Option<Self> {
		if step == 0 {
			return None;
		}
		Some(Self { start, end, step })
	}

	pub const fn start(&self) -> i64 {
		self.start
	}

	pub const fn end(&self) -> Option<i64> {
		self.end
	}

	pub const fn step(&self) -> i64 {
		self.step
	}

	pub fn iter(&self) -> IntRangeIter {
		IntRangeIter {
			next: Some(self.start),
			end: self.end,
			step: self.step,
		}
	}
}

/// Lazy iterator over an [`IntRange`].
#[derive(Debug, Clone)]
pub struct IntRangeIter {
	next: Option<i64>,
	end: Option<i64>,
	step: i64,
}

impl Iterator for IntRangeIter {
	type Item = i64;

	fn next(&mut self) -> Option<i64> {
		let current = self.next?;
		let in_bounds = match self.end {
			None => true,
			Some(end) if self.step > 0 => current < end,
			Some(end) => current > end,
		};
		if !in_bounds {
			self.next = None;
			return None;
		}
		self.next = current.checked_add(self.step);
		Some(current)
	}
}

impl FusedIterator for IntRangeIter {}

/// Runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Nothing,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<Value>),
	Record(Record),
	Range(IntRange),
	Stream(ValueStream),
}

impl Value {
	pub fn string(val: impl Into<String>) -> Self {
		Self::String(val.into())
	}

	pub fn list(vals: impl IntoIterator<Item = impl Into<Value>>) -> Self {
		Self::List(vals.into_iter().map(Into::into).collect())
	}

	pub fn range(start: i64, end: i64) -> Self {
		Self::Range(IntRange::new(start, end))
	}

	/// Infinite range counting up from `start`.
	pub fn range_from(start: i64) -> Self {
		Self::Range(IntRange::unbounded(start))
	}

	pub fn stream<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Value>,
		I::IntoIter: Send + 'static,
	{
		Self::Stream(ValueStream::new(items))
	}

	pub fn get_type(&self) -> ValueType {
		match self {
			Self::Nothing => ValueType::Nothing,
			Self::Bool(_) => ValueType::Bool,
			Self::Int(_) => ValueType::Int,
			Self::Float(_) => ValueType::Float,
			Self::String(_) => ValueType::String,
			Self::List(_) => ValueType::List,
			Self::Record(_) => ValueType::Record,
			Self::Range(_) => ValueType::Range,
			Self::Stream(_) => ValueType::Stream,
		}
	}

	pub fn is_nothing(&self) -> bool {
		matches!(self, Self::Nothing)
	}

	/// Whether the value can produce a sequence of items.
	pub fn is_iterable(&self) -> bool {
		matches!(self, Self::List(_) | Self::Range(_) | Self::Stream(_) | Self::String(_))
	}

	/// Converts an iterable value into its lazy item iterator.
	///
	/// Scalars are handed back unchanged in the `Err` variant.
	pub fn into_items(self) -> Result<Items, Self> {
		match self {
			Self::List(vals) => Ok(Items::List(vals.into_iter())),
			Self::Range(range) => Ok(Items::Range(range.iter())),
			Self::Stream(stream) => Ok(Items::Stream(stream)),
			Self::String(text) => Ok(Items::Chars { text, pos: 0 }),
			other => Err(other),
		}
	}

	pub fn as_bool(&self) -> Result<bool, ValueTypeError> {
		match self {
			Self::Bool(val) => Ok(*val),
			other => Err(ValueTypeError::new("bool", other.get_type())),
		}
	}

	pub fn as_int(&self) -> Result<i64, ValueTypeError> {
		match self {
			Self::Int(val) => Ok(*val),
			other => Err(ValueTypeError::new("int", other.get_type())),
		}
	}

	pub fn as_float(&self) -> Result<f64, ValueTypeError> {
		match self {
			Self::Float(val) => Ok(*val),
			Self::Int(val) => Ok(*val as f64),
			other => Err(ValueTypeError::new("float", other.get_type())),
		}
	}

	pub fn as_str(&self) -> Result<&str, ValueTypeError> {
		match self {
			Self::String(val) => Ok(val),
			other => Err(ValueTypeError::new("string", other.get_type())),
		}
	}

	pub fn as_list(&self) -> Result<&[Value], ValueTypeError> {
		match self {
			Self::List(vals) => Ok(vals),
			other => Err(ValueTypeError::new("list", other.get_type())),
		}
	}

	pub fn as_record(&self) -> Result<&Record, ValueTypeError> {
		match self {
			Self::Record(val) => Ok(val),
			other => Err(ValueTypeError::new("record", other.get_type())),
		}
	}
}

/// Items produced by an iterable [`Value`], in order and on demand.
#[derive(Debug)]
pub enum Items {
	List(std::vec::IntoIter<Value>),
	Range(IntRangeIter),
	Stream(ValueStream),
	Chars { text: String, pos: usize },
}

impl Iterator for Items {
	type Item = Result<Value, CallError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self {
			Self::List(vals) => vals.next().map(Ok),
			Self::Range(range) => range.next().map(|n| Ok(Value::Int(n))),
			Self::Stream(stream) => stream.next(),
			Self::Chars { text, pos } => {
				let ch = text[*pos..].chars().next()?;
				*pos += ch.len_utf8();
				Some(Ok(Value::String(ch.to_string())))
			}
		}
	}
}

impl From<bool> for Value {
	fn from(val: bool) -> Self {
		Self::Bool(val)
	}
}

impl From<i64> for Value {
	fn from(val: i64) -> Self {
		Self::Int(val)
	}
}

impl From<i32> for Value {
	fn from(val: i32) -> Self {
		Self::Int(val.into())
	}
}

impl From<f64> for Value {
	fn from(val: f64) -> Self {
		Self::Float(val)
	}
}

impl From<&str> for Value {
	fn from(val: &str) -> Self {
		Self::String(val.to_string())
	}
}

impl From<String> for Value {
	fn from(val: String) -> Self {
		Self::String(val)
	}
}

impl From<Vec<Value>> for Value {
	fn from(vals: Vec<Value>) -> Self {
		Self::List(vals)
	}
}

impl From<Record> for Value {
	fn from(val: Record) -> Self {
		Self::Record(val)
	}
}

impl From<IntRange> for Value {
	fn from(range: IntRange) -> Self {
		Self::Range(range)
	}
}

impl From<ValueStream> for Value {
	fn from(stream: ValueStream) -> Self {
		Self::Stream(stream)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Nothing => f.write_str("nothing"),
			Self::Bool(val) => write!(f, "{val}"),
			Self::Int(val) => write!(f, "{val}"),
			Self::Float(val) => write!(f, "{val:?}"),
			Self::String(val) => write!(f, "{val:?}"),
			Self::List(vals) => write!(f, "[{}]", itertools::join(vals, ", ")),
			Self::Record(record) => {
				f.write_str("{")?;
				for (i, (key, val)) in record.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key}: {val}")?;
				}
				f.write_str("}")
			}
			Self::Range(range) => {
				let end = range.end.map(|end| end.to_string()).unwrap_or_default();
				match range.step {
					1 => write!(f, "{}..{end}", range.start),
					step => write!(f, "{}..{end}:{step}", range.start),
				}
			}
			Self::Stream(_) => f.write_str("<stream>"),
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Nothing => serializer.serialize_unit(),
			Self::Bool(val) => serializer.serialize_bool(*val),
			Self::Int(val) => serializer.serialize_i64(*val),
			Self::Float(val) => serializer.serialize_f64(*val),
			Self::String(val) => serializer.serialize_str(val),
			Self::List(vals) => {
				let mut seq = serializer.serialize_seq(Some(vals.len()))?;
				for val in vals {
					seq.serialize_element(val)?;
				}
				seq.end()
			}
			Self::Record(record) => {
				let mut map = serializer.serialize_map(Some(record.len()))?;
				for (key, val) in record.iter() {
					map.serialize_entry(key, val)?;
				}
				map.end()
			}
			Self::Range(range) => {
				let mut state = serializer.serialize_struct("Range", 3)?;
				state.serialize_field("start", &range.start)?;
				state.serialize_field("end", &range.end)?;
				state.serialize_field("step", &range.step)?;
				state.end()
			}
			// Streams are single-pass; serializing must not consume them.
			Self::Stream(_) => serializer.serialize_str("<stream>"),
		}
	}
}
