//! Value kinds and the element type accepted by a variadic slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::Value;

/// Coarse kind of a [`Value`], used for element matching and diagnostics.
#[derive(Debug, Display, EnumString, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Nothing,
	Bool,
	Int,
	Float,
	String,
	List,
	Record,
	Range,
	Stream,
}

/// The type, or set of types, whose instances count as single elements.
///
/// An element type that is itself iterable (e.g. [`ValueType::String`]) is
/// never flattened: membership is checked before the iteration capability.
/// An empty set matches nothing and renders as `never`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementType {
	/// Every value is an element; nothing gets flattened.
	Any,
	/// Values whose kind is in the set are elements.
	OneOf(SmallVec<[ValueType; 2]>),
}

impl ElementType {
	pub fn of(ty: ValueType) -> Self {
		Self::OneOf(SmallVec::from_slice(&[ty]))
	}

	/// Builds a set element type; duplicates are dropped, first occurrence wins.
	pub fn one_of(types: impl IntoIterator<Item = ValueType>) -> Self {
		let mut set: SmallVec<[ValueType; 2]> = SmallVec::new();
		for ty in types {
			if !set.contains(&ty) {
				set.push(ty);
			}
		}
		Self::OneOf(set)
	}

	/// The isinstance check.
	pub fn matches(&self, value: &Value) -> bool {
		match self {
			Self::Any => true,
			Self::OneOf(types) => types.contains(&value.get_type()),
		}
	}

	pub fn types(&self) -> Option<&[ValueType]> {
		match self {
			Self::Any => None,
			Self::OneOf(types) => Some(types),
		}
	}
}

impl From<ValueType> for ElementType {
	fn from(ty: ValueType) -> Self {
		Self::of(ty)
	}
}

impl<const N: usize> From<[ValueType; N]> for ElementType {
	fn from(types: [ValueType; N]) -> Self {
		Self::one_of(types)
	}
}

impl fmt::Display for ElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Any => f.write_str("any"),
			Self::OneOf(types) if types.is_empty() => f.write_str("never"),
			Self::OneOf(types) => write!(f, "{}", itertools::join(types.iter(), "|")),
		}
	}
}

/// Error returned when an element type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid element type `{input}`: unknown value type `{token}`")]
pub struct ElementTypeParseError {
	input: String,
	token: String,
}

impl FromStr for ElementType {
	type Err = ElementTypeParseError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let trimmed = input.trim();
		if trimmed.eq_ignore_ascii_case("any") {
			return Ok(Self::Any);
		}
		if trimmed.eq_ignore_ascii_case("never") {
			return Ok(Self::OneOf(SmallVec::new()));
		}
		let types = trimmed
			.split('|')
			.map(|token| {
				let token = token.trim();
				ValueType::from_str(token).map_err(|_| ElementTypeParseError {
					input: input.to_string(),
					token: token.to_string(),
				})
			})
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self::one_of(types))
	}
}

impl TryFrom<String> for ElementType {
	type Error = ElementTypeParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<ElementType> for String {
	fn from(ty: ElementType) -> Self {
		ty.to_string()
	}
}

/// Error returned by typed accessors like [`Value::as_int`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got {got}")]
pub struct ValueTypeError {
	expected: &'static str,
	got: ValueType,
}

impl ValueTypeError {
	pub fn new(expected: &'static str, got: ValueType) -> Self {
		Self { expected, got }
	}

	pub fn got(&self) -> ValueType {
		self.got
	}
}
