//! Structural parameter descriptions.
//!
//! A [`ParameterSpec`] is the single source of truth for both argument
//! binding and introspection. Parameters are stored in declaration order and
//! always satisfy the ordering rules:
//!
//! * required positional parameters precede defaulted ones;
//! * at most one variadic positional ("rest") slot follows them;
//! * keyword-only parameters follow the rest slot (or a bare `*`);
//! * a variadic keyword slot, if any, comes last.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use strum::Display;

use crate::{Value, WrapError};

/// Structural role of a parameter.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
	/// Bound by position or by keyword.
	Positional,
	/// Variadic positional slot.
	Rest,
	/// Bound by keyword only.
	Keyword,
	/// Variadic keyword slot.
	VarKeyword,
}

/// One entry of a [`ParameterSpec`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
	name: String,
	kind: ParameterKind,
	#[serde(skip_serializing_if = "Option::is_none")]
	default: Option<Value>,
}

impl Parameter {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> ParameterKind {
		self.kind
	}

	pub fn default(&self) -> Option<&Value> {
		self.default.as_ref()
	}

	/// Whether the parameter accepts a single named value.
	pub fn is_named(&self) -> bool {
		matches!(self.kind, ParameterKind::Positional | ParameterKind::Keyword)
	}

	/// Whether a call must supply a value for this parameter.
	pub fn is_required(&self) -> bool {
		self.is_named() && self.default.is_none()
	}
}

impl fmt::Display for Parameter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			ParameterKind::Rest => write!(f, "*{}", self.name),
			ParameterKind::VarKeyword => write!(f, "**{}", self.name),
			ParameterKind::Positional | ParameterKind::Keyword => match &self.default {
				Some(default) => write!(f, "{}={default}", self.name),
				None => f.write_str(&self.name),
			},
		}
	}
}

/// Ordered parameter list of a callable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSpec {
	params: Vec<Parameter>,
}

impl ParameterSpec {
	pub fn builder() -> SignatureBuilder {
		SignatureBuilder::default()
	}

	/// All parameters in declaration order.
	pub fn params(&self) -> &[Parameter] {
		&self.params
	}

	pub fn positional(&self) -> impl Iterator<Item = &Parameter> {
		self.params.iter().filter(|p| p.kind == ParameterKind::Positional)
	}

	pub fn positional_count(&self) -> usize {
		self.positional().count()
	}

	pub fn keyword_only(&self) -> impl Iterator<Item = &Parameter> {
		self.params.iter().filter(|p| p.kind == ParameterKind::Keyword)
	}

	/// Name of the variadic positional slot.
	pub fn rest(&self) -> Option<&str> {
		self.find_kind(ParameterKind::Rest)
	}

	/// Name of the variadic keyword slot.
	pub fn var_keyword(&self) -> Option<&str> {
		self.find_kind(ParameterKind::VarKeyword)
	}

	pub fn get(&self, name: &str) -> Option<&Parameter> {
		self.params.iter().find(|p| p.name == name)
	}

	fn find_kind(&self, kind: ParameterKind) -> Option<&str> {
		self.params.iter().find(|p| p.kind == kind).map(Parameter::name)
	}
}

impl fmt::Display for ParameterSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		let mut first = true;
		let mut bare_star = self.rest().is_none();
		for param in &self.params {
			if !first {
				f.write_str(", ")?;
			}
			first = false;
			if bare_star && param.kind == ParameterKind::Keyword {
				f.write_str("*, ")?;
				bare_star = false;
			}
			write!(f, "{param}")?;
		}
		f.write_str(")")
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
	Required,
	Defaulted,
	KeywordOnly,
	Closed,
}

/// Incremental [`ParameterSpec`] constructor; ordering is checked in [`Self::build`].
#[derive(Debug, Default)]
pub struct SignatureBuilder {
	params: Vec<Parameter>,
}

impl SignatureBuilder {
	pub fn positional(self, name: impl Into<String>) -> Self {
		self.push(name, ParameterKind::Positional, None)
	}

	pub fn positional_with_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
		self.push(name, ParameterKind::Positional, Some(default.into()))
	}

	pub fn rest(self, name: impl Into<String>) -> Self {
		self.push(name, ParameterKind::Rest, None)
	}

	pub fn keyword(self, name: impl Into<String>) -> Self {
		self.push(name, ParameterKind::Keyword, None)
	}

	pub fn keyword_with_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
		self.push(name, ParameterKind::Keyword, Some(default.into()))
	}

	pub fn var_keyword(self, name: impl Into<String>) -> Self {
		self.push(name, ParameterKind::VarKeyword, None)
	}

	fn push(mut self, name: impl Into<String>, kind: ParameterKind, default: Option<Value>) -> Self {
		self.params.push(Parameter {
			name: name.into(),
			kind,
			default,
		});
		self
	}

	pub fn build(self) -> Result<ParameterSpec, WrapError> {
		let mut seen = HashSet::new();
		let mut stage = Stage::Required;
		for param in &self.params {
			if param.name.is_empty() {
				return Err(invalid("parameter names must not be empty"));
			}
			if !seen.insert(param.name.as_str()) {
				return Err(invalid(format!("duplicate parameter `{}`", param.name)));
			}
			if stage == Stage::Closed {
				return Err(invalid(format!("parameter `{}` follows the variadic keyword parameter", param.name)));
			}
			stage = match (param.kind, param.default.is_some()) {
				(ParameterKind::Positional, false) if stage == Stage::Defaulted => {
					return Err(invalid(format!("non-default parameter `{}` follows default parameter", param.name)));
				}
				(ParameterKind::Positional, _) if stage == Stage::KeywordOnly => {
					return Err(invalid(format!("positional parameter `{}` follows keyword-only parameters", param.name)));
				}
				(ParameterKind::Positional, false) => Stage::Required,
				(ParameterKind::Positional, true) => Stage::Defaulted,
				(ParameterKind::Rest, _) if stage == Stage::KeywordOnly => {
					return Err(invalid(format!("variadic parameter `{}` after keyword-only or variadic parameters", param.name)));
				}
				(ParameterKind::Rest, _) | (ParameterKind::Keyword, _) => Stage::KeywordOnly,
				(ParameterKind::VarKeyword, _) => Stage::Closed,
			};
		}
		Ok(ParameterSpec { params: self.params })
	}
}

fn invalid(message: impl Into<String>) -> WrapError {
	WrapError::InvalidSignature(message.into())
}

#[cfg(test)]
mod tests;
