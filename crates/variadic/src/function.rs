//! Callables and the argument binding machinery.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Arguments, CallArguments, CallError, Keywords, ParameterSpec, RestArgs, Value};

/// Anything that can be introspected and called with [`CallArguments`].
///
/// Introspection tooling reads `name`, `doc` and `signature`; a flattening
/// wrapper answers these with the original function's metadata.
pub trait Callable: Send + Sync {
	fn name(&self) -> &str;

	fn doc(&self) -> Option<&str>;

	fn signature(&self) -> &ParameterSpec;

	fn call(&self, args: CallArguments) -> Result<Value, CallError>;
}

type Body = dyn Fn(Arguments) -> Result<Value, CallError> + Send + Sync;

/// A named Rust closure with a declared [`ParameterSpec`].
///
/// Calls are bound against the signature before the body runs: positional
/// values fill positional parameters in order, keywords fill parameters by
/// name, defaults fill the gaps, surplus positional values go to the rest
/// slot and unknown keywords to the variadic keyword slot.
#[derive(Clone)]
pub struct Function {
	name: String,
	doc: Option<String>,
	signature: Arc<ParameterSpec>,
	body: Arc<Body>,
}

impl Function {
	pub fn new<F>(name: impl Into<String>, signature: ParameterSpec, body: F) -> Self
	where
		F: Fn(Arguments) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			doc: None,
			signature: Arc::new(signature),
			body: Arc::new(body),
		}
	}

	pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
		self.doc = Some(doc.into());
		self
	}

	/// Calls with an already separated positional prefix and rest sequence.
	///
	/// Used by the flattening invoker to hand over a lazy tail. `prefix` must
	/// not exceed the number of positional parameters.
	pub(crate) fn call_with_rest(&self, prefix: Vec<Value>, rest: RestArgs, keywords: Keywords) -> Result<Value, CallError> {
		let args = self.bind(prefix, rest, keywords)?;
		(self.body)(args)
	}

	fn bind(&self, prefix: Vec<Value>, rest: RestArgs, keywords: Keywords) -> Result<Arguments, CallError> {
		let spec = &self.signature;
		let max = spec.positional_count();
		if prefix.len() > max {
			return Err(CallError::TooManyPositional {
				function: self.name.clone(),
				max,
				given: prefix.len(),
			});
		}

		let mut values: IndexMap<String, Value> = spec.positional().map(|p| p.name().to_string()).zip(prefix).collect();

		let mut extra = Keywords::new();
		for (name, value) in keywords {
			match spec.get(&name) {
				Some(param) if param.is_named() => {
					if values.contains_key(&name) {
						return Err(CallError::DuplicateArgument {
							function: self.name.clone(),
							name,
						});
					}
					values.insert(name, value);
				}
				_ if spec.var_keyword().is_some() => {
					extra.insert(name, value);
				}
				_ => {
					return Err(CallError::UnexpectedKeyword {
						function: self.name.clone(),
						name,
					});
				}
			}
		}

		for param in spec.params().iter().filter(|p| p.is_named()) {
			if values.contains_key(param.name()) {
				continue;
			}
			match param.default() {
				Some(default) => {
					values.insert(param.name().to_string(), default.clone());
				}
				None => {
					return Err(CallError::MissingArgument {
						function: self.name.clone(),
						name: param.name().to_string(),
					});
				}
			}
		}

		// Keep declaration order regardless of how values arrived.
		values.sort_by_cached_key(|name, _| spec.params().iter().position(|p| p.name() == name));

		Ok(Arguments::new(self.name.clone(), values, rest, extra))
	}
}

impl Callable for Function {
	fn name(&self) -> &str {
		&self.name
	}

	fn doc(&self) -> Option<&str> {
		self.doc.as_deref()
	}

	fn signature(&self) -> &ParameterSpec {
		&self.signature
	}

	fn call(&self, args: CallArguments) -> Result<Value, CallError> {
		let CallArguments { positional, keywords } = args;
		let max = self.signature.positional_count();
		if self.signature.rest().is_none() && positional.len() > max {
			return Err(CallError::TooManyPositional {
				function: self.name.clone(),
				max,
				given: positional.len(),
			});
		}
		let (prefix, tail) = crate::flatten::partition(positional, max);
		self.call_with_rest(prefix, RestArgs::from_values(tail), keywords)
	}
}

impl fmt::Debug for Function {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Function")
			.field("name", &self.name)
			.field("signature", &format_args!("{}", self.signature))
			.finish_non_exhaustive()
	}
}
