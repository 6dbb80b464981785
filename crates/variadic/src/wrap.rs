//! Signature-preserving flattening wrappers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flatten::invoke;
use crate::inspect::{VariadicShape, inspect};
use crate::{CallArguments, CallError, Callable, ElementType, Function, ParameterSpec, Value, WrapError};

/// Reusable wrapper generator for one element type.
///
/// ```
/// use variadic::{CallArguments, Callable, Function, ParameterSpec, Value, ValueType, variadic};
///
/// let signature = ParameterSpec::builder().rest("xs").build()?;
/// let list = Function::new("list", signature, |mut args| Ok(Value::List(args.take_rest().collect_values()?)));
/// let list = variadic(ValueType::Int).wrap(list)?;
///
/// let args = CallArguments::new().arg(1).arg(2).arg(Value::list([3, 4])).arg(Value::range(5, 8));
/// assert_eq!(list.call(args)?, Value::list([1, 2, 3, 4, 5, 6, 7]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variadic {
	element_type: ElementType,
}

/// Creates a wrapper generator; see [`Variadic`].
pub fn variadic(element_type: impl Into<ElementType>) -> Variadic {
	Variadic::new(element_type)
}

impl Variadic {
	pub fn new(element_type: impl Into<ElementType>) -> Self {
		Self {
			element_type: element_type.into(),
		}
	}

	pub fn element_type(&self) -> &ElementType {
		&self.element_type
	}

	/// Wraps `function` so that iterables passed to its rest slot are flattened.
	pub fn wrap(&self, function: Function) -> Result<WrappedFunction, WrapError> {
		let shape = inspect(&function)?;
		tracing::debug!(
			function = function.name(),
			signature = %shape.signature(),
			element_type = %self.element_type,
			"variadic.wrap"
		);
		Ok(WrappedFunction {
			original: function,
			shape,
			element_type: self.element_type.clone(),
		})
	}
}

/// A function whose variadic positional arguments are flattened before the
/// original body runs.
///
/// Introspection (name, doc, signature) reports the original function.
#[derive(Clone)]
pub struct WrappedFunction {
	original: Function,
	shape: VariadicShape,
	element_type: ElementType,
}

impl WrappedFunction {
	/// The function this wrapper forwards to.
	pub fn wrapped(&self) -> &Function {
		&self.original
	}

	pub fn element_type(&self) -> &ElementType {
		&self.element_type
	}

	pub fn shape(&self) -> &VariadicShape {
		&self.shape
	}

	pub fn metadata(&self) -> FunctionMetadata {
		FunctionMetadata::of(self)
	}
}

impl Callable for WrappedFunction {
	fn name(&self) -> &str {
		self.original.name()
	}

	fn doc(&self) -> Option<&str> {
		self.original.doc()
	}

	fn signature(&self) -> &ParameterSpec {
		self.shape.signature()
	}

	fn call(&self, args: CallArguments) -> Result<Value, CallError> {
		invoke(&self.original, &self.shape, &self.element_type, args)
	}
}

impl fmt::Debug for WrappedFunction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WrappedFunction")
			.field("name", &self.name())
			.field("signature", &format_args!("{}", self.signature()))
			.field("element_type", &format_args!("{}", self.element_type))
			.finish()
	}
}

/// Introspection snapshot for documentation and analysis tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionMetadata {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	pub parameters: ParameterSpec,
	/// Rendered form such as `sum(start, *xs, step=1)`.
	pub display: String,
}

impl FunctionMetadata {
	pub fn of(callable: &dyn Callable) -> Self {
		let signature = callable.signature();
		Self {
			name: callable.name().to_string(),
			doc: callable.doc().map(str::to_string),
			parameters: signature.clone(),
			display: format!("{}{signature}", callable.name()),
		}
	}
}
