//! Procedural macros for the `variadic` crate.
//!
//! Provides the `#[variadic(...)]` attribute, which turns a plain Rust
//! function into a constructor for a flattening, signature-preserving
//! `variadic::WrappedFunction`.

use proc_macro::TokenStream;

/// Attribute macro implementation.
mod variadic;

/// Wraps a function so iterables passed to its variadic slot are flattened.
///
/// The attribute arguments name the element types (variants of
/// `variadic::ValueType`, or `Any`). The function's parameter list is read at
/// compile time:
///
/// * a `RestArgs` parameter is the variadic positional slot (required);
/// * `Value` parameters before it are positional, after it keyword-only;
/// * a trailing `Keywords` parameter collects unknown keywords;
/// * `#[default(expr)]` on a `Value` parameter gives it a default.
///
/// ```ignore
/// /// Sums a start value and any number of ints.
/// #[variadic(Int)]
/// pub fn total(start: Value, xs: RestArgs, #[default(1)] scale: Value) -> Result<Value, CallError> {
///     let mut sum = start.as_int()?;
///     for x in xs {
///         sum += x?.as_int()?;
///     }
///     Ok(Value::Int(sum * scale.as_int()?))
/// }
/// ```
///
/// Generates `pub fn total() -> Result<WrappedFunction, WrapError>` whose
/// result reports the signature `(start, *xs, scale=1)` and the doc comment.
/// A function without a `RestArgs` parameter is rejected at compile time.
#[proc_macro_attribute]
pub fn variadic(attr: TokenStream, item: TokenStream) -> TokenStream {
	variadic::variadic(attr, item)
}
