//! Very-variadic functions.
//!
//! Wraps a function that declares a variadic positional ("rest") parameter so
//! that callers may pass any mix of single elements and iterables of
//! elements; the mix is flattened one level, in order, before the body runs.
//! The wrapper reports the original name, doc and [`ParameterSpec`], so
//! introspection sees the real signature rather than a catch-all.
//!
//! * [`Variadic`] / [`variadic`]: reusable wrapper generator for an element type.
//! * [`WrappedFunction`]: the flattening, signature-preserving callable.
//! * [`classify`](classify::classify) and [`flatten`](flatten::flatten): the
//!   underlying classification and lazy flattening.
//! * `#[variadic(...)]` (feature `macros`): the same wrapping applied to a
//!   plain Rust function, with its signature inspected at compile time.

mod args;
pub mod classify;
mod error;
pub mod flatten;
mod function;
pub mod inspect;
mod signature;
mod stream;
mod types;
mod value;
mod wrap;

pub use args::{Arguments, CallArguments, Keywords, RestArgs};
pub use error::{CallError, Result, WrapError};
pub use function::{Callable, Function};
pub use signature::{Parameter, ParameterKind, ParameterSpec, SignatureBuilder};
pub use stream::ValueStream;
pub use types::{ElementType, ElementTypeParseError, ValueType, ValueTypeError};
pub use value::{IntRange, IntRangeIter, Items, Record, Value};
#[cfg(feature = "macros")]
pub use variadic_macros::variadic;
pub use wrap::{FunctionMetadata, Variadic, WrappedFunction, variadic};
