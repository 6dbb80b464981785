//! Behavioural properties of flattening wrappers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use variadic::{CallArguments, CallError, Callable, Function, ParameterSpec, Value, ValueStream, ValueType, WrapError, WrappedFunction, variadic};

/// `(*xs)` returning the list it received.
fn collect() -> Function {
	let spec = ParameterSpec::builder().rest("xs").build().unwrap();
	Function::new("collect", spec, |mut args| Ok(Value::List(args.take_rest().collect_values()?)))
}

fn wrapped_collect() -> WrappedFunction {
	variadic(ValueType::Int).wrap(collect()).unwrap()
}

fn ints(values: &[i64]) -> Value {
	Value::list(values.iter().copied())
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
		.try_init();
}

#[test]
fn documented_example() {
	init_tracing();
	let args = CallArguments::new().arg(1).arg(2).arg(Value::list([3, 4])).arg(Value::range(5, 8));
	assert_eq!(wrapped_collect().call(args), Ok(ints(&[1, 2, 3, 4, 5, 6, 7])));
}

#[test]
fn empty_iterable_is_neutral() {
	let args = CallArguments::new().arg(1).arg(Value::List(vec![])).arg(2);
	assert_eq!(wrapped_collect().call(args), Ok(ints(&[1, 2])));
}

#[test]
fn lazy_body_stops_reading_an_infinite_argument() {
	let pulled = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&pulled);
	let naturals = ValueStream::new((0..).map(move |i| {
		counter.fetch_add(1, Ordering::SeqCst);
		Value::Int(i)
	}));

	let spec = ParameterSpec::builder().positional("n").rest("xs").build().unwrap();
	let take = Function::new("take", spec, |mut args| {
		let n = usize::try_from(args.take("n")?.as_int()?).map_err(|e| CallError::raised(e.to_string()))?;
		Ok(Value::List(args.take_rest().take(n).collect::<Result<_, _>>()?))
	});
	let take = variadic(ValueType::Int).wrap(take).unwrap();

	let out = take.call(CallArguments::new().arg(3).arg(-1).arg(Value::Stream(naturals)).arg(100));
	assert_eq!(out, Ok(ints(&[-1, 0, 1])));
	assert_eq!(pulled.load(Ordering::SeqCst), 2);
}

#[test]
fn unbounded_range_with_lazy_body() {
	let spec = ParameterSpec::builder().rest("xs").build().unwrap();
	let first_three = Function::new("first_three", spec, |mut args| {
		Ok(Value::List(args.take_rest().take(3).collect::<Result<_, _>>()?))
	});
	let first_three = variadic(ValueType::Int).wrap(first_three).unwrap();
	assert_eq!(first_three.call(CallArguments::new().arg(Value::range_from(7))), Ok(ints(&[7, 8, 9])));
}

#[test]
fn keyword_arguments_are_not_flattened() {
	let spec = ParameterSpec::builder().rest("xs").keyword("opts").var_keyword("extra").build().unwrap();
	let f = Function::new("f", spec, |mut args| {
		let opts = args.take("opts")?;
		let extra = args.extra_keywords().get("more").cloned().unwrap_or(Value::Nothing);
		Ok(Value::list([opts, extra]))
	});
	let f = variadic(ValueType::Int).wrap(f).unwrap();
	let args = CallArguments::new().kwarg("opts", Value::list([1, 2])).kwarg("more", Value::range(0, 2));
	assert_eq!(f.call(args), Ok(Value::list([Value::list([1, 2]), Value::range(0, 2)])));
}

#[test]
fn arity_errors_come_from_the_original_binding() {
	let spec = ParameterSpec::builder().positional("a").positional("b").rest("xs").build().unwrap();
	let original = Function::new("pair", spec, |_| Ok(Value::Nothing));
	let wrapped = variadic(ValueType::Int).wrap(original.clone()).unwrap();
	let args = CallArguments::new().arg(Value::list([1, 2]));
	assert_eq!(wrapped.call(args.clone()), original.call(args));
	assert_eq!(
		wrapped.call(CallArguments::new().arg(1)),
		Err(CallError::MissingArgument {
			function: "pair".into(),
			name: "b".into()
		})
	);
}

#[test]
fn prefix_values_are_never_flattened() {
	let spec = ParameterSpec::builder().positional("head").rest("xs").build().unwrap();
	let f = Function::new("f", spec, |mut args| Ok(Value::list([args.take("head")?, Value::List(args.take_rest().collect_values()?)])));
	let f = variadic(ValueType::Int).wrap(f).unwrap();
	let out = f.call(CallArguments::new().arg(Value::list([1, 2])).arg(Value::list([3, 4])));
	assert_eq!(out, Ok(Value::list([ints(&[1, 2]), ints(&[3, 4])])));
}

#[test]
fn errors_from_the_body_and_iterables_are_untouched() {
	let failing = ValueStream::fallible(vec![Ok(Value::Int(1)), Err(CallError::raised("generator failed"))]);
	assert_eq!(
		wrapped_collect().call(CallArguments::new().arg(Value::Stream(failing))),
		Err(CallError::raised("generator failed"))
	);

	let spec = ParameterSpec::builder().rest("xs").build().unwrap();
	let sum = Function::new("sum", spec, |mut args| {
		let mut total = 0;
		for x in args.take_rest() {
			total += x?.as_int()?;
		}
		Ok(Value::Int(total))
	});
	let sum = variadic(ValueType::Int).wrap(sum).unwrap();
	let err = sum.call(CallArguments::new().arg(Value::list([Value::Int(1), Value::string("x")]))).unwrap_err();
	assert_eq!(err.to_string(), "expected int, got string");
}

#[test]
fn string_elements_stay_whole() {
	let spec = ParameterSpec::builder().rest("words").build().unwrap();
	let join = Function::new("join", spec, |mut args| {
		let words = args
			.take_rest()
			.map(|w| w.and_then(|w| Ok(w.as_str()?.to_string())))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Value::string(words.join(" ")))
	});
	let join = variadic(ValueType::String).wrap(join).unwrap();
	let args = CallArguments::new().arg("hello").arg(Value::list(["big", "wide"])).arg("world");
	assert_eq!(join.call(args), Ok(Value::string("hello big wide world")));
}

#[test]
fn wrapping_without_rest_slot_fails() {
	let spec = ParameterSpec::builder().positional("x").positional_with_default("y", 0).build().unwrap();
	let err = variadic(ValueType::Int).wrap(Function::new("g", spec, |_| Ok(Value::Nothing))).unwrap_err();
	assert_eq!(err.to_string(), "cannot wrap `g(x, y=0)`: no variadic positional parameter");
	assert!(matches!(err, WrapError::UnsupportedSignature { .. }));
}

#[test]
fn concurrent_calls_share_one_wrapper() {
	let wrapped = Arc::new(wrapped_collect());
	let handles: Vec<_> = (0..4)
		.map(|i| {
			let wrapped = Arc::clone(&wrapped);
			std::thread::spawn(move || wrapped.call(CallArguments::new().arg(i).arg(Value::range(0, i))))
		})
		.collect();
	for (i, handle) in handles.into_iter().enumerate() {
		let i = i as i64;
		let mut expected = vec![i];
		expected.extend(0..i);
		assert_eq!(handle.join().unwrap(), Ok(ints(&expected)));
	}
}

fn arb_signature() -> impl Strategy<Value = ParameterSpec> {
	(0usize..3, 0usize..3, 0usize..3, any::<bool>()).prop_map(|(required, defaulted, keyword, var_keyword)| {
		let mut builder = ParameterSpec::builder();
		for i in 0..required {
			builder = builder.positional(format!("p{i}"));
		}
		for i in 0..defaulted {
			builder = builder.positional_with_default(format!("d{i}"), i as i64);
		}
		builder = builder.rest("xs");
		for i in 0..keyword {
			builder = builder.keyword_with_default(format!("k{i}"), "v");
		}
		if var_keyword {
			builder = builder.var_keyword("extra");
		}
		builder.build().unwrap()
	})
}

#[derive(Debug, Clone)]
enum Arg {
	Scalar(i64),
	List(Vec<i64>),
	Range(i64, i64),
	Stream(Vec<i64>),
}

impl Arg {
	fn to_value(&self) -> Value {
		match self {
			Self::Scalar(n) => Value::Int(*n),
			Self::List(items) => ints(items),
			Self::Range(start, end) => Value::range(*start, *end),
			Self::Stream(items) => Value::stream(items.iter().copied().map(Value::Int).collect::<Vec<_>>()),
		}
	}

	fn expand(&self) -> Vec<i64> {
		match self {
			Self::Scalar(n) => vec![*n],
			Self::List(items) | Self::Stream(items) => items.clone(),
			Self::Range(start, end) => (*start..*end).collect(),
		}
	}
}

fn arb_arg() -> impl Strategy<Value = Arg> {
	prop_oneof![
		any::<i64>().prop_map(Arg::Scalar),
		prop::collection::vec(any::<i64>(), 0..4).prop_map(Arg::List),
		(-5i64..5, -5i64..5).prop_map(|(a, b)| Arg::Range(a, b)),
		prop::collection::vec(any::<i64>(), 0..4).prop_map(Arg::Stream),
	]
}

proptest! {
	/// The wrapper reports exactly the original parameter list.
	#[test]
	fn prop_signature_is_preserved(spec in arb_signature()) {
		let original = Function::new("f", spec.clone(), |_| Ok(Value::Nothing));
		let wrapped = variadic(ValueType::Int).wrap(original.clone()).unwrap();
		prop_assert_eq!(wrapped.signature(), original.signature());
		prop_assert_eq!(wrapped.signature().to_string(), spec.to_string());
		prop_assert_eq!(wrapped.name(), original.name());
	}

	/// Wrapped calls equal calls with the arguments flattened by hand.
	#[test]
	fn prop_flattening_matches_manual_expansion(args in prop::collection::vec(arb_arg(), 0..6)) {
		let call: CallArguments = args.iter().map(Arg::to_value).collect();
		let manual: CallArguments = args.iter().flat_map(Arg::expand).collect();
		let expected = collect().call(manual);
		prop_assert_eq!(wrapped_collect().call(call), expected);
	}
}
