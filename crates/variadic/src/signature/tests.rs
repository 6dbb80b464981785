use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn full() -> ParameterSpec {
	ParameterSpec::builder()
		.positional("a")
		.positional_with_default("b", 1)
		.rest("xs")
		.keyword("c")
		.keyword_with_default("sep", " ")
		.var_keyword("extra")
		.build()
		.unwrap()
}

#[test]
fn display_renders_every_marker() {
	assert_eq!(full().to_string(), r#"(a, b=1, *xs, c, sep=" ", **extra)"#);
}

#[test]
fn display_inserts_bare_star_without_rest() {
	let spec = ParameterSpec::builder().positional("a").keyword("k").build().unwrap();
	assert_eq!(spec.to_string(), "(a, *, k)");
	let spec = ParameterSpec::builder().keyword("k").build().unwrap();
	assert_eq!(spec.to_string(), "(*, k)");
	assert_eq!(ParameterSpec::default().to_string(), "()");
}

#[test]
fn accessors_follow_declaration_order() {
	let spec = full();
	let positional: Vec<_> = spec.positional().map(Parameter::name).collect();
	assert_eq!(positional, vec!["a", "b"]);
	let keyword: Vec<_> = spec.keyword_only().map(Parameter::name).collect();
	assert_eq!(keyword, vec!["c", "sep"]);
	assert_eq!(spec.positional_count(), 2);
	assert_eq!(spec.rest(), Some("xs"));
	assert_eq!(spec.var_keyword(), Some("extra"));
	assert_eq!(spec.get("b").and_then(Parameter::default), Some(&Value::Int(1)));
	assert!(spec.get("a").unwrap().is_required());
	assert!(!spec.get("xs").unwrap().is_required());
	assert!(!spec.get("sep").unwrap().is_required());
}

#[rstest]
#[case::duplicate(ParameterSpec::builder().positional("a").rest("a"), "duplicate parameter `a`")]
#[case::empty_name(ParameterSpec::builder().positional(""), "parameter names must not be empty")]
#[case::required_after_default(
	ParameterSpec::builder().positional_with_default("a", 0).positional("b"),
	"non-default parameter `b` follows default parameter"
)]
#[case::positional_after_rest(
	ParameterSpec::builder().rest("xs").positional("a"),
	"positional parameter `a` follows keyword-only parameters"
)]
#[case::second_rest(
	ParameterSpec::builder().rest("xs").rest("ys"),
	"variadic parameter `ys` after keyword-only or variadic parameters"
)]
#[case::after_var_keyword(
	ParameterSpec::builder().var_keyword("kw").keyword("k"),
	"parameter `k` follows the variadic keyword parameter"
)]
fn builder_rejects_invalid_orderings(#[case] builder: SignatureBuilder, #[case] message: &str) {
	assert_eq!(builder.build().unwrap_err(), WrapError::InvalidSignature(message.to_string()));
}

#[test]
fn keyword_only_parameters_may_be_required_after_defaults() {
	let spec = ParameterSpec::builder()
		.positional_with_default("a", 0)
		.rest("xs")
		.keyword("k")
		.build()
		.unwrap();
	assert_eq!(spec.to_string(), "(a=0, *xs, k)");
}

#[test]
fn serializes_for_tooling() {
	let json = serde_json::to_value(full()).unwrap();
	assert_eq!(
		json,
		serde_json::json!([
			{ "name": "a", "kind": "positional" },
			{ "name": "b", "kind": "positional", "default": 1 },
			{ "name": "xs", "kind": "rest" },
			{ "name": "c", "kind": "keyword" },
			{ "name": "sep", "kind": "keyword", "default": " " },
			{ "name": "extra", "kind": "var_keyword" }
		])
	);
}
