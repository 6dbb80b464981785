//! `#[variadic(...)]` expansion.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, FnArg, Ident, ItemFn, Lit, Meta, Pat, Token, Type, parse_macro_input};

/// Role of a parameter, derived from its declared type and position.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
	Positional,
	Rest,
	Keyword,
	VarKeyword,
}

struct Param {
	/// Local the bound value is moved into before calling the body.
	binding: Ident,
	name: String,
	pat: Box<Pat>,
	ty: Box<Type>,
	attrs: Vec<Attribute>,
	default: Option<Expr>,
	slot: Slot,
}

/// Entry point for the `#[variadic(...)]` attribute.
pub fn variadic(attr: TokenStream, item: TokenStream) -> TokenStream {
	let element_types = parse_macro_input!(attr with Punctuated::<Ident, Token![,]>::parse_terminated);
	let item = parse_macro_input!(item as ItemFn);

	match expand(&element_types, &item) {
		Ok(tokens) => tokens.into(),
		Err(e) => e.to_compile_error().into(),
	}
}

fn expand(element_types: &Punctuated<Ident, Token![,]>, item: &ItemFn) -> syn::Result<TokenStream2> {
	if element_types.is_empty() {
		return Err(syn::Error::new(Span::call_site(), "expected element types, e.g. #[variadic(Int)]"));
	}

	let sig = &item.sig;
	if let Some(asyncness) = &sig.asyncness {
		return Err(syn::Error::new_spanned(asyncness, "variadic functions cannot be async"));
	}
	if !sig.generics.params.is_empty() {
		return Err(syn::Error::new_spanned(&sig.generics, "variadic functions cannot be generic"));
	}

	let params = parse_params(item)?;
	if !params.iter().any(|p| p.slot == Slot::Rest) {
		return Err(syn::Error::new_spanned(
			&sig.ident,
			format!("cannot wrap `{}`: no variadic positional parameter (add a `RestArgs` parameter)", sig.ident),
		));
	}

	let vis = &item.vis;
	let ident = &sig.ident;
	let name = ident.unraw().to_string();
	let output = &sig.output;
	let block = &item.block;
	let attrs = &item.attrs;

	let element_type = element_type_tokens(element_types);

	let inner_params = params.iter().map(|p| {
		let attrs = &p.attrs;
		let pat = &p.pat;
		let ty = &p.ty;
		quote! { #(#attrs)* #pat: #ty }
	});

	let builder_calls = params.iter().map(|p| {
		let name = &p.name;
		match (p.slot, &p.default) {
			(Slot::Positional, None) => quote! { .positional(#name) },
			(Slot::Positional, Some(default)) => quote! { .positional_with_default(#name, #default) },
			(Slot::Rest, _) => quote! { .rest(#name) },
			(Slot::Keyword, None) => quote! { .keyword(#name) },
			(Slot::Keyword, Some(default)) => quote! { .keyword_with_default(#name, #default) },
			(Slot::VarKeyword, _) => quote! { .var_keyword(#name) },
		}
	});

	let extractions = params.iter().map(|p| {
		let binding = &p.binding;
		let name = &p.name;
		match p.slot {
			Slot::Positional | Slot::Keyword => quote! { let #binding = __args.take(#name)?; },
			Slot::Rest => quote! { let #binding = __args.take_rest(); },
			Slot::VarKeyword => quote! { let #binding = __args.take_extra_keywords(); },
		}
	});

	let bindings = params.iter().map(|p| &p.binding);

	let with_doc = doc_string(attrs).map(|doc| quote! { .with_doc(#doc) });

	Ok(quote! {
		#(#attrs)*
		#vis fn #ident() -> ::core::result::Result<::variadic::WrappedFunction, ::variadic::WrapError> {
			#[allow(clippy::too_many_arguments)]
			fn __variadic_body(#(#inner_params),*) #output #block

			let signature = ::variadic::ParameterSpec::builder()
				#(#builder_calls)*
				.build()?;
			let function = ::variadic::Function::new(#name, signature, |mut __args: ::variadic::Arguments| {
				#(#extractions)*
				__variadic_body(#(#bindings),*)
			})
			#with_doc;
			::variadic::Variadic::new(#element_type).wrap(function)
		}
	})
}

fn parse_params(item: &ItemFn) -> syn::Result<Vec<Param>> {
	let inputs = &item.sig.inputs;
	let mut params = Vec::with_capacity(inputs.len());
	let mut seen_rest = false;

	for (index, input) in inputs.iter().enumerate() {
		let FnArg::Typed(arg) = input else {
			return Err(syn::Error::new_spanned(input, "variadic functions cannot take `self`"));
		};
		let Pat::Ident(pat_ident) = &*arg.pat else {
			return Err(syn::Error::new_spanned(&arg.pat, "parameters must be plain identifiers"));
		};

		let slot = match type_name(&arg.ty).as_deref() {
			Some("RestArgs") if seen_rest => {
				return Err(syn::Error::new_spanned(&arg.ty, "only one `RestArgs` parameter is allowed"));
			}
			Some("RestArgs") => {
				seen_rest = true;
				Slot::Rest
			}
			Some("Keywords") if index + 1 != inputs.len() => {
				return Err(syn::Error::new_spanned(&arg.ty, "the `Keywords` parameter must come last"));
			}
			Some("Keywords") => Slot::VarKeyword,
			Some("Value") if seen_rest => Slot::Keyword,
			Some("Value") => Slot::Positional,
			_ => {
				return Err(syn::Error::new_spanned(&arg.ty, "parameters must be `Value`, `RestArgs` or `Keywords`"));
			}
		};

		let mut default = None;
		let mut attrs = Vec::new();
		for attr in &arg.attrs {
			if !attr.path().is_ident("default") {
				attrs.push(attr.clone());
				continue;
			}
			if !matches!(slot, Slot::Positional | Slot::Keyword) {
				return Err(syn::Error::new_spanned(attr, "only `Value` parameters take a default"));
			}
			default = Some(attr.parse_args::<Expr>()?);
		}

		params.push(Param {
			binding: format_ident!("__variadic_arg_{}", index),
			name: pat_ident.ident.unraw().to_string(),
			pat: arg.pat.clone(),
			ty: arg.ty.clone(),
			attrs,
			default,
			slot,
		});
	}

	Ok(params)
}

/// Last path segment of a plain type path, e.g. `RestArgs` for `variadic::RestArgs`.
fn type_name(ty: &Type) -> Option<String> {
	let Type::Path(path) = ty else {
		return None;
	};
	if path.qself.is_some() {
		return None;
	}
	path.path.segments.last().map(|segment| segment.ident.to_string())
}

fn element_type_tokens(element_types: &Punctuated<Ident, Token![,]>) -> TokenStream2 {
	if element_types.iter().any(|ty| ty == "Any") {
		return quote! { ::variadic::ElementType::Any };
	}
	let types = element_types.iter();
	quote! { ::variadic::ElementType::one_of([#(::variadic::ValueType::#types),*]) }
}

/// Joins `///` lines, dropping the single leading space rustdoc inserts.
fn doc_string(attrs: &[Attribute]) -> Option<String> {
	let lines = attrs
		.iter()
		.filter_map(|attr| {
			if !attr.path().is_ident("doc") {
				return None;
			}
			let Meta::NameValue(meta) = &attr.meta else {
				return None;
			};
			let Expr::Lit(expr) = &meta.value else {
				return None;
			};
			let Lit::Str(lit) = &expr.lit else {
				return None;
			};
			let line = lit.value();
			Some(line.strip_prefix(' ').map(str::to_string).unwrap_or(line))
		})
		.collect::<Vec<_>>();

	let doc = lines.join("\n").trim().to_string();
	(!doc.is_empty()).then_some(doc)
}
