//! Parsing of `#[memoized(...)]` options.

use proc_macro2::TokenStream as TokenStream2;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Lit, MetaNameValue, Token};

/// Where the private store of a memoized function lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Global,
    ThreadLocal,
}

/// Parsed attribute options.
pub struct MemoAttributes {
    pub cache: Option<Expr>,
    pub scope: Scope,
    pub name: Option<String>,
}

impl Default for MemoAttributes {
    fn default() -> Self {
        Self {
            cache: None,
            scope: Scope::Global,
            name: None,
        }
    }
}

fn string_literal(nv: &MetaNameValue, option: &str) -> syn::Result<String> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Ok(s.value()),
            other => Err(syn::Error::new_spanned(
                other,
                format!("invalid literal for `{}`: expected a string", option),
            )),
        },
        other => Err(syn::Error::new_spanned(
            other,
            format!("invalid syntax for `{}`: expected `{} = \"...\"`", option, option),
        )),
    }
}

fn parse_scope(nv: &MetaNameValue) -> syn::Result<Scope> {
    match string_literal(nv, "scope")?.as_str() {
        "global" => Ok(Scope::Global),
        "thread" => Ok(Scope::ThreadLocal),
        _ => Err(syn::Error::new_spanned(
            &nv.value,
            "invalid scope: expected \"global\" or \"thread\"",
        )),
    }
}

fn parse_name(nv: &MetaNameValue) -> syn::Result<String> {
    let name = string_literal(nv, "name")?;
    if name.is_empty() {
        return Err(syn::Error::new_spanned(&nv.value, "`name` must not be empty"));
    }
    Ok(name)
}

/// Parses `key = value, ...`. An empty stream is the bare `#[memoized]`.
pub fn parse_attributes(attr: TokenStream2) -> syn::Result<MemoAttributes> {
    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed = parser.parse2(attr)?;

    let mut attrs = MemoAttributes::default();
    let mut scope_given = false;

    for nv in parsed {
        if nv.path.is_ident("cache") {
            attrs.cache = Some(nv.value);
        } else if nv.path.is_ident("scope") {
            attrs.scope = parse_scope(&nv)?;
            scope_given = true;
        } else if nv.path.is_ident("name") {
            attrs.name = Some(parse_name(&nv)?);
        } else {
            return Err(syn::Error::new_spanned(
                &nv.path,
                "unknown option: expected `cache`, `scope` or `name`",
            ));
        }
    }

    if scope_given {
        if let Some(cache) = &attrs.cache {
            return Err(syn::Error::new_spanned(
                cache,
                "`scope` and `cache` cannot be combined: the supplied store decides the scope",
            ));
        }
    }

    Ok(attrs)
}
