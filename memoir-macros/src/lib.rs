use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::quote;
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, ReturnType, Type};

mod attributes;

use attributes::{parse_attributes, MemoAttributes, Scope};

/// Generate the statement binding `__memoir_store` to a reference to the store
fn generate_store_binding(
    attrs: &MemoAttributes,
    ret_type: &TokenStream2,
    name: &str,
) -> TokenStream2 {
    if let Some(cache) = &attrs.cache {
        return quote! {
            let __memoir_store = &(#cache);
        };
    }

    match attrs.scope {
        Scope::Global => quote! {
            static __MEMOIR_STORE: ::memoir_core::__private::once_cell::sync::Lazy<
                ::memoir_core::SharedCache<#ret_type>,
            > = ::memoir_core::__private::once_cell::sync::Lazy::new(|| ::memoir_core::SharedCache::new());
            static __MEMOIR_REGISTERED: ::std::sync::atomic::AtomicU64 =
                ::std::sync::atomic::AtomicU64::new(0);
            ::memoir_core::__private::register_stats(#name, &*__MEMOIR_STORE, &__MEMOIR_REGISTERED);
            let __memoir_store = &__MEMOIR_STORE;
        },
        Scope::ThreadLocal => quote! {
            ::std::thread_local! {
                static __MEMOIR_STORE: ::std::cell::RefCell<
                    ::std::collections::HashMap<::memoir_core::CallSignature, #ret_type>,
                > = ::std::cell::RefCell::new(::std::collections::HashMap::new());
            }
            let __memoir_store = &::memoir_core::ThreadLocalCache::new(&__MEMOIR_STORE);
        },
    }
}

/// Generate the signature expression from `self` (if any) and the argument idents
fn generate_signature_expr(has_self: bool, arg_idents: &[&Ident], name: &str) -> TokenStream2 {
    let self_key = if has_self {
        quote! { ::memoir_core::ToKey::to_key(&self), }
    } else {
        quote! {}
    };

    quote! {
        ::memoir_core::CallSignature::from_keys(::std::vec![
            #self_key
            #( ::memoir_core::ToKey::to_key(&#arg_idents), )*
        ])
        .with_namespace(#name)
    }
}

/// `true` if the return type is spelled `Result<..>` (any path ending in `Result`)
fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "Result")
                .unwrap_or(false),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

fn mentions_self_type(tokens: TokenStream2) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => ident == "Self",
        TokenTree::Group(group) => mentions_self_type(group.stream()),
        _ => false,
    })
}

fn expand(attrs: MemoAttributes, input: ItemFn) -> syn::Result<TokenStream2> {
    let fn_attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[memoized] does not support async functions",
        ));
    }
    let generics = &sig.generics;
    if generics.type_params().next().is_some() || generics.const_params().next().is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[memoized] cannot be applied to generic functions: each function needs one concrete cache",
        ));
    }

    let ret_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };
    if attrs.cache.is_none() && mentions_self_type(ret_type.clone()) {
        return Err(syn::Error::new_spanned(
            &sig.output,
            "#[memoized] needs the concrete return type here; spell it out instead of using `Self`",
        ));
    }

    let mut has_self = false;
    let mut arg_idents = Vec::new();
    for arg in sig.inputs.iter() {
        match arg {
            FnArg::Receiver(_) => has_self = true,
            FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) => arg_idents.push(&pat_ident.ident),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "#[memoized] arguments must be plain identifiers",
                    ))
                }
            },
        }
    }

    let name = attrs
        .name
        .clone()
        .unwrap_or_else(|| sig.ident.to_string());

    let store_binding = generate_store_binding(&attrs, &ret_type, &name);
    let signature_expr = generate_signature_expr(has_self, &arg_idents, &name);

    let insert_call = if returns_result(&sig.output) {
        quote! { ::memoir_core::insert_ok(__memoir_store, __memoir_signature, &__memoir_result); }
    } else {
        quote! {
            <_ as ::memoir_core::CacheStore<#ret_type>>::insert(
                __memoir_store,
                __memoir_signature,
                ::std::clone::Clone::clone(&__memoir_result),
            );
        }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #vis #sig {
            #store_binding

            let __memoir_signature = #signature_expr;
            if let ::std::option::Option::Some(__memoir_cached) =
                <_ as ::memoir_core::CacheStore<#ret_type>>::get(__memoir_store, &__memoir_signature)
            {
                return __memoir_cached;
            }

            #[allow(clippy::redundant_closure_call)]
            let __memoir_result = (move || -> #ret_type #block)();
            #insert_call
            __memoir_result
        }
    })
}

/// Memoizes a function or method.
///
/// The first call with a given set of arguments runs the body and stores the
/// result; later calls with equal arguments return a clone of the stored
/// result without running the body.
///
/// # Requirements
///
/// - **Arguments** (and `self` for methods) must implement `ToKey`. Only
///   hashable kinds of data do: integers, `bool`, `char`, floats, strings,
///   `Option`s, tuples and references to these. Mutable containers such as
///   `Vec<T>` do not, so they are rejected at compile time.
/// - **Return type** must implement `Clone`.
/// - **Purity**: on a hit the body does not run, so its side effects do not
///   happen either.
///
/// # Options
///
/// - `cache = EXPR`: memoize into an externally supplied store. `EXPR` is
///   evaluated on every call and borrowed, so it is typically a `static`
///   (a `Lazy<SharedCache<T>>` works directly) or a function returning
///   a reference. Several functions may share one store.
/// - `scope = "global" | "thread"`: where the private store lives when no
///   `cache` is given. `"global"` (default) shares one store between all
///   threads; `"thread"` keeps one per thread.
/// - `name = "..."`: namespace of the signatures this function produces and
///   its name in the statistics registry. Defaults to the function name.
///
/// Every signature carries the name, so functions sharing a store keep
/// separate entries even when called with identical arguments.
///
/// # Result-returning functions
///
/// When the return type is a `Result`, only `Ok` values are stored; an
/// `Err` is returned as-is and the next call runs the body again.
///
/// # Limitations
///
/// Without `cache`, the private store is a `static` (or `thread_local!`)
/// declared inside the function, typed by the return type. It therefore
/// cannot mention generic parameters: generic functions are rejected, and
/// a method of `impl<T> Foo<T>` whose return type uses `T` fails with
/// rustc's "can't use generic parameters from outer item". Supply a store
/// with `cache = ...` for such methods. Async functions and destructuring
/// patterns in arguments are rejected as well.
///
/// # Examples
///
/// ```ignore
/// use memoir::memoized;
///
/// #[memoized]
/// fn fibonacci(n: u64) -> u64 {
///     if n < 2 {
///         return n;
///     }
///     fibonacci(n - 1) + fibonacci(n - 2)
/// }
/// ```
///
/// ```ignore
/// use memoir::{memoized, SharedCache};
/// use once_cell::sync::Lazy;
///
/// static LABELS: Lazy<SharedCache<String>> = Lazy::new(SharedCache::new);
///
/// #[memoized(cache = LABELS)]
/// fn user_label(id: u32) -> String {
///     format!("user-{}", id)
/// }
///
/// #[memoized(cache = LABELS)]
/// fn group_label(id: u32) -> String {
///     format!("group-{}", id)
/// }
/// ```
#[proc_macro_attribute]
pub fn memoized(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attrs = match parse_attributes(attr.into()) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };
    let input = parse_macro_input!(item as ItemFn);

    match expand(attrs, input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_returns_result_detection() {
        let plain: ReturnType = parse_quote!(-> u32);
        let result: ReturnType = parse_quote!(-> Result<u32, String>);
        let qualified: ReturnType = parse_quote!(-> std::io::Result<u32>);
        assert!(!returns_result(&plain));
        assert!(returns_result(&result));
        assert!(returns_result(&qualified));
        assert!(!returns_result(&ReturnType::Default));
    }

    #[test]
    fn test_mentions_self_type() {
        assert!(mentions_self_type(quote! { Vec<Self> }));
        assert!(!mentions_self_type(quote! { Vec<String> }));
    }

    #[test]
    fn test_rejects_generic_functions() {
        let input: ItemFn = parse_quote! {
            fn id<T: Clone>(x: T) -> T { x }
        };
        let err = expand(MemoAttributes::default(), input).err().unwrap();
        assert!(err.to_string().contains("generic functions"));
    }

    #[test]
    fn test_rejects_destructured_arguments() {
        let input: ItemFn = parse_quote! {
            fn sum((a, b): (u8, u8)) -> u8 { a + b }
        };
        let err = expand(MemoAttributes::default(), input).err().unwrap();
        assert!(err.to_string().contains("plain identifiers"));
    }

    #[test]
    fn test_expansion_uses_function_name_as_namespace() {
        let input: ItemFn = parse_quote! {
            fn square(x: u32) -> u32 { x * x }
        };
        let expanded = expand(MemoAttributes::default(), input).unwrap().to_string();
        assert!(expanded.contains("with_namespace (\"square\")"));
        assert!(expanded.contains("register_stats"));
    }

    #[test]
    fn test_supplied_store_accepts_outer_generic_return_type() {
        let input: ItemFn = parse_quote! {
            fn first(&self) -> T { self.items[0].clone() }
        };
        let attrs = MemoAttributes {
            cache: Some(parse_quote!(self.store)),
            ..MemoAttributes::default()
        };
        let expanded = expand(attrs, input).unwrap().to_string();
        assert!(!expanded.contains("static"));
    }

    #[test]
    fn test_thread_scope_expansion() {
        let input: ItemFn = parse_quote! {
            fn square(x: u32) -> u32 { x * x }
        };
        let attrs = MemoAttributes {
            scope: Scope::ThreadLocal,
            ..MemoAttributes::default()
        };
        let expanded = expand(attrs, input).unwrap().to_string();
        assert!(expanded.contains("thread_local"));
        assert!(!expanded.contains("register_stats"));
    }
}
