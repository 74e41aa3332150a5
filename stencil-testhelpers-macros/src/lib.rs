use proc_macro2::{Delimiter, Ident, TokenStream, TokenTree};
use quote::quote;

/// Finds the name of the function: the identifier right after `fn`.
fn function_name(tokens: &[TokenTree]) -> Option<Ident> {
    tokens.windows(2).find_map(|pair| match pair {
        [TokenTree::Ident(kw), TokenTree::Ident(name)] if kw == "fn" => Some(name.clone()),
        _ => None,
    })
}

/// Test attribute macro that sets up tracing before running the test.
///
/// The body runs inside a closure returning `Result<(), IPanic>`, so `?`
/// works on any error type and panics at the offending line.
///
/// # Usage
///
/// Basic usage (uses `#[test]`):
/// ```ignore
/// use stencil_testhelpers::test;
///
/// #[test]
/// fn my_test() {
///     let text = core::str::from_utf8(b"[]")?;
///     assert_eq!(text, "[]");
/// }
/// ```
///
/// With a custom test attribute, for harnesses that provide their own:
/// ```ignore
/// #[stencil_testhelpers::test(my_harness::test)]
/// fn my_harness_test() {}
/// ```
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let tokens: Vec<TokenTree> = TokenStream::from(item).into_iter().collect();

    let (signature, body) = match tokens.split_last() {
        Some((TokenTree::Group(body), signature)) if body.delimiter() == Delimiter::Brace => {
            (signature, body.stream())
        }
        _ => {
            return quote! {
                ::core::compile_error!("#[stencil_testhelpers::test] expects a function with a body");
            }
            .into();
        }
    };

    let Some(name) = function_name(signature) else {
        return quote! {
            ::core::compile_error!("#[stencil_testhelpers::test] expects a function");
        }
        .into();
    };
    let name_str = name.to_string();

    // e.g., #[stencil_testhelpers::test(my_harness::test)] -> #[my_harness::test]
    let test_attr = if attr.is_empty() {
        quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote! { #[#attr] }
    };

    quote! {
        #test_attr
        #(#signature)* {
            ::stencil_testhelpers::setup();
            let _span = ::stencil_testhelpers::enter_test_span(#name_str);

            #[allow(unreachable_code, clippy::needless_question_mark)]
            let body = || -> ::core::result::Result<(), ::stencil_testhelpers::IPanic> {
                #body;
                ::core::result::Result::Ok(())
            };
            let _ = body();
        }
    }
    .into()
}
