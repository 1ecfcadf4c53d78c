//! Handler-related macros.
//!
//! This module contains:
//! - `#[handler]` - Attribute macro turning an async fn into a `Handler` unit struct

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemFn, LitStr, Token, Type, parse::Parse, parse_macro_input};

/// Arguments for the `#[handler]` macro.
pub(crate) struct HandlerArgs {
    pub name: Option<String>,
}

impl Parse for HandlerArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(HandlerArgs { name })
    }
}

/// Implementation of the `#[handler]` macro.
pub fn handler_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let mut input = parse_macro_input!(item as ItemFn);

    let fn_name = input.sig.ident.clone();
    let fn_vis = input.vis.clone();

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(input.sig.fn_token, "Handler function must be async")
            .to_compile_error()
            .into();
    }

    if !input.sig.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.sig.generics,
            "Handler function must not be generic",
        )
        .to_compile_error()
        .into();
    }

    let inputs = &input.sig.inputs;
    if inputs.len() > 2 {
        return syn::Error::new_spanned(
            inputs,
            "Handler function takes at most two arguments: fn(req: &Request, ctx: &mut Context)",
        )
        .to_compile_error()
        .into();
    }

    for (i, arg) in inputs.iter().enumerate() {
        let FnArg::Typed(pat_type) = arg else {
            return syn::Error::new_spanned(arg, "Handler function must be a free function")
                .to_compile_error()
                .into();
        };
        let Type::Reference(type_ref) = &*pat_type.ty else {
            let expected = if i == 0 { "&Request" } else { "&mut Context" };
            return syn::Error::new_spanned(
                &pat_type.ty,
                format!("Handler argument must be a reference ({expected})"),
            )
            .to_compile_error()
            .into();
        };
        if i == 1 && type_ref.mutability.is_none() {
            return syn::Error::new_spanned(
                &pat_type.ty,
                "Handler context argument must be a mutable reference (&mut Context)",
            )
            .to_compile_error()
            .into();
        }
    }

    let struct_name = if let Some(ref custom_name) = args.name {
        Ident::new(custom_name, fn_name.span())
    } else {
        fn_name.clone()
    };

    let call_args = match inputs.len() {
        0 => quote! {},
        1 => quote! { __req },
        _ => quote! { __req, __ctx },
    };

    // Docs go on the struct; everything else stays on the wrapped fn.
    let (docs, attrs): (Vec<_>, Vec<_>) = input
        .attrs
        .drain(..)
        .partition(|attr| attr.path().is_ident("doc"));
    input.attrs = attrs;
    input.vis = syn::Visibility::Inherited;
    let inner = format_ident!("__{}_inner", fn_name);
    input.sig.ident = inner.clone();

    let expanded = quote! {
        #(#docs)*
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #fn_vis struct #struct_name;

        impl ::wicket::Handler for #struct_name {
            async fn handle(
                &self,
                __req: &::wicket::Request,
                __ctx: &mut ::wicket::Context,
            ) -> ::core::result::Result<::wicket::Outcome, ::wicket::BoxError> {
                #input

                ::wicket::IntoOutcome::into_outcome(#inner(#call_args).await)
            }
        }
    };

    TokenStream::from(expanded)
}
