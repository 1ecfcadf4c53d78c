//! Procedural macros for wicket.

use proc_macro::TokenStream;

mod handler;

/// Turn an async function into a `Handler`.
///
/// The function may take no arguments, the request (`&Request`), or the
/// request and the context (`&Request, &mut Context`). Its return value is
/// converted with `IntoOutcome`, so `()`, `&'static str`, `Response`,
/// `Option<_>` and `Result<_, _>` all work.
///
/// The function is replaced by a unit struct of the same name, which can be
/// registered directly:
///
/// ```rust,ignore
/// use wicket::{Context, Request, handler};
///
/// #[handler]
/// async fn show_item(_req: &Request, ctx: &mut Context) -> String {
///     format!("item {}", ctx.params().get("id").unwrap_or("?"))
/// }
///
/// builder.get("/items/:id", show_item)?;
/// ```
///
/// Use `#[handler(name = "ShowItem")]` to pick a different struct name.
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::handler_impl(attr, item)
}
