//! Derive macro for serde_argv
//!
//! This crate provides `#[derive(ToArgs)]`. Use it through the `serde_argv`
//! re-export; the generated code refers to `::serde_argv`.

use proc_macro::TokenStream;

mod to_args;

/// Derive `ToArgs` and `Serialize` for a struct.
///
/// Fields with any `pub` visibility are encoded in declaration order.
/// Private fields are skipped.
///
/// **Important:** Do NOT also derive `Serialize`; ToArgs generates it.
///
/// # Attributes
///
/// - `#[args("...")]` - The field's directive, e.g. `"--name="` or `"true=--force,omitempty"`
///
/// # Example
///
/// ```ignore
/// #[derive(ToArgs)]
/// pub struct Clone {
///     #[args("--depth=,omitempty")]
///     pub depth: u32,
///     pub url: String,
/// }
/// ```
#[proc_macro_derive(ToArgs, attributes(args))]
pub fn derive_to_args(input: TokenStream) -> TokenStream {
    to_args::derive_to_args_impl(input)
}
