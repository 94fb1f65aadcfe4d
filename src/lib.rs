//! # serde_argv
//!
//! Encode typed configuration into command-line arguments.
//!
//! `serde_argv` turns structured Rust values into the flat `Vec<String>` that
//! process-launching APIs consume. Struct fields carry a small directive
//! grammar that says how each field becomes flags and values, so the mapping
//! from configuration to argv lives next to the type instead of in ad hoc
//! builder code.
//!
//! ## Key Features
//!
//! - **Declarative**: `#[args("--flag=,omitempty")]` on a field describes its encoding
//! - **Serde Compatible**: Any `Serialize` value can be encoded; plain records walk their fields
//! - **Self-Describing Values**: Implement [`ToArgs`] to take full control of a type's tokens
//! - **Context Aware**: A [`Context`] reaches every producer, so scoped resources can be cleaned up
//! - **No Unsafe Code**: Written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_argv = "0.1"
//! ```
//!
//! ```rust
//! use serde_argv::{to_args, Context, ToArgs};
//!
//! #[derive(ToArgs)]
//! pub struct Run {
//!     #[args("--name=,omitempty")]
//!     pub name: String,
//!     #[args("true=--rm")]
//!     pub remove: bool,
//!     #[args("--env")]
//!     pub env: Vec<String>,
//!     pub image: String,
//!     pub command: Vec<String>,
//! }
//!
//! let run = Run {
//!     name: String::new(),
//!     remove: true,
//!     env: vec!["A=1".to_string()],
//!     image: "alpine".to_string(),
//!     command: vec!["echo".to_string(), "hi".to_string()],
//! };
//!
//! let args = to_args(&Context::background(), &run).unwrap();
//! assert_eq!(args, vec!["--rm", "--env", "A=1", "alpine", "echo", "hi"]);
//! ```
//!
//! ## Directive Grammar
//!
//! See [`spec`] for the full grammar. In short: a leading `--flag` is emitted
//! before the value, `--flag=` folds the value into the flag, `omitempty`
//! skips empty values, `join` joins multiple values with `,`, `true=`/`false=`
//! replace booleans, and `-` drops the field.
//!
//! ## Plain Serde Records
//!
//! Records that only derive `Serialize` are walked with the empty directive
//! for every field:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_argv::{to_args, Context};
//!
//! #[derive(Serialize)]
//! struct CopyFile {
//!     from: String,
//!     to: String,
//! }
//!
//! let copy = CopyFile { from: "a.txt".into(), to: "b.txt".into() };
//! assert_eq!(to_args(&Context::background(), &copy).unwrap(), vec!["a.txt", "b.txt"]);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Every failure is returned as an [`Error`]; field failures carry the field path
//! - No panics in public API

extern crate self as serde_argv;

pub mod apply;
pub mod args;
pub mod context;
pub mod error;
pub mod macros;
pub mod options;
mod scope;
pub mod ser;
pub mod spec;
pub mod walk;
pub mod zero;

pub use args::{serialize_args, ArgsFn, ToArgs};
pub use context::{CancelGuard, Context};
pub use error::{Error, Result};
pub use options::ArgsOptions;
pub use ser::Serializer;
pub use spec::FieldSpec;
pub use walk::StructWalker;

/// Derives [`ToArgs`] and `Serialize` for a struct.
///
/// Every field with `pub` visibility (including `pub(crate)` and friends) is
/// walked in declaration order; private fields are skipped. A field's
/// directive comes from `#[args("...")]` and defaults to the empty directive.
#[cfg(feature = "derive")]
pub use serde_argv_derive::ToArgs;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

use serde::Serialize;

/// Encode any `T: Serialize` into argv tokens.
///
/// `ctx` is handed to every self-describing value reached during the call.
///
/// # Examples
///
/// ```rust
/// use serde_argv::{to_args, Context};
///
/// let ctx = Context::background();
/// assert_eq!(to_args(&ctx, &vec![Some("head"), None, Some("tail")]).unwrap(), vec!["head", "tail"]);
/// assert!(to_args(&ctx, &()).unwrap().is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if the value has no argv encoding (maps, byte strings, ...), or
/// if a field or self-describing value fails. Errors raised by a [`ToArgs`]
/// implementation are returned unchanged.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_args<T>(ctx: &Context, value: &T) -> Result<Vec<String>>
where
    T: ?Sized + Serialize,
{
    to_args_with_options(ctx, value, ArgsOptions::default())
}

/// Encode any `T: Serialize` into argv tokens with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_argv::{to_args_with_options, ArgsOptions, Context, ToArgs};
///
/// #[derive(ToArgs)]
/// pub struct Labels {
///     #[args("--labels,join")]
///     pub labels: Vec<String>,
/// }
///
/// let labels = Labels { labels: vec!["a".into(), "b".into()] };
/// let options = ArgsOptions::new().with_join_separator(";");
/// let args = to_args_with_options(&Context::background(), &labels, options).unwrap();
/// assert_eq!(args, vec!["--labels", "a;b"]);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_args_with_options<T>(ctx: &Context, value: &T, options: ArgsOptions) -> Result<Vec<String>>
where
    T: ?Sized + Serialize,
{
    ser::encode(ctx, &options, value)
}
