//! The self-describing capability.
//!
//! A type that implements [`ToArgs`] fully controls its own tokens: the
//! dispatcher never looks at its fields. `#[derive(ToArgs)]` implements it by
//! walking annotated fields; hand-written implementations hook into dispatch
//! with [`serialize_via_args!`](crate::serialize_via_args) or by calling
//! [`serialize_args`] from their own `Serialize` impl.
//!
//! ```rust
//! use serde_argv::{serialize_via_args, to_args, Context, Result, ToArgs};
//!
//! struct Verbosity(u8);
//!
//! impl ToArgs for Verbosity {
//!     fn to_args(&self, _ctx: &Context) -> Result<Vec<String>> {
//!         Ok((0..self.0).map(|_| "-v".to_string()).collect())
//!     }
//! }
//!
//! serialize_via_args!(Verbosity);
//!
//! let args = to_args(&Context::background(), &Verbosity(2)).unwrap();
//! assert_eq!(args, vec!["-v", "-v"]);
//! ```

use crate::scope::{self, Mode};
use crate::{Context, Result};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::fmt;

/// Newtype-struct name marking a self-describing value in the serde data model.
pub(crate) const ARGS_TOKEN: &str = "$serde_argv::private::Args";

/// Produces the argv tokens for a value.
pub trait ToArgs {
    /// Returns this value's tokens.
    ///
    /// `ctx` is the context the caller passed to [`to_args`](crate::to_args).
    /// Producers whose output depends on a scoped resource should register
    /// its cleanup with [`Context::on_cancel`].
    fn to_args(&self, ctx: &Context) -> Result<Vec<String>>;

    /// Answers `omitempty` without producing tokens.
    ///
    /// Defaults to `false`: a producer without an override is never dropped by
    /// `omitempty`, and its fields are not compared against zero values.
    /// Derived records override this with "every walked field is empty".
    fn is_empty(&self) -> bool {
        false
    }
}

/// Serializes a self-describing value.
///
/// Inside [`to_args`](crate::to_args) this calls [`ToArgs::to_args`] with the
/// caller's context and hands the tokens to the dispatcher verbatim. Any other
/// serializer sees a newtype around the token list, produced with
/// [`Context::background`].
pub fn serialize_args<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: ToArgs + ?Sized,
    S: Serializer,
{
    match scope::mode() {
        Some(Mode::Probe) => {
            return serializer.serialize_newtype_struct(ARGS_TOKEN, &value.is_empty());
        }
        Some(Mode::Element) => return serializer.serialize_newtype_struct(ARGS_TOKEN, &()),
        _ => {}
    }

    let ctx = scope::context().unwrap_or_else(Context::background);
    tracing::trace!("dispatching self-describing value");
    match value.to_args(&ctx) {
        Ok(tokens) => serializer.serialize_newtype_struct(ARGS_TOKEN, &tokens),
        Err(err) => Err(S::Error::custom(scope::stash(err))),
    }
}

/// Adapts a closure into a self-describing value.
///
/// ```rust
/// use serde_argv::{to_args, ArgsFn, Context};
///
/// let produce = ArgsFn::new(|_ctx: &Context| Ok(vec!["called".to_string()]));
/// assert_eq!(to_args(&Context::background(), &produce).unwrap(), vec!["called"]);
/// ```
#[derive(Clone, Copy)]
pub struct ArgsFn<F>(pub F);

impl<F> ArgsFn<F>
where
    F: Fn(&Context) -> Result<Vec<String>>,
{
    pub fn new(produce: F) -> Self {
        ArgsFn(produce)
    }
}

impl<F> ToArgs for ArgsFn<F>
where
    F: Fn(&Context) -> Result<Vec<String>>,
{
    fn to_args(&self, ctx: &Context) -> Result<Vec<String>> {
        (self.0)(ctx)
    }
}

impl<F> Serialize for ArgsFn<F>
where
    F: Fn(&Context) -> Result<Vec<String>>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_args(self, serializer)
    }
}

impl<F> fmt::Debug for ArgsFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArgsFn(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;

    #[test]
    fn test_outside_dispatch_serializes_token_list() {
        let produce = ArgsFn::new(|_: &Context| Ok(vec!["--a".to_string(), "b".to_string()]));
        let json = serde_json::to_string(&produce).unwrap();
        assert_eq!(json, r#"["--a","b"]"#);
    }

    #[test]
    fn test_outside_dispatch_error_becomes_custom() {
        let produce = ArgsFn::new(|_: &Context| Err(Error::custom("no tokens today")));
        let err = serde_json::to_string(&produce).unwrap_err();
        assert!(err.to_string().contains("no tokens today"));
    }

    #[test]
    fn test_sequence_elements_never_run_producers() {
        let calls = Cell::new(0);
        let produce = ArgsFn::new(|_: &Context| {
            calls.set(calls.get() + 1);
            Ok(vec!["made".to_string()])
        });

        let err = crate::to_args(&Context::background(), &vec![&produce]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        let err = crate::to_args(&Context::background(), &[Some(&produce)]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert_eq!(calls.get(), 0);

        assert_eq!(crate::to_args(&Context::background(), &produce).unwrap(), vec!["made"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_default_is_empty_is_false() {
        let produce = ArgsFn::new(|_: &Context| Ok(Vec::new()));
        assert!(!produce.is_empty());
    }
}
