/// Implements `Serialize` for hand-written [`ToArgs`](crate::ToArgs) types.
///
/// The generated impl routes through [`serialize_args`](crate::serialize_args),
/// so the type's own tokens take precedence over its fields wherever it is
/// dispatched: at the top level, inside `Option`, or as a struct field.
///
/// ```rust
/// use serde_argv::{serialize_via_args, to_args, Context, Result, ToArgs};
///
/// struct Mount {
///     source: String,
///     target: String,
/// }
///
/// impl ToArgs for Mount {
///     fn to_args(&self, _ctx: &Context) -> Result<Vec<String>> {
///         Ok(vec!["-v".to_string(), format!("{}:{}", self.source, self.target)])
///     }
/// }
///
/// serialize_via_args!(Mount);
///
/// let mount = Mount { source: "/src".into(), target: "/app".into() };
/// let args = to_args(&Context::background(), &Some(mount)).unwrap();
/// assert_eq!(args, vec!["-v", "/src:/app"]);
/// ```
///
/// Several types can be listed at once: `serialize_via_args!(A, B, C);`.
#[macro_export]
macro_rules! serialize_via_args {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::__private::serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                where
                    S: $crate::__private::serde::Serializer,
                {
                    $crate::serialize_args(self, serializer)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::{to_args, Context, Error, Result, ToArgs};

    struct Repeat(&'static str, usize);

    struct Fails;

    impl ToArgs for Repeat {
        fn to_args(&self, _ctx: &Context) -> Result<Vec<String>> {
            Ok(vec![self.0.to_string(); self.1])
        }

        fn is_empty(&self) -> bool {
            self.1 == 0
        }
    }

    impl ToArgs for Fails {
        fn to_args(&self, _ctx: &Context) -> Result<Vec<String>> {
            Err(Error::Io("disk full".to_string()))
        }
    }

    serialize_via_args!(Repeat, Fails,);

    #[test]
    fn test_serialize_via_args_tokens() {
        let ctx = Context::background();
        assert_eq!(to_args(&ctx, &Repeat("-v", 3)).unwrap(), vec!["-v", "-v", "-v"]);
        assert!(to_args(&ctx, &Repeat("-v", 0)).unwrap().is_empty());
    }

    #[test]
    fn test_serialize_via_args_error_is_returned_unchanged() {
        let err = to_args(&Context::background(), &Fails).unwrap_err();
        assert!(matches!(err, Error::Io(ref msg) if msg == "disk full"));
    }
}
