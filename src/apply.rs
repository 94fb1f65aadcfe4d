//! Applying a [`FieldSpec`] to a field value.
//!
//! The rules run in a fixed order:
//!
//! 1. `-` drops the field before it is looked at.
//! 2. `omitempty` drops empty values before they are dispatched.
//! 3. The value is dispatched to raw tokens.
//! 4. No tokens means no output, not even the flag.
//! 5. A lone `true`/`false` token is swapped for its configured label.
//! 6. Multiple tokens are joined when a separator is set.
//! 7. `--flag=` folds everything into one prefixed token.
//! 8. Prepend and append tokens wrap the result.

use crate::spec::FieldSpec;
use crate::{ser, zero, ArgsOptions, Context, Result};
use serde::Serialize;

enum BoolSubstitution<'a> {
    Keep,
    Replace(&'a str),
    Suppress,
}

fn label(label: &Option<String>) -> Option<&str> {
    label.as_deref().filter(|label| !label.is_empty())
}

impl FieldSpec {
    /// Encodes `value` under this spec with default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_argv::{Context, FieldSpec};
    ///
    /// let ctx = Context::background();
    /// let spec = FieldSpec::parse("--name=");
    /// assert_eq!(spec.apply(&ctx, &vec!["a", "b"]).unwrap(), vec!["--name=a b"]);
    /// ```
    pub fn apply<T>(&self, ctx: &Context, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        self.apply_with(ctx, &ArgsOptions::default(), value)
    }

    /// Encodes `value` under this spec.
    pub fn apply_with<T>(
        &self,
        ctx: &Context,
        options: &ArgsOptions,
        value: &T,
    ) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        if self.omit_field {
            tracing::debug!("field omitted by directive");
            return Ok(Vec::new());
        }

        if self.omit_if_empty && zero::is_zero(value) {
            tracing::debug!("empty field omitted");
            return Ok(Vec::new());
        }

        let mut tokens = ser::encode(ctx, options, value)?;
        if tokens.is_empty() {
            return Ok(tokens);
        }

        let substitution = match tokens.as_slice() {
            [token] => self.substitute_bool(token),
            _ => BoolSubstitution::Keep,
        };
        match substitution {
            BoolSubstitution::Keep => {}
            BoolSubstitution::Replace(label) => tokens = vec![label.to_string()],
            BoolSubstitution::Suppress => return Ok(Vec::new()),
        }

        if tokens.len() > 1 {
            if let Some(separator) = &self.separator {
                tokens = vec![tokens.join(separator)];
            }
        }

        if let Some(prefix) = &self.single_token_prefix {
            let joined = tokens.join(&options.concat_separator);
            tokens = vec![format!("{}{}", prefix, joined)];
        }

        let mut args = Vec::with_capacity(self.prepend.len() + tokens.len() + self.append.len());
        args.extend(self.prepend.iter().cloned());
        args.extend(tokens);
        args.extend(self.append.iter().cloned());
        Ok(args)
    }

    fn substitute_bool(&self, token: &str) -> BoolSubstitution<'_> {
        match (token, label(&self.bool_true), label(&self.bool_false)) {
            ("true", Some(on), _) => BoolSubstitution::Replace(on),
            ("false", _, Some(off)) => BoolSubstitution::Replace(off),
            // A `true=` label alone marks the field as a switch: `false` means "leave it out".
            ("false", Some(_), None) => BoolSubstitution::Suppress,
            _ => BoolSubstitution::Keep,
        }
    }
}
