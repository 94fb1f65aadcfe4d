//! Configuration options for argv encoding.
//!
//! [`ArgsOptions`] controls the two places where the encoder has to invent a
//! separator of its own:
//!
//! - the `join` directive keyword, which collapses a multi-token field into one token
//! - single-token flags such as `--flag=`, which concatenate all of a field's tokens
//!
//! ## Examples
//!
//! ```rust
//! use serde_argv::{to_args_with_options, ArgsOptions, Context};
//!
//! let options = ArgsOptions::new().with_concat_separator(",");
//! let args = to_args_with_options(&Context::background(), &vec!["a", "b"], options).unwrap();
//! assert_eq!(args, vec!["a", "b"]);
//! ```

/// Separator used by the `join` keyword unless configured otherwise.
pub const DEFAULT_JOIN_SEPARATOR: &str = ",";

/// Separator used when a `--flag=` directive concatenates several tokens.
pub const DEFAULT_CONCAT_SEPARATOR: &str = " ";

/// Configuration options for argv encoding.
///
/// # Examples
///
/// ```rust
/// use serde_argv::ArgsOptions;
///
/// let options = ArgsOptions::new()
///     .with_join_separator(":")
///     .with_concat_separator(",");
/// assert_eq!(options.join_separator, ":");
/// assert_eq!(options.concat_separator, ",");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgsOptions {
    pub join_separator: String,
    pub concat_separator: String,
}

impl Default for ArgsOptions {
    fn default() -> Self {
        ArgsOptions {
            join_separator: DEFAULT_JOIN_SEPARATOR.to_string(),
            concat_separator: DEFAULT_CONCAT_SEPARATOR.to_string(),
        }
    }
}

impl ArgsOptions {
    /// Creates default options (`,` for `join`, a single space for `--flag=`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_argv::ArgsOptions;
    ///
    /// let options = ArgsOptions::new();
    /// assert_eq!(options.join_separator, ",");
    /// assert_eq!(options.concat_separator, " ");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the separator the `join` keyword uses.
    #[must_use]
    pub fn with_join_separator(mut self, separator: impl Into<String>) -> Self {
        self.join_separator = separator.into();
        self
    }

    /// Sets the separator placed between tokens folded into a `--flag=` token.
    #[must_use]
    pub fn with_concat_separator(mut self, separator: impl Into<String>) -> Self {
        self.concat_separator = separator.into();
        self
    }
}
