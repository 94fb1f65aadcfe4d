//! Error types for argv encoding.
//!
//! ## Error Categories
//!
//! - **Unsupported Types**: The value has a shape with no argv encoding (maps, bytes, tuples)
//! - **Field Errors**: A struct field failed to encode; wraps the underlying cause
//! - **Cancellation**: A producer observed a cancelled or expired [`Context`](crate::Context)
//! - **Producer Errors**: Failures raised by a [`ToArgs`](crate::ToArgs) implementation
//!
//! ## Field Paths
//!
//! Field errors nest without flattening. A failure three structs deep carries
//! the whole path, and the original cause is still reachable:
//!
//! ```rust
//! use serde_argv::Error;
//!
//! let err = Error::field("build", 0, Error::field("tag", 2, Error::custom("empty tag")));
//! assert_eq!(err.field_path(), vec!["build", "tag"]);
//! assert_eq!(err.root_cause().to_string(), "empty tag");
//! assert_eq!(err.to_string(), "field \"build\": field \"tag\": empty tag");
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding a value into argv tokens.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The value matches none of the encodable shapes.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A record was required but some other shape was given.
    #[error("not a struct: {0}")]
    NotAStruct(String),

    /// Encoding a single struct field failed.
    #[error("field {name:?}: {source}")]
    Field {
        name: String,
        index: usize,
        source: Box<Error>,
    },

    /// The context was cancelled before the producer finished.
    #[error("context cancelled")]
    Cancelled,

    /// The context deadline passed before the producer finished.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// IO error inside a token producer
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an unsupported type error naming the rejected shape.
    pub fn unsupported_type(shape: &str) -> Self {
        Error::UnsupportedType(shape.to_string())
    }

    /// Creates an error for a non-record value handed to the struct walker.
    pub fn not_a_struct(shape: &str) -> Self {
        Error::NotAStruct(shape.to_string())
    }

    /// Wraps `source` as the failure of the field `name` at position `index`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_argv::Error;
    ///
    /// let err = Error::field("image", 1, Error::custom("bad reference"));
    /// assert!(matches!(err, Error::Field { index: 1, .. }));
    /// ```
    pub fn field(name: impl Into<String>, index: usize, source: Error) -> Self {
        Error::Field {
            name: name.into(),
            index,
            source: Box::new(source),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_argv::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for producers that touch the filesystem.
    pub fn io<T: fmt::Display>(err: T) -> Self {
        Error::Io(err.to_string())
    }

    /// Returns the names of the nested fields that led to this error, outermost first.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Error::Field { name, source, .. } = current {
            path.push(name.as_str());
            current = source;
        }
        path
    }

    /// Returns the innermost error below any chain of field errors.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
