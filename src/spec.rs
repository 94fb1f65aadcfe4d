//! Field directive grammar.
//!
//! Every struct field may carry a directive string (`#[args("...")]` with the
//! derive). The string is parsed into a [`FieldSpec`] that tells the encoder
//! how to wrap the field's tokens.
//!
//! # Grammar
//!
//! A directive is a comma-separated list of elements:
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | *(empty)* | Field encodes as-is |
//! | `-` or `-,...` | Field is omitted; anything after the `-` is ignored |
//! | `--flag` / `-f` (first element) | Emit `--flag` before the field's tokens |
//! | `--flag=` / `-f=` (first element) | Fold all tokens into one: `--flag=a b c` |
//! | `omitempty` | Emit nothing when the value is empty |
//! | `join` | Join multiple tokens with the join separator (`,` by default) |
//! | `true=<token>` | Replace a `true` boolean with `<token>` |
//! | `false=<token>` | Replace a `false` boolean with `<token>` |
//!
//! Unknown keywords and keys are ignored, as are empty elements from
//! duplicate or trailing commas. Parsing never fails.
//!
//! # Examples
//!
//! ```text
//! "--tag"                 tag: "v1"            => ["--tag", "v1"]
//! "--tag="                tag: "v1"            => ["--tag=v1"]
//! "--tags="               tags: ["a", "b"]     => ["--tags=a b"]
//! "--label,join"          labels: ["a", "b"]   => ["--label", "a,b"]
//! "true=--dry-run"        dry_run: true        => ["--dry-run"]
//! "true=--dry-run"        dry_run: false       => []
//! "--out=,omitempty"      out: ""              => []
//! ```
//!
//! # Boolean Substitution
//!
//! `true=` and `false=` only apply when the field encodes to exactly one
//! token reading `true` or `false`. When only `true=` is configured, a
//! `false` value is dropped rather than emitted literally; when neither is
//! configured the literal token stays.

use crate::ArgsOptions;

/// Parsed form of one field directive.
///
/// Built by [`FieldSpec::parse`] or programmatically with the `with_*` methods.
///
/// # Examples
///
/// ```rust
/// use serde_argv::FieldSpec;
///
/// let spec = FieldSpec::parse("--label=,omitempty");
/// assert_eq!(spec.single_token_prefix.as_deref(), Some("--label="));
/// assert!(spec.omit_if_empty);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSpec {
    pub omit_field: bool,
    pub omit_if_empty: bool,
    pub single_token_prefix: Option<String>,
    pub prepend: Vec<String>,
    pub append: Vec<String>,
    pub separator: Option<String>,
    pub bool_true: Option<String>,
    pub bool_false: Option<String>,
}

impl FieldSpec {
    /// Parses a directive with the default options.
    pub fn parse(directive: &str) -> Self {
        Self::parse_with(directive, &ArgsOptions::default())
    }

    /// Parses a directive; `join` takes its separator from `options`.
    pub fn parse_with(directive: &str, options: &ArgsOptions) -> Self {
        let mut spec = FieldSpec::default();
        if directive.is_empty() {
            return spec;
        }
        if directive == "-" || directive.starts_with("-,") {
            spec.omit_field = true;
            return spec;
        }

        let elements: Vec<&str> = directive.split(',').collect();

        let first = elements[0];
        if first.starts_with('-') {
            if first.ends_with('=') {
                spec.single_token_prefix = Some(first.to_string());
            } else {
                spec.prepend.push(first.to_string());
            }
        }

        for element in &elements {
            match element.split_once('=') {
                None => match *element {
                    "omitempty" => spec.omit_if_empty = true,
                    "join" => spec.separator = Some(options.join_separator.clone()),
                    _ => {}
                },
                Some(("true", label)) => spec.bool_true = Some(label.to_string()),
                Some(("false", label)) => spec.bool_false = Some(label.to_string()),
                Some(_) => {}
            }
        }

        spec
    }

    /// Marks the field as omitted.
    #[must_use]
    pub fn omitted() -> Self {
        FieldSpec {
            omit_field: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_omit_if_empty(mut self) -> Self {
        self.omit_if_empty = true;
        self
    }

    #[must_use]
    pub fn with_single_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.single_token_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_prepend(mut self, token: impl Into<String>) -> Self {
        self.prepend.push(token.into());
        self
    }

    #[must_use]
    pub fn with_append(mut self, token: impl Into<String>) -> Self {
        self.append.push(token.into());
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    #[must_use]
    pub fn with_bool_true(mut self, label: impl Into<String>) -> Self {
        self.bool_true = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_bool_false(mut self, label: impl Into<String>) -> Self {
        self.bool_false = Some(label.into());
        self
    }
}

impl From<&str> for FieldSpec {
    fn from(directive: &str) -> Self {
        FieldSpec::parse(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directive_is_default() {
        assert_eq!(FieldSpec::parse(""), FieldSpec::default());
    }

    #[test]
    fn test_omit_directives() {
        assert_eq!(FieldSpec::parse("-"), FieldSpec::omitted());
        assert_eq!(FieldSpec::parse("-,"), FieldSpec::omitted());
        // Trailing segments after the omission marker are inert.
        assert_eq!(FieldSpec::parse("-,foo,k=v,eee,,"), FieldSpec::omitted());
        assert_eq!(FieldSpec::parse("-,omitempty,true=x"), FieldSpec::omitted());
    }

    #[test]
    fn test_flag_prepend() {
        assert_eq!(
            FieldSpec::parse("--dashdashconfig"),
            FieldSpec::default().with_prepend("--dashdashconfig")
        );
        assert_eq!(FieldSpec::parse("-x"), FieldSpec::default().with_prepend("-x"));
    }

    #[test]
    fn test_single_token_prefix() {
        let spec = FieldSpec::parse("--dashdashconfig=");
        assert_eq!(spec.single_token_prefix.as_deref(), Some("--dashdashconfig="));
        assert!(spec.prepend.is_empty());

        let spec = FieldSpec::parse("-x=");
        assert_eq!(spec.single_token_prefix.as_deref(), Some("-x="));
    }

    #[test]
    fn test_flag_with_inline_value_is_prepended_verbatim() {
        let spec = FieldSpec::parse("--mode=fast");
        assert_eq!(spec.prepend, vec!["--mode=fast"]);
        assert!(spec.single_token_prefix.is_none());
    }

    #[test]
    fn test_keywords() {
        let spec = FieldSpec::parse("--no-value=,omitempty");
        assert!(spec.omit_if_empty);
        assert_eq!(spec.single_token_prefix.as_deref(), Some("--no-value="));

        let spec = FieldSpec::parse("--label,join");
        assert_eq!(spec.separator.as_deref(), Some(","));
        assert_eq!(spec.prepend, vec!["--label"]);
    }

    #[test]
    fn test_join_uses_configured_separator() {
        let options = ArgsOptions::new().with_join_separator(":");
        let spec = FieldSpec::parse_with("join", &options);
        assert_eq!(spec.separator.as_deref(), Some(":"));
    }

    #[test]
    fn test_bool_labels() {
        let spec = FieldSpec::parse("true=--dry-run,eee");
        assert_eq!(spec.bool_true.as_deref(), Some("--dry-run"));
        assert!(spec.bool_false.is_none());
        assert!(spec.prepend.is_empty());

        let spec = FieldSpec::parse("true=--some-bool=yes");
        assert_eq!(spec.bool_true.as_deref(), Some("--some-bool=yes"));

        let spec = FieldSpec::parse("--color,true=always,false=never");
        assert_eq!(spec.prepend, vec!["--color"]);
        assert_eq!(spec.bool_true.as_deref(), Some("always"));
        assert_eq!(spec.bool_false.as_deref(), Some("never"));
    }

    #[test]
    fn test_first_element_is_rescanned_for_keywords() {
        let spec = FieldSpec::parse("omitempty");
        assert!(spec.omit_if_empty);
        assert!(spec.prepend.is_empty());
    }

    #[test]
    fn test_unknown_and_empty_elements_are_ignored() {
        let spec = FieldSpec::parse("positional,,unknown,k=v,");
        assert_eq!(spec, FieldSpec::default());
    }

    #[test]
    fn test_from_str_slice() {
        let spec: FieldSpec = "--tag".into();
        assert_eq!(spec.prepend, vec!["--tag"]);
    }
}
