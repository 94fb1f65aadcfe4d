//! Struct field walking.
//!
//! [`StructWalker`] visits a record's fields in declaration order, applies
//! each field's directive, and concatenates the resulting tokens. It backs
//! both `#[derive(ToArgs)]` (which passes each field's `#[args("...")]`
//! directive) and plain `#[derive(Serialize)]` records reached through the
//! dispatcher (whose fields all use the empty directive).
//!
//! ```rust
//! use serde_argv::{Context, StructWalker};
//!
//! let ctx = Context::background();
//! let mut walker = StructWalker::new(&ctx);
//! walker.field(0, "image", "", "alpine").unwrap();
//! walker.field(1, "name", "--name=", "box").unwrap();
//! walker.field(2, "rm", "true=--rm", &true).unwrap();
//! assert_eq!(walker.finish(), vec!["alpine", "--name=box", "--rm"]);
//! ```

use crate::args::ARGS_TOKEN;
use crate::scope::{self, Mode};
use crate::ser::Serializer;
use crate::spec::FieldSpec;
use crate::{ArgsOptions, Context, Error, Result};
use serde::ser::{self, Impossible, Serialize};
use std::borrow::Cow;

/// Accumulates the tokens of one record.
pub struct StructWalker<'a> {
    ctx: &'a Context,
    options: Cow<'a, ArgsOptions>,
    tokens: Vec<String>,
    next_index: usize,
}

impl<'a> StructWalker<'a> {
    /// Creates a walker using the options of the enclosing dispatch, or the
    /// defaults when called outside one.
    pub fn new(ctx: &'a Context) -> Self {
        let options = scope::options().unwrap_or_default();
        StructWalker {
            ctx,
            options: Cow::Owned(options),
            tokens: Vec::new(),
            next_index: 0,
        }
    }

    pub fn with_options(ctx: &'a Context, options: &'a ArgsOptions) -> Self {
        StructWalker {
            ctx,
            options: Cow::Borrowed(options),
            tokens: Vec::new(),
            next_index: 0,
        }
    }

    /// Encodes one field and appends its tokens.
    ///
    /// A failure is wrapped as [`Error::Field`] carrying `name` and `index`.
    pub fn field<T>(&mut self, index: usize, name: &str, directive: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        tracing::trace!(field = name, index, directive, "walking field");
        let spec = FieldSpec::parse_with(directive, &self.options);
        let tokens = spec
            .apply_with(self.ctx, &self.options, value)
            .map_err(|err| Error::field(name, index, err))?;
        self.tokens.extend(tokens);
        self.next_index = index + 1;
        Ok(())
    }

    pub fn finish(self) -> Vec<String> {
        self.tokens
    }
}

impl<'a> ser::SerializeStruct for StructWalker<'a> {
    type Ok = Vec<String>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(self.next_index, key, "", value)
    }

    fn skip_field(&mut self, _key: &'static str) -> Result<()> {
        self.next_index += 1;
        Ok(())
    }

    fn end(self) -> Result<Vec<String>> {
        Ok(self.finish())
    }
}

/// Encodes a record, rejecting every other shape.
///
/// Unlike [`to_args`](crate::to_args), which accepts any encodable value,
/// this requires a struct (derived or plain serde), a reference to one, a
/// present `Option` of one, or another self-describing value.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_argv::{walk::struct_to_args, Context, Error};
///
/// #[derive(Serialize)]
/// struct Target {
///     host: String,
///     port: u16,
/// }
///
/// let ctx = Context::background();
/// let target = Target { host: "example.org".into(), port: 22 };
/// assert_eq!(struct_to_args(&ctx, &target).unwrap(), vec!["example.org", "22"]);
/// assert!(matches!(struct_to_args(&ctx, "text"), Err(Error::NotAStruct(_))));
/// ```
pub fn struct_to_args<T>(ctx: &Context, value: &T) -> Result<Vec<String>>
where
    T: ?Sized + Serialize,
{
    let options = ArgsOptions::default();
    let _frame = scope::enter(ctx, &options, Mode::Encode);
    value
        .serialize(RecordSerializer {
            ctx,
            options: &options,
        })
        .map_err(|err| scope::take_stashed().unwrap_or(err))
}

#[derive(Clone, Copy)]
struct RecordSerializer<'a> {
    ctx: &'a Context,
    options: &'a ArgsOptions,
}

type Rejected = Impossible<Vec<String>, Error>;

impl<'a> ser::Serializer for RecordSerializer<'a> {
    type Ok = Vec<String>;
    type Error = Error;

    type SerializeSeq = Rejected;
    type SerializeTuple = Rejected;
    type SerializeTupleStruct = Rejected;
    type SerializeTupleVariant = Rejected;
    type SerializeMap = Rejected;
    type SerializeStruct = StructWalker<'a>;
    type SerializeStructVariant = Rejected;

    fn serialize_bool(self, _v: bool) -> Result<Vec<String>> {
        Err(Error::not_a_struct("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Vec<String>> {
        Err(Error::not_a_struct("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Vec<String>> {
        Err(Error::not_a_struct("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Vec<String>> {
        Err(Error::not_a_struct("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Vec<String>> {
        Err(Error::not_a_struct("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Vec<String>> {
        Err(Error::not_a_struct("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Vec<String>> {
        Err(Error::not_a_struct("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Vec<String>> {
        Err(Error::not_a_struct("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Vec<String>> {
        Err(Error::not_a_struct("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Vec<String>> {
        Err(Error::not_a_struct("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Vec<String>> {
        Err(Error::not_a_struct("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<Vec<String>> {
        Err(Error::not_a_struct("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<Vec<String>> {
        Err(Error::not_a_struct("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Vec<String>> {
        Err(Error::not_a_struct("bytes"))
    }

    fn serialize_none(self) -> Result<Vec<String>> {
        Err(Error::not_a_struct("None"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Vec<String>> {
        Err(Error::not_a_struct("()"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Vec<String>> {
        Err(Error::not_a_struct(&format!("{}::{}", name, variant)))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        if name == ARGS_TOKEN {
            return value.serialize(Serializer::new(self.ctx, self.options));
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::not_a_struct(&format!("{}::{}", name, variant)))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Rejected> {
        Err(Error::not_a_struct("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Rejected> {
        Err(Error::not_a_struct("tuple"))
    }

    fn serialize_tuple_struct(self, name: &'static str, _len: usize) -> Result<Rejected> {
        Err(Error::not_a_struct(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Rejected> {
        Err(Error::not_a_struct(&format!("{}::{}", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Rejected> {
        Err(Error::not_a_struct("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<StructWalker<'a>> {
        Ok(StructWalker::with_options(self.ctx, self.options))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Rejected> {
        Err(Error::not_a_struct(&format!("{}::{}", name, variant)))
    }
}
