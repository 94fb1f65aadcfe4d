//! Value dispatch.
//!
//! This module provides the [`Serializer`] that turns any `Serialize` value
//! into argv tokens. Values are classified by the serde shape they emit:
//!
//! - **Self-describing values** (`ToArgs` types) hand over their own tokens
//! - **Strings and chars** become one token each
//! - **Absence** (`None`, `()`) becomes no tokens
//! - **Booleans** become `true` or `false`
//! - **Sequences** and fixed-size arrays of strings, optional strings or unit
//!   variants become one token per present element
//! - **Numbers and `collect_str` values** become their `Display` text
//! - **Unit enum variants** become their serde name
//! - **Records** are walked field by field, see [`StructWalker`]
//!
//! Maps, byte strings, tuple structs and data-carrying enum variants are rejected
//! with [`Error::UnsupportedType`].
//!
//! ## Usage
//!
//! Most users should call [`to_args`](crate::to_args):
//!
//! ```rust
//! use serde_argv::{to_args, Context};
//!
//! let ctx = Context::background();
//! assert_eq!(to_args(&ctx, "value").unwrap(), vec!["value"]);
//! assert_eq!(to_args(&ctx, &vec!["a", "b"]).unwrap(), vec!["a", "b"]);
//! assert_eq!(to_args(&ctx, &Some(8080)).unwrap(), vec!["8080"]);
//! assert!(to_args(&ctx, &None::<String>).unwrap().is_empty());
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_argv::{ArgsOptions, Context, Serializer};
//!
//! let ctx = Context::background();
//! let options = ArgsOptions::default();
//! let tokens = true.serialize(Serializer::new(&ctx, &options)).unwrap();
//! assert_eq!(tokens, vec!["true"]);
//! ```

use crate::args::ARGS_TOKEN;
use crate::scope::{self, Mode};
use crate::walk::StructWalker;
use crate::{ArgsOptions, Context, Error, Result};
use serde::ser::{self, Impossible, Serialize};
use std::fmt::Display;

/// Dispatches a value to its argv tokens.
///
/// Calling `serialize` on the serializer directly skips the per-call scope,
/// so self-describing values nested inside see [`Context::background`] rather
/// than `ctx`. Use [`to_args`](crate::to_args) unless that is intended.
#[derive(Clone, Copy)]
pub struct Serializer<'a> {
    ctx: &'a Context,
    options: &'a ArgsOptions,
}

impl<'a> Serializer<'a> {
    pub fn new(ctx: &'a Context, options: &'a ArgsOptions) -> Self {
        Serializer { ctx, options }
    }
}

/// Runs one scoped dispatch.
pub(crate) fn encode<T>(ctx: &Context, options: &ArgsOptions, value: &T) -> Result<Vec<String>>
where
    T: ?Sized + Serialize,
{
    let _frame = scope::enter(ctx, options, Mode::Encode);
    value
        .serialize(Serializer::new(ctx, options))
        .map_err(|err| scope::take_stashed().unwrap_or(err))
}

fn unsupported(shape: &str) -> Error {
    tracing::debug!(shape, "rejecting unsupported shape");
    Error::unsupported_type(shape)
}

fn token<T: Display + ?Sized>(v: &T) -> Result<Vec<String>> {
    Ok(vec![v.to_string()])
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = Vec<String>;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = Impossible<Vec<String>, Error>;
    type SerializeTupleVariant = Impossible<Vec<String>, Error>;
    type SerializeMap = Impossible<Vec<String>, Error>;
    type SerializeStruct = StructWalker<'a>;
    type SerializeStructVariant = Impossible<Vec<String>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_i8(self, v: i8) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_i16(self, v: i16) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_i32(self, v: i32) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_i64(self, v: i64) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_i128(self, v: i128) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_u8(self, v: u8) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_u16(self, v: u16) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_u32(self, v: u32) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_u64(self, v: u64) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_u128(self, v: u128) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_f32(self, v: f32) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_f64(self, v: f64) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_char(self, v: char) -> Result<Vec<String>> {
        token(&v)
    }

    fn serialize_str(self, v: &str) -> Result<Vec<String>> {
        Ok(vec![v.to_owned()])
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Vec<String>> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Vec<String>> {
        Ok(vec![variant.to_owned()])
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Serialize,
    {
        // Self-describing payloads are already a list of strings.
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
        Err(unsupported(&format!("newtype variant {}::{}", name, variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            tokens: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    // Fixed-size arrays arrive as tuples.
    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            tokens: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(unsupported(&format!("tuple struct {}", name)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported(&format!("tuple variant {}::{}", name, variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(unsupported("map"))
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
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported(&format!("struct variant {}::{}", name, variant)))
    }

    fn collect_str<T>(self, value: &T) -> Result<Vec<String>>
    where
        T: ?Sized + Display,
    {
        token(value)
    }
}

/// Collects one token per present sequence or array element.
pub struct SeqSerializer {
    tokens: Vec<String>,
}

impl SeqSerializer {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        // Self-describing elements are rejected without running their producer.
        let _frame = scope::enter_element();
        if let Some(token) = value.serialize(ElementSerializer)? {
            self.tokens.push(token);
        }
        Ok(())
    }
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Vec<String>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Vec<String>> {
        Ok(self.tokens)
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Vec<String>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Vec<String>> {
        Ok(self.tokens)
    }
}

/// Accepts the string-like shapes allowed inside a sequence.
struct ElementSerializer;

fn element(shape: &str) -> Error {
    unsupported(&format!("sequence element of type {}", shape))
}

impl ser::Serializer for ElementSerializer {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<String>, Error>;
    type SerializeTuple = Impossible<Option<String>, Error>;
    type SerializeTupleStruct = Impossible<Option<String>, Error>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Option<String>> {
        Err(element("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Option<String>> {
        Err(element("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Option<String>> {
        Err(element("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Option<String>> {
        Err(element("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Option<String>> {
        Err(element("i64"))
    }

    fn serialize_i128(self, _v: i128) -> Result<Option<String>> {
        Err(element("i128"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Option<String>> {
        Err(element("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Option<String>> {
        Err(element("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Option<String>> {
        Err(element("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Option<String>> {
        Err(element("u64"))
    }

    fn serialize_u128(self, _v: u128) -> Result<Option<String>> {
        Err(element("u128"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Option<String>> {
        Err(element("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Option<String>> {
        Err(element("f64"))
    }

    fn serialize_char(self, v: char) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>> {
        Ok(Some(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<String>> {
        Err(element("bytes"))
    }

    fn serialize_none(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>> {
        Err(element("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Option<String>> {
        Err(element(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<String>> {
        Ok(Some(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        if name == ARGS_TOKEN {
            return Err(element("self-describing value"));
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        Err(element(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(element("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(element("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(element(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(element(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(element("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(element(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(element(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn encode<T: ?Sized + Serialize>(value: &T) -> Result<Vec<String>> {
        super::encode(&Context::background(), &ArgsOptions::default(), value)
    }

    #[derive(Serialize)]
    #[serde(rename_all = "kebab-case")]
    enum Mode {
        Fast,
        ReallySlow,
    }

    #[derive(Serialize)]
    enum Shape {
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    #[derive(Serialize)]
    struct Name(String);

    #[test]
    fn test_scalars() {
        assert_eq!(encode("x").unwrap(), vec!["x"]);
        assert_eq!(encode("").unwrap(), vec![""]);
        assert_eq!(encode(&'c').unwrap(), vec!["c"]);
        assert_eq!(encode(&true).unwrap(), vec!["true"]);
        assert_eq!(encode(&false).unwrap(), vec!["false"]);
        assert_eq!(encode(&-42i32).unwrap(), vec!["-42"]);
        assert_eq!(encode(&u128::MAX).unwrap(), vec![u128::MAX.to_string()]);
        assert_eq!(encode(&1.5f64).unwrap(), vec!["1.5"]);
    }

    #[test]
    fn test_absence() {
        assert!(encode(&None::<String>).unwrap().is_empty());
        assert!(encode(&()).unwrap().is_empty());
        assert_eq!(encode(&Some("x")).unwrap(), vec!["x"]);
        assert_eq!(encode(&Some(Some("y"))).unwrap(), vec!["y"]);
    }

    #[test]
    fn test_sequences() {
        assert_eq!(encode(&vec!["a", "", "a"]).unwrap(), vec!["a", "", "a"]);
        assert!(encode(&Vec::<String>::new()).unwrap().is_empty());
        assert_eq!(
            encode(&vec![Some("head"), None, None, Some("tail")]).unwrap(),
            vec!["head", "tail"]
        );
        assert_eq!(encode(&["x", "y"]).unwrap(), vec!["x", "y"]);
        assert_eq!(encode(&[Some("x"), None]).unwrap(), vec!["x"]);
        assert!(encode(&[""; 0]).unwrap().is_empty());
        assert_eq!(encode(&("a", "b")).unwrap(), vec!["a", "b"]);
        assert_eq!(
            encode(&vec![Mode::Fast, Mode::ReallySlow]).unwrap(),
            vec!["fast", "really-slow"]
        );
        assert_eq!(encode(&vec![Name("n".to_string())]).unwrap(), vec!["n"]);
    }

    #[test]
    fn test_non_string_sequence_elements_are_rejected() {
        assert!(matches!(
            encode(&vec![1, 2, 3]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&vec![vec!["nested"]]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&vec![true]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&vec![1i128]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&[u128::MAX]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&("a", 1)),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_text_representations() {
        assert_eq!(encode(&Mode::ReallySlow).unwrap(), vec!["really-slow"]);
        assert_eq!(encode(&PathBuf::from("/tmp/x")).unwrap(), vec!["/tmp/x"]);
        let addr: std::net::IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(encode(&addr).unwrap(), vec!["127.0.0.1"]);
    }

    #[test]
    fn test_newtypes_are_transparent() {
        assert_eq!(encode(&Name("alice".to_string())).unwrap(), vec!["alice"]);
        assert_eq!(encode(&Box::new("boxed")).unwrap(), vec!["boxed"]);
    }

    #[test]
    fn test_unsupported_shapes() {
        let mut map = BTreeMap::new();
        map.insert("k", "v");
        let err = encode(&map).unwrap_err();
        assert_eq!(err.to_string(), "unsupported type: map");

        assert!(matches!(
            encode(&Shape::Circle(1.0)),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            encode(&Shape::Rect { w: 1, h: 2 }),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(encode(&Bytes), Err(Error::UnsupportedType(_))));
    }

    struct Bytes;

    impl Serialize for Bytes {
        fn serialize<S: ser::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            serializer.serialize_bytes(b"raw")
        }
    }

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: ser::Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(<S::Error as ser::Error>::custom("no text form"))
        }
    }

    #[test]
    fn test_text_errors_propagate() {
        let err = encode(&Broken).unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg == "no text form"));
    }
}
