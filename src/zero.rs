//! Emptiness probing for `omitempty`.
//!
//! [`is_zero`] runs a value through a serializer that never produces tokens
//! and only answers whether the value is empty:
//!
//! 1. self-describing values answer through [`ToArgs::is_empty`](crate::ToArgs::is_empty);
//! 2. sequences and maps are empty when they hold no elements;
//! 3. everything else is compared against its zero value: `""`, `false`,
//!    `0`, `0.0`, `'\0'`, `None`, `()`, unit structs, and structs or tuples
//!    whose every field is zero.
//!
//! Probing never calls [`ToArgs::to_args`](crate::ToArgs::to_args).

use crate::args::ARGS_TOKEN;
use crate::scope::{self, Mode};
use crate::{ArgsOptions, Context, Error, Result};
use serde::{ser, Serialize};

/// Returns `true` when `value` counts as empty for `omitempty`.
///
/// # Examples
///
/// ```rust
/// use serde_argv::zero::is_zero;
///
/// assert!(is_zero(""));
/// assert!(is_zero(&false));
/// assert!(is_zero(&None::<String>));
/// assert!(is_zero(&Vec::<String>::new()));
/// assert!(!is_zero(&Some(String::new())));
/// assert!(!is_zero(&vec![""]));
/// ```
pub fn is_zero<T>(value: &T) -> bool
where
    T: ?Sized + Serialize,
{
    let ctx = scope::context().unwrap_or_else(Context::background);
    let options = scope::options().unwrap_or_else(ArgsOptions::default);
    let _frame = scope::enter(&ctx, &options, Mode::Probe);
    // A value that fails to serialize is not empty; dispatch reports the failure.
    value.serialize(ZeroProbe).unwrap_or(false)
}

struct ZeroProbe;

impl ser::Serializer for ZeroProbe {
    type Ok = bool;
    type Error = Error;

    type SerializeSeq = Compound;
    type SerializeTuple = Compound;
    type SerializeTupleStruct = Compound;
    type SerializeTupleVariant = Compound;
    type SerializeMap = Compound;
    type SerializeStruct = Compound;
    type SerializeStructVariant = Compound;

    fn serialize_bool(self, v: bool) -> Result<bool> {
        Ok(!v)
    }

    fn serialize_i8(self, v: i8) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i16(self, v: i16) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i32(self, v: i32) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i64(self, v: i64) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_i128(self, v: i128) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u8(self, v: u8) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u16(self, v: u16) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u32(self, v: u32) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u64(self, v: u64) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_u128(self, v: u128) -> Result<bool> {
        Ok(v == 0)
    }

    fn serialize_f32(self, v: f32) -> Result<bool> {
        Ok(v == 0.0)
    }

    fn serialize_f64(self, v: f64) -> Result<bool> {
        Ok(v == 0.0)
    }

    fn serialize_char(self, v: char) -> Result<bool> {
        Ok(v == '\0')
    }

    fn serialize_str(self, v: &str) -> Result<bool> {
        Ok(v.is_empty())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<bool> {
        Ok(v.is_empty())
    }

    fn serialize_none(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_unit(self) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool> {
        Ok(true)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<bool> {
        Ok(false)
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        if name == ARGS_TOKEN {
            // The payload is the producer's `is_empty` flag, and a `true` flag probes as non-zero.
            return value.serialize(self).map(|zero| !zero);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound> {
        Ok(Compound { zero: true })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound> {
        Ok(Compound { zero: true })
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Compound> {
        Ok(Compound { zero: true })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound> {
        Ok(Compound { zero: false })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound> {
        Ok(Compound { zero: true })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound> {
        Ok(Compound { zero: true })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound> {
        Ok(Compound { zero: false })
    }
}

/// Tracks zero-ness across the parts of a compound value.
struct Compound {
    zero: bool,
}

impl Compound {
    fn all_zero<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        if self.zero {
            self.zero = value.serialize(ZeroProbe)?;
        }
        Ok(())
    }
}

impl ser::SerializeSeq for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_element<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.zero = false;
        Ok(())
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeTuple for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.all_zero(value)
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeTupleStruct for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.all_zero(value)
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeTupleVariant for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeMap for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_key<T>(&mut self, _key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.zero = false;
        Ok(())
    }

    fn serialize_value<T>(&mut self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeStruct for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.all_zero(value)
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}

impl ser::SerializeStructVariant for Compound {
    type Ok = bool;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Ok(())
    }

    fn end(self) -> Result<bool> {
        Ok(self.zero)
    }
}
