//! Typed decoding of records.
//!
//! Every CSV value is text. This module lets a [`Record`] drive serde so a
//! row can become a user struct: the record is presented as a map of field
//! name to value, and each value is parsed on demand into whatever the
//! target type asks for.
//!
//! ## Conversions
//!
//! | Target | Accepted text |
//! |--------|---------------|
//! | `String`, `&str` | any value |
//! | integers, floats | `str::parse` after trimming blanks |
//! | `bool` | `true` / `false`, any case |
//! | `char` | exactly one character |
//! | `Option<T>` | `None` for absent or empty values |
//! | unit enum variants | the variant name |
//!
//! ## Examples
//!
//! ```rust
//! use lenient_csv::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Item { sku: String, qty: u32, price: Option<f64> }
//!
//! let items: Vec<Item> = from_str("sku,qty,price\nA-1,3,9.5\nB-2,1,\n").unwrap();
//! assert_eq!(items[1], Item { sku: "B-2".into(), qty: 1, price: None });
//! ```

use crate::error::{Error, Result};
use crate::record::Record;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, Visitor};
use serde::forward_to_deserialize_any;

const ABSENT: &str = "<absent>";

/// Deserializes a `T` from one record.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when a field's text does not parse as the
/// requested type, or a custom error from `T`'s own validation (for example
/// a missing struct field).
pub fn from_record<'a, T>(record: &'a Record) -> Result<T>
where
    T: de::Deserialize<'a>,
{
    T::deserialize(RecordDeserializer::new(record))
}

/// A serde deserializer over one record.
///
/// Deserializes as a map by default; sequences and tuples receive the values
/// in header order.
pub struct RecordDeserializer<'de> {
    record: &'de Record,
}

impl<'de> RecordDeserializer<'de> {
    #[must_use]
    pub fn new(record: &'de Record) -> Self {
        RecordDeserializer { record }
    }
}

impl<'de> de::Deserializer<'de> for RecordDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(RecordAccess {
            fields: self.record.iter(),
            pending: None,
        })
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_seq(RecordAccess {
            fields: self.record.iter(),
            pending: None,
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct map struct enum identifier ignored_any
    }
}

type Fields<'de> = indexmap::map::Iter<'de, String, Option<String>>;

struct RecordAccess<'de> {
    fields: Fields<'de>,
    pending: Option<FieldDeserializer<'de>>,
}

impl<'de> de::MapAccess<'de> for RecordAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some((name, value)) => {
                self.pending = Some(FieldDeserializer::new(name, value.as_deref()));
                seed.deserialize(BorrowedStrDeserializer::<Error>::new(name.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let field = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("value requested before key"))?;
        seed.deserialize(field)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

impl<'de> de::SeqAccess<'de> for RecordAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some((name, value)) => seed
                .deserialize(FieldDeserializer::new(name, value.as_deref()))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Deserializer for a single field value.
pub struct FieldDeserializer<'de> {
    name: &'de str,
    value: Option<&'de str>,
}

impl<'de> FieldDeserializer<'de> {
    #[must_use]
    pub fn new(name: &'de str, value: Option<&'de str>) -> Self {
        FieldDeserializer { name, value }
    }

    fn text(&self, expected: &str) -> Result<&'de str> {
        self.value
            .ok_or_else(|| Error::type_mismatch(self.name, expected, ABSENT))
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(self.name, expected, self.value.unwrap_or(ABSENT))
    }

    fn parse<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        self.text(expected)?
            .trim_matches(|ch: char| ch == ' ' || ch == '\t')
            .parse()
            .map_err(|_| self.mismatch(expected))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for FieldDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(text) => visitor.visit_borrowed_str(text),
            None => visitor.visit_none(),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = self.text("bool")?.trim_matches(|ch: char| ch == ' ' || ch == '\t');
        if text.eq_ignore_ascii_case("true") {
            visitor.visit_bool(true)
        } else if text.eq_ignore_ascii_case("false") {
            visitor.visit_bool(false)
        } else {
            Err(self.mismatch("bool"))
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.text("char")?.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(self.mismatch("char")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.text("string")?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.text("bytes")?.as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            None | Some("") => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let text = self.text("enum variant")?;
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(text))
    }

    forward_to_deserialize_any! {
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn record(names: Vec<&str>, values: &[&str]) -> Record {
        let row = values.iter().map(|value| value.to_string()).collect();
        Record::build(&Header::from(names), row, "H")
    }

    #[derive(Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Active,
        Retired,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Employee {
        id: u32,
        name: String,
        manager: bool,
        rate: Option<f64>,
        status: Status,
    }

    #[test]
    fn test_struct_from_record() {
        let record = record(
            vec!["id", "name", "manager", "rate", "status"],
            &["7", "Ada", "TRUE", " 12.5 ", "active"],
        );
        let employee: Employee = from_record(&record).unwrap();
        assert_eq!(
            employee,
            Employee {
                id: 7,
                name: "Ada".to_string(),
                manager: true,
                rate: Some(12.5),
                status: Status::Active,
            }
        );
    }

    #[test]
    fn test_absent_and_empty_option() {
        let with_empty = record(vec!["id", "name", "manager", "rate", "status"], &[
            "1", "Bo", "false", "", "retired",
        ]);
        let employee: Employee = from_record(&with_empty).unwrap();
        assert_eq!(employee.rate, None);
        assert_eq!(employee.status, Status::Retired);

        #[derive(Deserialize, Debug)]
        struct Sparse {
            a: String,
            b: Option<u8>,
        }
        let short = record(vec!["a", "b"], &["x"]);
        let sparse: Sparse = from_record(&short).unwrap();
        assert_eq!(sparse.a, "x");
        assert_eq!(sparse.b, None);
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let bad = record(vec!["id", "name", "manager", "rate", "status"], &[
            "seven", "Ada", "true", "1", "active",
        ]);
        let err = from_record::<Employee>(&bad).unwrap_err();
        assert_eq!(err, Error::type_mismatch("id", "u32", "seven"));
    }

    #[test]
    fn test_absent_required_string() {
        #[derive(Deserialize, Debug)]
        struct Pair {
            #[allow(dead_code)]
            a: String,
            #[allow(dead_code)]
            b: String,
        }
        let err = from_record::<Pair>(&record(vec!["a", "b"], &["1"])).unwrap_err();
        assert_eq!(err, Error::type_mismatch("b", "string", ABSENT));
    }

    #[test]
    fn test_borrowed_fields() {
        #[derive(Deserialize)]
        struct View<'a> {
            name: &'a str,
        }
        let record = record(vec!["name"], &["borrowed"]);
        let view: View<'_> = from_record(&record).unwrap();
        assert_eq!(view.name, "borrowed");
    }

    #[test]
    fn test_tuple_in_header_order() {
        let record = record(vec!["b", "a"], &["x", "3"]);
        let (b, a): (String, i64) = from_record(&record).unwrap();
        assert_eq!(b, "x");
        assert_eq!(a, 3);
    }

    #[test]
    fn test_map_target() {
        let record = record(vec!["k", "missing"], &["v"]);
        let map: HashMap<String, Option<String>> = from_record(&record).unwrap();
        assert_eq!(map["k"].as_deref(), Some("v"));
        assert_eq!(map["missing"], None);
    }

    #[test]
    fn test_char_and_bool_errors() {
        #[derive(Deserialize, Debug)]
        struct Flags {
            #[allow(dead_code)]
            c: char,
        }
        let err = from_record::<Flags>(&record(vec!["c"], &["ab"])).unwrap_err();
        assert_eq!(err, Error::type_mismatch("c", "char", "ab"));

        #[derive(Deserialize, Debug)]
        struct Toggle {
            #[allow(dead_code)]
            on: bool,
        }
        let err = from_record::<Toggle>(&record(vec!["on"], &["yes"])).unwrap_err();
        assert_eq!(err, Error::type_mismatch("on", "bool", "yes"));
    }

    #[test]
    fn test_unknown_enum_variant() {
        #[derive(Deserialize, Debug)]
        struct Row {
            #[allow(dead_code)]
            status: Status,
        }
        let err = from_record::<Row>(&record(vec!["status"], &["gone"])).unwrap_err();
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("gone")));
    }
}
