use std::str;

use serde::{ser, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Result;

/// Serializes to compact JSON
///
/// Object keys keep their insertion order, arrays their element order, and no whitespace is
/// inserted. Values without a JSON representation, such as non-finite floats, are an
/// [`Error::Encoding`](crate::Error::Encoding).
///
/// ```
/// # use site_filters::filters::jsonify;
/// # use site_filters::Value;
/// assert_eq!(jsonify(&Value::object([("age", 18)]))?, r#"{"age":18}"#);
/// assert_eq!(jsonify([1, 2])?, "[1,2]");
/// # Ok::<(), site_filters::Error>(())
/// ```
#[inline]
pub fn jsonify(value: impl Serialize) -> Result<String> {
    value.serialize(FiniteFloats)?;
    Ok(serde_json::to_string(&value)?)
}

/// Serializes to indented JSON
///
/// The `indent` argument can either be an integer how many spaces to use for indentation
/// (capped to 16 characters), or a string (e.g. `"\t"`).
pub fn jsonify_pretty(value: impl Serialize, indent: impl AsIndent) -> Result<String> {
    value.serialize(FiniteFloats)?;
    let formatter = PrettyFormatter::with_indent(indent.as_indent().as_bytes());
    let mut buf = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes UTF-8
    String::from_utf8(buf).map_err(|err| crate::Error::Encoding(err.to_string()))
}

/// Walks a value without writing anything, failing on the first NaN or infinity
///
/// serde_json itself would quietly write those as `null`.
#[derive(Debug, Clone, Copy)]
struct FiniteFloats;

macro_rules! accept_scalars {
    ($($method:ident($ty:ty)),+ $(,)?) => { $(
        #[inline]
        fn $method(self, _: $ty) -> Result<(), serde_json::Error> {
            Ok(())
        }
    )+ };
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept_scalars! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<(), Self::Error> {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<(), Self::Error> {
        match v.is_finite() {
            true => Ok(()),
            false => Err(ser::Error::custom(format_args!(
                "{v} has no JSON representation"
            ))),
        }
    }

    #[inline]
    fn serialize_none(self) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    #[inline]
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    #[inline]
    fn serialize_seq(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_tuple(self, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_map(self, _: Option<usize>) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, Self::Error> {
        Ok(self)
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, Self::Error> {
        Ok(self)
    }
}

macro_rules! walk_compound {
    ($($Trait:ident :: $method:ident($($key:ty)?)),+ $(,)?) => { $(
        impl ser::$Trait for FiniteFloats {
            type Ok = ();
            type Error = serde_json::Error;

            #[inline]
            fn $method<T: ?Sized + Serialize>(
                &mut self,
                $(_: $key,)?
                value: &T,
            ) -> Result<(), Self::Error> {
                value.serialize(FiniteFloats)
            }

            #[inline]
            fn end(self) -> Result<(), Self::Error> {
                Ok(())
            }
        }
    )+ };
}

walk_compound! {
    SerializeSeq::serialize_element(),
    SerializeTuple::serialize_element(),
    SerializeTupleStruct::serialize_field(),
    SerializeTupleVariant::serialize_field(),
    SerializeStruct::serialize_field(&'static str),
    SerializeStructVariant::serialize_field(&'static str),
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    #[inline]
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        key.serialize(FiniteFloats)
    }

    #[inline]
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(FiniteFloats)
    }

    #[inline]
    fn end(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub trait AsIndent {
    fn as_indent(&self) -> &str;
}

impl AsIndent for str {
    #[inline]
    fn as_indent(&self) -> &str {
        self
    }
}

impl AsIndent for String {
    #[inline]
    fn as_indent(&self) -> &str {
        self
    }
}

impl AsIndent for usize {
    #[inline]
    fn as_indent(&self) -> &str {
        const MAX_SPACES: usize = 16;
        const SPACES: &str = match str::from_utf8(&[b' '; MAX_SPACES]) {
            Ok(spaces) => spaces,
            Err(_) => panic!(),
        };

        &SPACES[..(*self).min(SPACES.len())]
    }
}

impl<T: AsIndent + ?Sized> AsIndent for &T {
    #[inline]
    fn as_indent(&self) -> &str {
        T::as_indent(self)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{Error, Timestamp, Value};

    #[test]
    fn test_compact() {
        assert_eq!(jsonify(true).unwrap(), "true");
        assert_eq!(jsonify("foo").unwrap(), r#""foo""#);
        assert_eq!(jsonify(vec![1, 2]).unwrap(), "[1,2]");
        assert_eq!(
            jsonify(Value::from(vec![
                Value::object([("name", "Jack")]),
                Value::object([("name", "Smith")]),
            ]))
            .unwrap(),
            r#"[{"name":"Jack"},{"name":"Smith"}]"#
        );
        assert_eq!(
            jsonify(Value::object([("z", 1), ("a", 2)])).unwrap(),
            r#"{"z":1,"a":2}"#
        );
    }

    #[test]
    fn test_scalars() {
        let time = Timestamp::from_utc_ymd_hms(2013, 3, 27, 11, 22, 33).unwrap();
        assert_eq!(jsonify(Value::from(time)).unwrap(), r#""2013-03-27T11:22:33Z""#);
        assert_eq!(jsonify(Value::Nil).unwrap(), "null");
        assert_eq!(jsonify(Value::from(2.5)).unwrap(), "2.5");
        assert_eq!(jsonify(Value::from("<\"é\">")).unwrap(), r#""<\"é\">""#);
    }

    #[test]
    fn test_round_trip() {
        let value = Value::object([
            ("title", Value::from("Hello")),
            ("tags", Value::from(vec!["a", "b"])),
            ("draft", Value::from(false)),
            ("weight", Value::from(1.5)),
            ("parent", Value::Nil),
            ("meta", Value::object([("views", 3)])),
        ]);
        let decoded: Value = serde_json::from_str(&jsonify(&value).unwrap()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_not_encodable() {
        assert_matches!(jsonify(Value::from(f64::NAN)), Err(Error::Encoding(_)));
        assert_matches!(
            jsonify(Value::from(vec![Value::from(f64::INFINITY)])),
            Err(Error::Encoding(_))
        );
    }

    #[test]
    fn test_not_encodable_outside_values() {
        assert_matches!(jsonify(f64::NAN), Err(Error::Encoding(_)));
        assert_matches!(jsonify(vec![1.0f64, f64::INFINITY]), Err(Error::Encoding(_)));
        assert_matches!(jsonify(Some(f32::NEG_INFINITY)), Err(Error::Encoding(_)));
        assert_matches!(
            jsonify_pretty(vec![vec![0.5], vec![f64::NAN]], 2),
            Err(Error::Encoding(_))
        );

        let mut weights = std::collections::BTreeMap::new();
        weights.insert("a", 1.5);
        assert_eq!(jsonify(&weights).unwrap(), r#"{"a":1.5}"#);
        weights.insert("b", f64::INFINITY);
        assert_matches!(jsonify(&weights), Err(Error::Encoding(_)));

        #[derive(Serialize)]
        struct Point {
            x: f64,
            y: (i32, f64),
        }
        assert_eq!(
            jsonify(Point { x: 1.0, y: (2, 3.5) }).unwrap(),
            r#"{"x":1.0,"y":[2,3.5]}"#
        );
        assert_matches!(
            jsonify(Point { x: 1.0, y: (2, f64::NAN) }),
            Err(Error::Encoding(_))
        );
    }

    #[test]
    fn test_pretty() {
        assert_eq!(jsonify_pretty(true, "").unwrap(), "true");
        assert_eq!(
            jsonify_pretty(vec!["foo", "bar"], 2).unwrap(),
            r#"[
  "foo",
  "bar"
]"#
        );
        assert_eq!(
            jsonify_pretty(vec!["foo", "bar"], "\t").unwrap(),
            "[\n\t\"foo\",\n\t\"bar\"\n]"
        );
    }
}
