use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serialize, Serializer};

use crate::time::Timestamp;

/// An insertion-ordered record
pub type Object = IndexMap<String, Value>;

/// A loosely-typed value as handed over by the templating host
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Time(Timestamp),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Builds a record from `(name, value)` pairs, keeping their order
    pub fn object<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short human name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
            Value::Object(_) => "record",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// The natural text form of a value
///
/// Integral floats keep a trailing `.0`. Floats of magnitude `1e16` and above, or below
/// `1e-4`, switch to exponent form with a signed two-digit exponent (`1.0e+16`, `1.5e-05`).
/// Sequences render as the concatenation of their elements and records as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => f.write_str(itoa::Buffer::new().format(*i)),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => f.write_str(s),
            Value::Time(time) => write!(f, "{time}"),
            Value::Array(items) => items.iter().try_for_each(|item| write!(f, "{item}")),
            Value::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    } else if x.is_infinite() {
        return f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }

    let magnitude = x.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return match x.fract() == 0.0 {
            true => write!(f, "{x:.1}"),
            false => write!(f, "{x}"),
        };
    }

    // `{:e}` is the shortest round-trip mantissa, e.g. `1e16` or `-2.5e-7`
    let text = format!("{x:e}");
    let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
    let point = if mantissa.contains('.') { "" } else { ".0" };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    write!(f, "{mantissa}{point}e{sign}{digits:0>2}")
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $conv:expr),+ $(,)?) => { $(
        impl From<$ty> for Value {
            #[inline]
            fn from($v: $ty) -> Self {
                $conv
            }
        }
    )+ };
}

value_from! {
    bool => |v| Value::Bool(v),
    i8 => |v| Value::Int(v.into()),
    i16 => |v| Value::Int(v.into()),
    i32 => |v| Value::Int(v.into()),
    i64 => |v| Value::Int(v),
    u8 => |v| Value::Int(v.into()),
    u16 => |v| Value::Int(v.into()),
    u32 => |v| Value::Int(v.into()),
    f32 => |v| Value::Float(v.into()),
    f64 => |v| Value::Float(v),
    String => |v| Value::Str(v),
    &str => |v| Value::Str(v.to_owned()),
    Cow<'_, str> => |v| Value::Str(v.into_owned()),
    Timestamp => |v| Value::Time(v),
    DateTime<Utc> => |v| Value::Time(v.into()),
    Object => |v| Value::Object(v),
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    #[inline]
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::Float(x) => Err(ser::Error::custom(format_args!(
                "{x} has no JSON representation"
            ))),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Time(time) => serializer.serialize_str(&time.to_xmlschema()),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(object) => serializer.collect_map(object),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Str(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Str(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut object = Object::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}

/// Outcome of looking a property up on a record-like item
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// The property exists; an explicit nil is `Present(Value::Nil)`
    Present(Cow<'a, Value>),
    /// The item is a record, but has no such property
    Missing,
    /// The item offers no property access at all
    NotARecord,
}

impl Lookup<'_> {
    /// The present, non-nil value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            Lookup::Present(value) if !value.is_nil() => Some(value),
            _ => None,
        }
    }
}

/// Property access for record-like items
///
/// Sorting by a property and grouping only ever read items through this trait, so host
/// types (pages, documents, ...) can take part without being converted into [`Value`]s.
pub trait Properties {
    fn property(&self, name: &str) -> Lookup<'_>;

    /// How the item is named in error messages
    #[inline]
    fn type_name(&self) -> &'static str {
        "record"
    }
}

crate::impl_for_ref! {
    impl Properties for T {
        #[inline]
        fn property(&self, name: &str) -> Lookup<'_> {
            T::property(self, name)
        }

        #[inline]
        fn type_name(&self) -> &'static str {
            T::type_name(self)
        }
    }
}

impl Properties for Value {
    #[inline]
    fn property(&self, name: &str) -> Lookup<'_> {
        match self {
            Value::Object(object) => object.property(name),
            _ => Lookup::NotARecord,
        }
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }
}

impl<K, S> Properties for IndexMap<K, Value, S>
where
    K: Borrow<str> + Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn property(&self, name: &str) -> Lookup<'_> {
        self.get(name)
            .map_or(Lookup::Missing, |value| Lookup::Present(Cow::Borrowed(value)))
    }
}

impl<K> Properties for BTreeMap<K, Value>
where
    K: Borrow<str> + Ord,
{
    #[inline]
    fn property(&self, name: &str) -> Lookup<'_> {
        self.get(name)
            .map_or(Lookup::Missing, |value| Lookup::Present(Cow::Borrowed(value)))
    }
}

impl<K, S> Properties for HashMap<K, Value, S>
where
    K: Borrow<str> + Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn property(&self, name: &str) -> Lookup<'_> {
        self.get(name)
            .map_or(Lookup::Missing, |value| Lookup::Present(Cow::Borrowed(value)))
    }
}
