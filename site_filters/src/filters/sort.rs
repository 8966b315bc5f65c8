use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::value::{Lookup, Properties};
use crate::{Error, Result, Value};

/// Where items without a sort key end up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NilOrder {
    /// Before every item that has a key
    #[default]
    First,
    /// After every item that has a key
    Last,
}

impl NilOrder {
    /// How a keyless item orders against an item with a key
    #[inline]
    fn nil_vs_present(self) -> Ordering {
        match self {
            NilOrder::First => Ordering::Less,
            NilOrder::Last => Ordering::Greater,
        }
    }
}

impl FromStr for NilOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(NilOrder::First),
            "last" => Ok(NilOrder::Last),
            _ => Err(Error::InvalidArgument(format!(
                "'{s}' is not a valid nils order, it must be 'first' or 'last'"
            ))),
        }
    }
}

/// Total order used by [`sort()`]
///
/// Numbers compare by magnitude regardless of integer / float representation, text by code
/// point (so `"FOO" < "Foo" < "foo"`), timestamps by instant, and sequences element-wise.
/// Any other pairing, including records, is an [`Error::IncomparableTypes`].
pub fn compare_values(left: &Value, right: &Value) -> Result<Ordering> {
    let ordering = match (left, right) {
        (Value::Nil, Value::Nil) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
        (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).map(Ordering::reverse),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        // UTF-8 byte order is code point order
        (Value::Str(a), Value::Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Time(a), Value::Time(b)) => Some(a.instant().cmp(&b.instant())),
        (Value::Array(a), Value::Array(b)) => {
            for (a, b) in a.iter().zip(b) {
                match compare_values(a, b)? {
                    Ordering::Equal => continue,
                    ordering => return Ok(ordering),
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    };
    ordering.ok_or_else(|| Error::incomparable(left, right))
}

/// Exact comparison, `i64 as f64` rounds above 2^53
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float above every i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        None
    } else if float >= LIMIT {
        Some(Ordering::Less)
    } else if float < -LIMIT {
        Some(Ordering::Greater)
    } else {
        let whole = float.floor();
        // in range: -2^63 <= whole < 2^63
        let ordering = int.cmp(&(whole as i64));
        Some(ordering.then(match float > whole {
            true => Ordering::Less,
            false => Ordering::Equal,
        }))
    }
}

/// Sorts values, optionally by a property of each (record) element
///
/// The sort is stable. Without `property` the elements themselves are compared with
/// [`compare_values()`]; with it see [`sort_by_property()`]. `nils` defaults to
/// [`NilOrder::First`] and only matters when sorting by a property.
///
/// ```
/// # use site_filters::filters::{sort, NilOrder};
/// # use site_filters::Value;
/// let items = [
///     Value::object([("a", 2)]),
///     Value::object([("b", 1)]),
///     Value::object([("a", 1)]),
/// ];
/// let sorted = sort(&items, Some("a"), Some(NilOrder::Last))?;
/// assert_eq!(sorted, [items[2].clone(), items[0].clone(), items[1].clone()]);
/// # Ok::<(), site_filters::Error>(())
/// ```
pub fn sort(input: &[Value], property: Option<&str>, nils: Option<NilOrder>) -> Result<Vec<Value>> {
    let sorted = match property {
        None => merge_sort(input.to_vec(), &mut |a: &Value, b: &Value| {
            compare_values(a, b)
        }),
        Some(property) => sort_by_property(input, property, nils.unwrap_or_default()),
    };
    sorted.inspect_err(|err| tracing::debug!(%err, "sort failed"))
}

/// Stable sort of record-like items by the value of `property`
///
/// Items where the property is missing or explicitly nil form one group, kept in input
/// order, which is placed according to `nils`. An item that is not a record at all has
/// nothing to order by, so it is an [`Error::IncomparableTypes`] like any other pair of
/// keys without a common ordering.
pub fn sort_by_property<T>(items: &[T], property: &str, nils: NilOrder) -> Result<Vec<T>>
where
    T: Properties + Clone,
{
    let mut keyed = Vec::with_capacity(items.len());
    for item in items {
        let key = match item.property(property) {
            Lookup::Present(value) if !value.is_nil() => Some(value),
            Lookup::Present(_) | Lookup::Missing => None,
            Lookup::NotARecord => {
                return Err(Error::IncomparableTypes {
                    left: item.type_name(),
                    right: "record",
                });
            }
        };
        keyed.push((key, item));
    }

    type Keyed<'a, T> = (Option<Cow<'a, Value>>, &'a T);
    let sorted = merge_sort(keyed, &mut |(a, _): &Keyed<'_, T>, (b, _): &Keyed<'_, T>| {
        match (a, b) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(nils.nil_vs_present()),
            (Some(_), None) => Ok(nils.nil_vs_present().reverse()),
            (Some(a), Some(b)) => compare_values(a, b),
        }
    })?;
    Ok(sorted.into_iter().map(|(_, item)| item.clone()).collect())
}

/// Top-down merge sort with a fallible comparison
///
/// `slice::sort_by` has no way to abort, and an inconsistent comparator may make it panic.
fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Result<Vec<T>>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // only a strictly smaller right item may overtake, equal items keep input order
        match compare(r, l)? {
            Ordering::Less => merged.extend(right.next()),
            _ => merged.extend(left.next()),
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
