use crate::value::{Lookup, Properties};
use crate::Value;

/// Keeps the records of a sequence whose `property` equals `target`
///
/// Input that is not a sequence is returned unchanged. A missing property compares equal to
/// [`Value::Nil`]; elements that are not records never match.
///
/// ```
/// # use site_filters::filters::r#where;
/// # use site_filters::Value;
/// let shirts = Value::from(vec![
///     Value::object([("color", "red"), ("size", "large")]),
///     Value::object([("color", "red"), ("size", "medium")]),
///     Value::object([("color", "blue"), ("size", "medium")]),
/// ]);
/// let red = r#where(&shirts, "color", &Value::from("red"));
/// assert_eq!(red.as_array().map(<[_]>::len), Some(2));
/// let text = Value::from("some string");
/// assert_eq!(r#where(&text, "la", &Value::from("le")), text);
/// ```
pub fn r#where(input: &Value, property: &str, target: &Value) -> Value {
    match input {
        Value::Array(items) => Value::Array(where_by(items, property, target)),
        _ => input.clone(),
    }
}

/// [`where()`](r#where) over any record-like items
pub fn where_by<T>(items: &[T], property: &str, target: &Value) -> Vec<T>
where
    T: Properties + Clone,
{
    items
        .iter()
        .filter(|item| match item.property(property) {
            Lookup::Present(value) => *value == *target,
            Lookup::Missing => target.is_nil(),
            Lookup::NotARecord => false,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Object;

    fn shirts() -> Vec<Value> {
        vec![
            Value::object([("color", "red"), ("size", "large")]),
            Value::object([("color", "red"), ("size", "medium")]),
            Value::object([("color", "blue"), ("size", "medium")]),
        ]
    }

    #[test]
    fn test_not_a_sequence() {
        let empty = Value::Object(Object::new());
        assert_eq!(r#where(&empty, "", &Value::Nil), empty);
        assert_eq!(
            r#where(&Value::from("some string"), "la", &Value::from("le")),
            Value::from("some string")
        );
    }

    #[test]
    fn test_filters_objects() {
        let matched = where_by(&shirts(), "color", &Value::from("red"));
        assert_eq!(matched.len(), 2);
        let matched = where_by(&shirts(), "size", &Value::from("medium"));
        assert_eq!(matched, shirts()[1..]);
    }

    #[test]
    fn test_missing_matches_nil() {
        let mut items = shirts();
        items.push(Value::object([("size", "small")]));
        items.push(Value::from(7));
        let matched = where_by(&items, "color", &Value::Nil);
        assert_eq!(matched, [Value::object([("size", "small")])]);
    }
}
