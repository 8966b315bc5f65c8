use std::collections::HashMap;

use serde::Serialize;

use crate::value::{Lookup, Properties};
use crate::{Error, Object, Result, Value};

/// What put an item into a [`Group`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// The text form of a present, non-nil property value
    Value(String),
    /// The property is present but nil
    Nil,
    /// The record has no such property
    Missing,
}

impl GroupKey {
    /// The bucket name: the value's text, `"nil"`, or `""`
    pub fn name(&self) -> &str {
        match self {
            GroupKey::Value(name) => name,
            GroupKey::Nil => "nil",
            GroupKey::Missing => "",
        }
    }
}

/// One bucket of [`group_by()`]
///
/// Serializes (e.g. with [`jsonify()`](super::jsonify)) as `{"name": ..., "items": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<T> {
    pub name: String,
    #[serde(skip)]
    pub key: GroupKey,
    pub items: Vec<T>,
}

impl<T: Into<Value>> From<Group<T>> for Value {
    fn from(group: Group<T>) -> Self {
        let mut object = Object::with_capacity(2);
        object.insert("name".to_owned(), Value::Str(group.name));
        object.insert("items".to_owned(), Value::from(group.items));
        Value::Object(object)
    }
}

/// Groups records by the text form of `property`
///
/// Buckets for present values come first, in the order their value was first seen. They are
/// followed by the `"nil"` bucket (property present but nil) and then the `""` bucket
/// (property absent), each only if non-empty. Items keep their input order within a bucket
/// and every item lands in exactly one bucket.
///
/// A present text value `"nil"` or `""` makes an ordinary value bucket; it is not merged
/// into the nil or missing bucket.
///
/// Items without property access are an [`Error::InvalidGroupInput`].
pub fn group_by<T>(items: &[T], property: &str) -> Result<Vec<Group<T>>>
where
    T: Properties + Clone,
{
    let mut groups: Vec<Group<T>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut nil = Vec::new();
    let mut missing = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match item.property(property) {
            Lookup::Present(value) if value.is_nil() => nil.push(item.clone()),
            Lookup::Present(value) => {
                let name = value.to_string();
                match positions.get(&name) {
                    Some(&position) => groups[position].items.push(item.clone()),
                    None => {
                        positions.insert(name.clone(), groups.len());
                        groups.push(Group {
                            key: GroupKey::Value(name.clone()),
                            name,
                            items: vec![item.clone()],
                        });
                    }
                }
            }
            Lookup::Missing => missing.push(item.clone()),
            Lookup::NotARecord => {
                return Err(Error::InvalidGroupInput(format!(
                    "item {index} by `{property}`"
                )));
            }
        }
    }

    for (key, items) in [(GroupKey::Nil, nil), (GroupKey::Missing, missing)] {
        if !items.is_empty() {
            groups.push(Group {
                name: key.name().to_owned(),
                key,
                items,
            });
        }
    }
    Ok(groups)
}
