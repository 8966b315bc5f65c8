//! Shared fixtures for the integration tests

use std::borrow::Cow;

use chrono::{FixedOffset, Offset, Utc};
use site_filters::{Lookup, Properties, Value};

/// The host offset used throughout the tests
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// A host-side document type that is not a [`Value`]
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub layout: Option<String>,
    pub weight: Option<i64>,
}

impl Page {
    pub fn new(title: &str, layout: Option<&str>, weight: Option<i64>) -> Self {
        Self {
            title: title.to_owned(),
            layout: layout.map(str::to_owned),
            weight,
        }
    }
}

impl Properties for Page {
    fn property(&self, name: &str) -> Lookup<'_> {
        match name {
            "title" => Lookup::Present(Cow::Owned(Value::from(self.title.as_str()))),
            "layout" => Lookup::Present(Cow::Owned(Value::from(self.layout.as_deref()))),
            "weight" => Lookup::Present(Cow::Owned(Value::from(self.weight))),
            _ => Lookup::Missing,
        }
    }
}

/// Parses JSON into a [`Value`], keeping key order
pub fn value(json: &str) -> Value {
    serde_json::from_str(json).unwrap()
}
