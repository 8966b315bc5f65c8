//! Module for the filter functions
//!
//! Each filter is a free function taking already-resolved values. Filters that cannot fail
//! return `Result<_, Infallible>` so all of them compose the same way with `?`. Filters that
//! produce text return a small [`Display`](std::fmt::Display) type which writes its output
//! lazily, so hosts can stream straight into their render buffer.
//!
//! [`apply()`] offers the same filters by name, operating on [`Value`](crate::Value)s.

mod convert;
mod date;
mod dispatch;
mod escape;
mod group_by;
mod json;
mod select;
mod sentence;
mod sort;
mod urlencode;

#[cfg(feature = "markdown")]
pub use convert::Markdown;
pub use convert::{markdownify, sassify, scssify, textilize, ConversionError, Converter};
pub use date::{
    date_to_long_string, date_to_rfc822, date_to_string, date_to_utc, date_to_xmlschema,
    DateFilter,
};
pub use dispatch::{apply, Context, FILTER_NAMES};
pub use escape::{escape, xml_escape, Escaper, Xml};
pub use group_by::{group_by, Group, GroupKey};
pub use json::{jsonify, jsonify_pretty, AsIndent};
pub use select::{r#where, where_by};
pub use sentence::{array_to_sentence_string, array_to_sentence_string_with, SentenceFilter};
pub use sort::{compare_values, sort, sort_by_property, NilOrder};
pub use urlencode::{cgi_escape, uri_escape, UrlencodeFilter};

fn try_to_string(s: impl std::fmt::Display) -> Result<String, std::fmt::Error> {
    use std::fmt::Write;

    let mut result = String::new();
    write!(result, "{s}")?;
    Ok(result)
}
