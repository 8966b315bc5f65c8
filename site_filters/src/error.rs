use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// The [`Result`](std::result::Result) type with [`Error`] as default error type
pub type Result<I, E = Error> = std::result::Result<I, E>;

/// site_filters error type
///
/// Every filter fails fast with one of these variants instead of falling back to a default
/// value. The only documented defaults are a nil input to [`xml_escape`] (empty output),
/// nil input to the date formatters (empty output), and nil sort/group keys, which are placed
/// in their designated position or bucket.
///
/// [`xml_escape`]: crate::filters::xml_escape
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Text that could not be parsed as a date, or a value of a type that has no temporal
    /// meaning (booleans, sequences, records)
    #[error("invalid date: {0}")]
    InvalidTemporalInput(String),
    /// Two sort keys whose types have no common ordering, or an element that is not a
    /// record when sorting by a property
    #[error("cannot compare {left} with {right}")]
    IncomparableTypes {
        left: &'static str,
        right: &'static str,
    },
    /// A group-by element that does not offer property access
    #[error("cannot group {0}: element is not a record")]
    InvalidGroupInput(String),
    /// A value that cannot be represented as JSON
    #[error("cannot encode value as JSON: {0}")]
    Encoding(String),
    /// An argument the filter does not accept, e.g. an unknown nil order
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// [`apply`](crate::filters::apply) was called with a name no filter answers to
    #[error("no filter named `{0}`")]
    UnknownFilter(String),
    /// A pass-through converter (Markdown, Textile, stylesheet) failed
    #[error("conversion failed: {0}")]
    Conversion(#[source] Box<dyn StdError + Send + Sync>),
    /// The host configuration could not be loaded or contains an invalid setting
    #[error("configuration error: {0}")]
    Config(String),
    /// Formatting error while writing a filter result
    #[error("formatting error")]
    Fmt,
}

impl Error {
    /// Helper for [`Error::IncomparableTypes`] that names both sides by their type
    pub(crate) fn incomparable(left: &crate::Value, right: &crate::Value) -> Self {
        Error::IncomparableTypes {
            left: left.type_name(),
            right: right.type_name(),
        }
    }
}

impl From<fmt::Error> for Error {
    #[inline]
    fn from(_: fmt::Error) -> Self {
        Error::Fmt
    }
}

impl From<serde_json::Error> for Error {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<Infallible> for Error {
    #[inline]
    fn from(value: Infallible) -> Self {
        match value {}
    }
}
