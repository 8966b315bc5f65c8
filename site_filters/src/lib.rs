//! site_filters implements the value-shaping filters a static site templating layer calls
//! while rendering: date coercion and formatting, codepoint-ordered sorting, grouping by a
//! property, sentence joining, compact JSON, and XML / URI escaping.
//!
//! Every filter is a pure function over already-resolved values. Nothing is cached between
//! calls and no global state is read, so filters may run concurrently from any number of
//! rendering tasks. The host timezone in particular is an explicit argument.
//!
//! ```rust
//! use site_filters::filters::{array_to_sentence_string, date_to_string, sort, xml_escape};
//! use site_filters::{Timestamp, Value};
//! # use chrono::FixedOffset;
//! # let utc = FixedOffset::east_opt(0).unwrap();
//!
//! let time = Timestamp::from_utc_ymd_hms(2013, 3, 27, 11, 22, 33).unwrap();
//! assert_eq!(date_to_string(time, utc)?.to_string(), "27 Mar 2013");
//!
//! let words = [Value::from("foo_"), Value::from("_foo"), Value::from("foo")];
//! let words = sort(&words, None, None)?;
//! assert_eq!(array_to_sentence_string(&words)?.to_string(), "_foo, foo, and foo_");
//!
//! assert_eq!(xml_escape(Some("AT&T"))?.to_string(), "AT&amp;T");
//! assert_eq!(xml_escape(None::<Value>)?.to_string(), "");
//! # Ok::<(), site_filters::Error>(())
//! ```
//!
//! Hosts that resolve filters by name can go through [`filters::apply`] with a
//! [`filters::Context`] built from the site [`Config`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(elided_lifetimes_in_paths)]
#![deny(unreachable_pub)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
mod error;
pub mod filters;
pub mod time;
pub mod value;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::time::{DateInput, Timestamp, Zone};
pub use crate::value::{Lookup, Object, Properties, Value};

macro_rules! impl_for_ref {
    (impl $Trait:ident for $T:ident $body:tt) => {
        crate::impl_for_ref! {
            impl<$T> $Trait for [
                &T
                &mut T
                Box<T>
                std::rc::Rc<T>
                std::sync::Arc<T>
            ] $body
        }
    };
    (impl<$T:ident> $Trait:ident for [$($ty:ty)*] $body:tt) => {
        $(impl<$T: $Trait + ?Sized> $Trait for $ty $body)*
    }
}

pub(crate) use impl_for_ref;
