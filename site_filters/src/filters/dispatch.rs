use std::fmt;

use chrono::{FixedOffset, Offset, Utc};

use super::{
    array_to_sentence_string, array_to_sentence_string_with, cgi_escape, date_to_long_string,
    date_to_rfc822, date_to_string, date_to_utc, date_to_xmlschema, group_by, jsonify,
    jsonify_pretty, markdownify, r#where, sassify, scssify, sort, textilize, try_to_string,
    uri_escape, xml_escape, Converter, NilOrder,
};
use crate::{Config, DateInput, Error, Result, Value};

/// Every name [`apply()`] answers to
pub const FILTER_NAMES: &[&str] = &[
    "array_to_sentence_string",
    "cgi_escape",
    "date_to_long_string",
    "date_to_rfc822",
    "date_to_string",
    "date_to_utc",
    "date_to_xmlschema",
    "group_by",
    "jsonify",
    "markdownify",
    "sassify",
    "scssify",
    "sort",
    "textilize",
    "uri_escape",
    "where",
    "xml_escape",
];

/// What the host provides to the filters: its timezone and the markup converters
pub struct Context {
    local: FixedOffset,
    markdown: Option<Box<dyn Converter>>,
    textile: Option<Box<dyn Converter>>,
    sass: Option<Box<dyn Converter>>,
    scss: Option<Box<dyn Converter>>,
}

impl Context {
    /// A context for the host timezone `local`
    ///
    /// With the `markdown` feature a CommonMark converter is installed; there are no other
    /// converters until the host adds them.
    pub fn new(local: FixedOffset) -> Self {
        let ctx = Self {
            local,
            markdown: None,
            textile: None,
            sass: None,
            scss: None,
        };
        #[cfg(feature = "markdown")]
        let ctx = ctx.with_markdown(super::Markdown::default());
        ctx
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let ctx = Self::new(config.local_offset()?);
        #[cfg(feature = "markdown")]
        let ctx = ctx.with_markdown(super::Markdown::new(&config.markdown));
        Ok(ctx)
    }

    #[must_use]
    pub fn with_markdown(mut self, converter: impl Converter + 'static) -> Self {
        self.markdown = Some(Box::new(converter));
        self
    }

    #[must_use]
    pub fn with_textile(mut self, converter: impl Converter + 'static) -> Self {
        self.textile = Some(Box::new(converter));
        self
    }

    #[must_use]
    pub fn with_sass(mut self, converter: impl Converter + 'static) -> Self {
        self.sass = Some(Box::new(converter));
        self
    }

    #[must_use]
    pub fn with_scss(mut self, converter: impl Converter + 'static) -> Self {
        self.scss = Some(Box::new(converter));
        self
    }

    #[inline]
    pub fn local_offset(&self) -> FixedOffset {
        self.local
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("local", &self.local)
            .field("markdown", &self.markdown.is_some())
            .field("textile", &self.textile.is_some())
            .field("sass", &self.sass.is_some())
            .field("scss", &self.scss.is_some())
            .finish()
    }
}

/// Runs the filter called `name` on `input`
///
/// `args` are the filter's arguments after its input, in template order:
///
/// * `array_to_sentence_string`: an optional connector word,
/// * `jsonify`: an optional indentation (number of spaces or a string), for indented output,
/// * `sort`: an optional property name (nil for none) and an optional nils order,
/// * `group_by`: the property name,
/// * `where`: the property name and the value to compare with.
///
/// The other filters take no arguments.
pub fn apply(ctx: &Context, name: &str, input: &Value, args: &[Value]) -> Result<Value> {
    tracing::trace!(filter = name, input = input.type_name(), args = args.len(), "apply");
    match name {
        "date_to_string" => {
            no_args(name, args)?;
            text(date_to_string(DateInput::try_from(input)?, ctx.local)?)
        }
        "date_to_long_string" => {
            no_args(name, args)?;
            text(date_to_long_string(DateInput::try_from(input)?, ctx.local)?)
        }
        "date_to_xmlschema" => {
            no_args(name, args)?;
            text(date_to_xmlschema(DateInput::try_from(input)?, ctx.local)?)
        }
        "date_to_rfc822" => {
            no_args(name, args)?;
            text(date_to_rfc822(DateInput::try_from(input)?, ctx.local)?)
        }
        "date_to_utc" => {
            no_args(name, args)?;
            let time = date_to_utc(DateInput::try_from(input)?, ctx.local)?;
            Ok(time.map_or(Value::Nil, Value::Time))
        }
        "xml_escape" => {
            no_args(name, args)?;
            text(xml_escape((!input.is_nil()).then_some(input))?)
        }
        "cgi_escape" => {
            no_args(name, args)?;
            text(cgi_escape(input)?)
        }
        "uri_escape" => {
            no_args(name, args)?;
            text(uri_escape(input)?)
        }
        "array_to_sentence_string" => {
            let items = sequence(name, input)?;
            match args {
                [] => text(array_to_sentence_string(items)?),
                [Value::Str(connector)] => text(array_to_sentence_string_with(items, connector)?),
                _ => Err(invalid_args(name, "an optional connector word", args)),
            }
        }
        "jsonify" => match args {
            [] => Ok(Value::Str(jsonify(input)?)),
            [Value::Str(indent)] => Ok(Value::Str(jsonify_pretty(input, indent)?)),
            [Value::Int(spaces)] => match usize::try_from(*spaces) {
                Ok(spaces) => Ok(Value::Str(jsonify_pretty(input, spaces)?)),
                Err(_) => Err(invalid_args(name, "a non-negative indentation", args)),
            },
            _ => Err(invalid_args(name, "an optional indentation", args)),
        },
        "sort" => {
            if input.is_nil() {
                return Err(Error::InvalidArgument("cannot sort a nil value".into()));
            }
            let items = sequence(name, input)?;
            let (property, nils): (Option<&str>, Option<NilOrder>) = match args {
                [] | [Value::Nil] => (None, None),
                [Value::Str(property)] => (Some(property.as_str()), None),
                [Value::Nil, Value::Str(nils)] => (None, Some(nils.parse()?)),
                [Value::Str(property), Value::Str(nils)] => {
                    (Some(property.as_str()), Some(nils.parse()?))
                }
                _ => {
                    return Err(invalid_args(
                        name,
                        "an optional property name and an optional nils order",
                        args,
                    ));
                }
            };
            Ok(Value::Array(sort(items, property, nils)?))
        }
        "group_by" => {
            let items = sequence(name, input)?;
            let [Value::Str(property)] = args else {
                return Err(invalid_args(name, "a property name", args));
            };
            let groups = group_by(items, property)?;
            Ok(Value::Array(groups.into_iter().map(Value::from).collect()))
        }
        "where" => {
            let [Value::Str(property), target] = args else {
                return Err(invalid_args(name, "a property name and a value", args));
            };
            Ok(r#where(input, property, target))
        }
        "markdownify" => convert(name, ctx.markdown.as_deref(), input, args, |input, converter| {
            markdownify(input, converter)
        }),
        "textilize" => convert(name, ctx.textile.as_deref(), input, args, |input, converter| {
            textilize(input, converter)
        }),
        "sassify" => convert(name, ctx.sass.as_deref(), input, args, |input, converter| {
            sassify(input, converter)
        }),
        "scssify" => convert(name, ctx.scss.as_deref(), input, args, |input, converter| {
            scssify(input, converter)
        }),
        _ => Err(Error::UnknownFilter(name.to_owned())),
    }
}

#[inline]
fn text(value: impl fmt::Display) -> Result<Value> {
    Ok(Value::Str(try_to_string(value)?))
}

fn convert(
    name: &str,
    converter: Option<&dyn Converter>,
    input: &Value,
    args: &[Value],
    filter: fn(&Value, &dyn Converter) -> Result<String>,
) -> Result<Value> {
    no_args(name, args)?;
    let Some(converter) = converter else {
        tracing::warn!(filter = name, "no converter configured");
        return Err(Error::Conversion(
            format!("`{name}` has no converter configured").into(),
        ));
    };
    Ok(Value::Str(filter(input, converter)?))
}

fn no_args(name: &str, args: &[Value]) -> Result<()> {
    match args {
        [] => Ok(()),
        _ => Err(invalid_args(name, "no arguments", args)),
    }
}

fn sequence<'a>(name: &str, input: &'a Value) -> Result<&'a [Value]> {
    input.as_array().ok_or_else(|| {
        Error::InvalidArgument(format!(
            "`{name}` expects a sequence, got a {}",
            input.type_name()
        ))
    })
}

fn invalid_args(name: &str, expected: &str, args: &[Value]) -> Error {
    let got = args.iter().map(Value::type_name).collect::<Vec<_>>();
    Error::InvalidArgument(format!(
        "`{name}` takes {expected}, got [{}]",
        got.join(", ")
    ))
}
