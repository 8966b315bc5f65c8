use std::error::Error as StdError;
use std::fmt;

use super::try_to_string;
use crate::{Error, Result};

/// Error type returned by [`Converter`] implementations
pub type ConversionError = Box<dyn StdError + Send + Sync>;

/// A text-to-text transform such as a Markdown, Textile or stylesheet compiler
///
/// The filters only hand raw text to a converter and pass its output on; the markup grammar
/// is entirely the converter's business. Closures of the right shape are converters, too.
pub trait Converter: Send + Sync {
    fn convert(&self, raw: &str) -> Result<String, ConversionError>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Result<String, ConversionError> + Send + Sync,
{
    #[inline]
    fn convert(&self, raw: &str) -> Result<String, ConversionError> {
        self(raw)
    }
}

fn run(input: impl fmt::Display, converter: &dyn Converter) -> Result<String> {
    let raw = try_to_string(input)?;
    converter.convert(&raw).map_err(Error::Conversion)
}

/// Renders Markdown text, e.g. with [`Markdown`]
#[inline]
pub fn markdownify(input: impl fmt::Display, converter: &dyn Converter) -> Result<String> {
    run(input, converter)
}

/// Renders Textile text with a host-supplied converter
#[inline]
pub fn textilize(input: impl fmt::Display, converter: &dyn Converter) -> Result<String> {
    run(input, converter)
}

/// Compiles indented-syntax stylesheet source with a host-supplied converter
#[inline]
pub fn sassify(input: impl fmt::Display, converter: &dyn Converter) -> Result<String> {
    run(input, converter)
}

/// Compiles brace-syntax stylesheet source with a host-supplied converter
#[inline]
pub fn scssify(input: impl fmt::Display, converter: &dyn Converter) -> Result<String> {
    run(input, converter)
}

/// CommonMark to HTML
///
/// ```
/// # use site_filters::filters::{markdownify, Markdown};
/// assert_eq!(
///     markdownify("something **really** simple", &Markdown::default())?,
///     "<p>something <strong>really</strong> simple</p>\n",
/// );
/// # Ok::<(), site_filters::Error>(())
/// ```
#[cfg(feature = "markdown")]
#[derive(Debug, Clone, Copy)]
pub struct Markdown {
    options: pulldown_cmark::Options,
}

#[cfg(feature = "markdown")]
impl Markdown {
    /// Plain CommonMark plus the extensions enabled in `config`
    pub fn new(config: &crate::config::MarkdownConfig) -> Self {
        use pulldown_cmark::Options;

        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, config.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
        options.set(Options::ENABLE_TASKLISTS, config.tasklists);
        Self { options }
    }
}

#[cfg(feature = "markdown")]
impl Default for Markdown {
    fn default() -> Self {
        Self::new(&Default::default())
    }
}

#[cfg(feature = "markdown")]
impl Converter for Markdown {
    fn convert(&self, raw: &str) -> Result<String, ConversionError> {
        let parser = pulldown_cmark::Parser::new_ext(raw, self.options);
        let mut html = String::with_capacity(raw.len() + raw.len() / 2);
        pulldown_cmark::html::push_html(&mut html, parser);
        Ok(html)
    }
}
