use std::convert::Infallible;
use std::fmt::{self, Write};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Form-encoding set: only the unreserved characters of
// https://tools.ietf.org/html/rfc3986.html#section-2.3 stay unencoded.
// Spaces are written as `+` before this set is consulted.
const CGI_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

// Unreserved characters, the marks `!*'()`, and the reserved URI delimiters stay as they are,
// so a whole URI can be passed through. `%`, `#`, space and non-ASCII are encoded.
const URI_SET: &AsciiSet = &CGI_SET
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'[')
    .remove(b']');

/// Escapes text for a query component, writing spaces as `+`
///
/// Encodes all characters except ASCII letters, digits, and `_.-~`.
///
/// ```
/// # use site_filters::filters::cgi_escape;
/// assert_eq!(cgi_escape("my things").unwrap().to_string(), "my+things");
/// assert_eq!(cgi_escape("hey!").unwrap().to_string(), "hey%21");
/// ```
#[inline]
pub fn cgi_escape<T>(s: T) -> Result<UrlencodeFilter<T>, Infallible> {
    Ok(UrlencodeFilter {
        value: s,
        set: CGI_SET,
        space_as_plus: true,
    })
}

/// Percent-encodes text for use in a URI, writing spaces as `%20`
///
/// Reserved URI delimiters (`/?:@&=+$,;[]`) and the marks `!*'()` are kept, so whole URIs
/// can be escaped without breaking them apart.
///
/// ```
/// # use site_filters::filters::uri_escape;
/// assert_eq!(uri_escape("my things").unwrap().to_string(), "my%20things");
/// ```
#[inline]
pub fn uri_escape<T>(s: T) -> Result<UrlencodeFilter<T>, Infallible> {
    Ok(UrlencodeFilter {
        value: s,
        set: URI_SET,
        space_as_plus: false,
    })
}

pub struct UrlencodeFilter<T> {
    value: T,
    set: &'static AsciiSet,
    space_as_plus: bool,
}

impl<T: fmt::Display> fmt::Display for UrlencodeFilter<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = UrlencodeWriter {
            dest: f,
            set: self.set,
            space_as_plus: self.space_as_plus,
        };
        write!(writer, "{}", self.value)
    }
}

struct UrlencodeWriter<W> {
    dest: W,
    set: &'static AsciiSet,
    space_as_plus: bool,
}

impl<W: fmt::Write> fmt::Write for UrlencodeWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.space_as_plus {
            return write!(self.dest, "{}", utf8_percent_encode(s, self.set));
        }
        for (index, part) in s.split(' ').enumerate() {
            if index > 0 {
                self.dest.write_char('+')?;
            }
            write!(self.dest, "{}", utf8_percent_encode(part, self.set))?;
        }
        Ok(())
    }
}
