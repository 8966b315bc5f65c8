use std::convert::Infallible;
use std::fmt::{self, Display, Formatter, Write};

/// Escapes text according to `escaper`
///
/// The text is escaped in a single pass: entities already present in the input are plain
/// text as far as the escaper is concerned, so their `&` gets escaped again.
#[inline]
pub fn escape(text: impl fmt::Display, escaper: impl Escaper) -> Result<impl Display, Infallible> {
    Ok(EscapeDisplay(text, escaper))
}

struct EscapeDisplay<T, E>(T, E);
struct EscapeWriter<W, E>(W, E);

impl<T: fmt::Display, E: Escaper> fmt::Display for EscapeDisplay<T, E> {
    #[inline]
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        write!(EscapeWriter(fmt, self.1), "{}", &self.0)
    }
}

impl<W: Write, E: Escaper> Write for EscapeWriter<W, E> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.1.write_escaped_str(&mut self.0, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.1.write_escaped_char(&mut self.0, c)
    }
}

/// Escapes text for XML / HTML content and attribute values
///
/// Nil input yields the empty string.
///
/// ```
/// # use site_filters::filters::xml_escape;
/// assert_eq!(
///     xml_escape(Some("<code>command &lt;filename&gt;</code>")).unwrap().to_string(),
///     "&lt;code&gt;command &amp;lt;filename&amp;gt;&lt;/code&gt;",
/// );
/// assert_eq!(xml_escape(None::<&str>).unwrap().to_string(), "");
/// ```
#[inline]
pub fn xml_escape<T: fmt::Display>(text: Option<T>) -> Result<impl Display, Infallible> {
    struct XmlEscape<T>(Option<T>);

    impl<T: fmt::Display> fmt::Display for XmlEscape<T> {
        #[inline]
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            match &self.0 {
                Some(text) => write!(EscapeWriter(f, Xml), "{text}"),
                None => Ok(()),
            }
        }
    }

    Ok(XmlEscape(text))
}

/// Escape characters with XML's named entities
///
/// * `&` => `&amp;`
/// * `<` => `&lt;`
/// * `>` => `&gt;`
/// * `"` => `&quot;`
/// * `'` => `&apos;`
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Xml {
    #[inline]
    fn entity(byte: u8) -> Option<&'static str> {
        Some(match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&apos;",
            _ => return None,
        })
    }
}

impl Escaper for Xml {
    fn write_escaped_str<W: Write>(&self, mut fmt: W, string: &str) -> fmt::Result {
        let mut last = 0;
        for (index, byte) in string.bytes().enumerate() {
            if let Some(entity) = Self::entity(byte) {
                // every escaped byte is ASCII, so `index` is a char boundary
                fmt.write_str(&string[last..index])?;
                fmt.write_str(entity)?;
                last = index + 1;
            }
        }
        fmt.write_str(&string[last..])
    }

    fn write_escaped_char<W: Write>(&self, mut fmt: W, c: char) -> fmt::Result {
        match c.is_ascii().then(|| Self::entity(c as u8)).flatten() {
            Some(entity) => fmt.write_str(entity),
            None => fmt.write_char(c),
        }
    }
}

pub trait Escaper: Copy {
    fn write_escaped_str<W: Write>(&self, fmt: W, string: &str) -> fmt::Result;

    #[inline]
    fn write_escaped_char<W: Write>(&self, fmt: W, c: char) -> fmt::Result {
        self.write_escaped_str(fmt, c.encode_utf8(&mut [0; 4]))
    }
}

#[test]
fn test_escape() {
    assert_eq!(escape("", Xml).unwrap().to_string(), "");
    assert_eq!(escape("<&>", Xml).unwrap().to_string(), "&lt;&amp;&gt;");
    assert_eq!(escape("bla&", Xml).unwrap().to_string(), "bla&amp;");
    assert_eq!(escape("<foo", Xml).unwrap().to_string(), "&lt;foo");
    assert_eq!(
        escape(r#"say "it's""#, Xml).unwrap().to_string(),
        "say &quot;it&apos;s&quot;"
    );
    assert_eq!(escape("žluťoučký <kůň>", Xml).unwrap().to_string(), "žluťoučký &lt;kůň&gt;");
}

#[test]
fn test_xml_escape() {
    assert_eq!(xml_escape(Some("AT&T")).unwrap().to_string(), "AT&amp;T");
    assert_eq!(
        xml_escape(Some("<code>command &lt;filename&gt;</code>"))
            .unwrap()
            .to_string(),
        "&lt;code&gt;command &amp;lt;filename&amp;gt;&lt;/code&gt;"
    );
    assert_eq!(xml_escape(None::<&str>).unwrap().to_string(), "");
    assert_eq!(xml_escape(Some('&')).unwrap().to_string(), "&amp;");
    assert_eq!(xml_escape(Some(42)).unwrap().to_string(), "42");
}

#[test]
fn test_escaping_plain_text_is_idempotent() {
    let plain = "nothing special here, just text 123";
    let once = xml_escape(Some(plain)).unwrap().to_string();
    let twice = xml_escape(Some(&once)).unwrap().to_string();
    assert_eq!(once, plain);
    assert_eq!(twice, once);
}
