use std::convert::Infallible;
use std::fmt;

/// Joins items into an English list, e.g. `1, 2, 3, and 4`
///
/// No items give the empty string, one item its own text, two items `A and B`, and more
/// items are separated by commas with `, and` before the last one.
///
/// ```
/// # use site_filters::filters::array_to_sentence_string;
/// assert_eq!(
///     array_to_sentence_string(&["chunky", "bacon", "bits", "pieces"]).unwrap().to_string(),
///     "chunky, bacon, bits, and pieces",
/// );
/// ```
#[inline]
pub fn array_to_sentence_string<T: fmt::Display>(
    items: &[T],
) -> Result<SentenceFilter<'_, '_, T>, Infallible> {
    array_to_sentence_string_with(items, "and")
}

/// Like [`array_to_sentence_string()`], but with another connector word, e.g. `or`
#[inline]
pub fn array_to_sentence_string_with<'a, 'b, T: fmt::Display>(
    items: &'a [T],
    connector: &'b str,
) -> Result<SentenceFilter<'a, 'b, T>, Infallible> {
    Ok(SentenceFilter { items, connector })
}

/// Result of the [`array_to_sentence_string()`] filter
pub struct SentenceFilter<'a, 'b, T> {
    items: &'a [T],
    connector: &'b str,
}

impl<T: fmt::Display> fmt::Display for SentenceFilter<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connector = self.connector;
        match self.items {
            [] => Ok(()),
            [only] => write!(f, "{only}"),
            [first, second] => write!(f, "{first} {connector} {second}"),
            [init @ .., last] => {
                for item in init {
                    write!(f, "{item}, ")?;
                }
                write!(f, "{connector} {last}")
            }
        }
    }
}
