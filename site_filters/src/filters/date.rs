use std::fmt;

use chrono::FixedOffset;

use crate::time::{coerce, write_offset, DateInput, Timestamp};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateFormat {
    Short,
    Long,
    XmlSchema,
    Rfc822,
}

/// A coerced date waiting to be written in one of the fixed formats
///
/// Absent input writes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    time: Option<Timestamp>,
    format: DateFormat,
}

impl DateFilter {
    fn new<'a>(
        input: impl Into<DateInput<'a>>,
        local: FixedOffset,
        format: DateFormat,
    ) -> Result<Self> {
        let time = coerce(input.into(), local)?;
        Ok(Self { time, format })
    }

    /// The coerced timestamp, `None` for nil input
    #[inline]
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.time
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(time) = self.time else {
            return Ok(());
        };
        let local = time.local();
        match self.format {
            DateFormat::Short => write!(f, "{}", local.format("%-d %b %Y")),
            DateFormat::Long => write!(f, "{}", local.format("%-d %B %Y")),
            DateFormat::XmlSchema => f.write_str(&time.to_xmlschema()),
            DateFormat::Rfc822 => {
                write!(f, "{} ", local.format("%a, %d %b %Y %H:%M:%S"))?;
                match time.is_utc() {
                    true => f.write_str("-0000"),
                    false => write_offset(f, *local.offset(), ""),
                }
            }
        }
    }
}

/// Formats a date in short format, e.g. `27 Mar 2013`
///
/// `local` is the host timezone. It applies to epoch seconds and to text without an
/// offset; native timestamps and text with an offset keep their own zone.
#[inline]
pub fn date_to_string<'a>(
    input: impl Into<DateInput<'a>>,
    local: FixedOffset,
) -> Result<DateFilter> {
    DateFilter::new(input, local, DateFormat::Short)
}

/// Formats a date in long format, e.g. `27 March 2013`
#[inline]
pub fn date_to_long_string<'a>(
    input: impl Into<DateInput<'a>>,
    local: FixedOffset,
) -> Result<DateFilter> {
    DateFilter::new(input, local, DateFormat::Long)
}

/// Formats a date for XML Schema / ISO 8601, e.g. `2013-03-27T11:22:33Z`
///
/// Explicit UTC values end in `Z`, everything else in a numeric offset. Fractional seconds
/// are written only when the value has them.
#[inline]
pub fn date_to_xmlschema<'a>(
    input: impl Into<DateInput<'a>>,
    local: FixedOffset,
) -> Result<DateFilter> {
    DateFilter::new(input, local, DateFormat::XmlSchema)
}

/// Formats a date as used in e-mail headers and feeds, e.g. `Wed, 27 Mar 2013 11:22:33 -0000`
///
/// Explicit UTC values get the `-0000` offset, all others their numeric offset, so a value
/// read at a zero offset prints `+0000`.
#[inline]
pub fn date_to_rfc822<'a>(
    input: impl Into<DateInput<'a>>,
    local: FixedOffset,
) -> Result<DateFilter> {
    DateFilter::new(input, local, DateFormat::Rfc822)
}

/// Converts a date to the same instant, tagged as UTC
#[inline]
pub fn date_to_utc<'a>(
    input: impl Into<DateInput<'a>>,
    local: FixedOffset,
) -> Result<Option<Timestamp>> {
    Ok(coerce(input.into(), local)?.map(|time| time.to_utc()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::Error;

    const NUMERIC: i64 = 1399680607;
    const TEXT: &str = "September 11, 2001 12:46:30 -0000";

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn sample_time() -> Timestamp {
        Timestamp::from_utc_ymd_hms(2013, 3, 27, 11, 22, 33).unwrap()
    }

    #[test]
    fn test_time_object() {
        let time = sample_time();
        assert_eq!(date_to_string(time, utc()).unwrap().to_string(), "27 Mar 2013");
        assert_eq!(
            date_to_long_string(time, utc()).unwrap().to_string(),
            "27 March 2013"
        );
        assert_eq!(
            date_to_xmlschema(time, utc()).unwrap().to_string(),
            "2013-03-27T11:22:33Z"
        );
        assert_eq!(
            date_to_rfc822(time, utc()).unwrap().to_string(),
            "Wed, 27 Mar 2013 11:22:33 -0000"
        );
    }

    #[test]
    fn test_string_object() {
        assert_eq!(date_to_string(TEXT, utc()).unwrap().to_string(), "11 Sep 2001");
        assert_eq!(
            date_to_long_string(TEXT, utc()).unwrap().to_string(),
            "11 September 2001"
        );
        assert_eq!(
            date_to_xmlschema(TEXT, utc()).unwrap().to_string(),
            "2001-09-11T12:46:30Z"
        );
        assert_eq!(
            date_to_rfc822(TEXT, utc()).unwrap().to_string(),
            "Tue, 11 Sep 2001 12:46:30 -0000"
        );
    }

    #[test]
    fn test_numeric_object() {
        assert_eq!(date_to_string(NUMERIC, utc()).unwrap().to_string(), "10 May 2014");
        assert_eq!(
            date_to_long_string(NUMERIC, utc()).unwrap().to_string(),
            "10 May 2014"
        );
        assert_eq!(
            date_to_xmlschema(NUMERIC, utc()).unwrap().to_string(),
            "2014-05-10T00:10:07+00:00"
        );
        assert_eq!(
            date_to_rfc822(NUMERIC, utc()).unwrap().to_string(),
            "Sat, 10 May 2014 00:10:07 +0000"
        );
    }

    #[test]
    fn test_day_padding() {
        let time = Timestamp::from_utc_ymd_hms(2014, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(date_to_string(time, utc()).unwrap().to_string(), "1 Jun 2014");
        assert_eq!(
            date_to_rfc822(time, utc()).unwrap().to_string(),
            "Sun, 01 Jun 2014 08:00:00 -0000"
        );
    }

    #[test]
    fn test_host_offset() {
        let two_east = FixedOffset::east_opt(7200).unwrap();
        assert_eq!(
            date_to_rfc822(NUMERIC, two_east).unwrap().to_string(),
            "Sat, 10 May 2014 02:10:07 +0200"
        );
        // text with its own offset ignores the host offset
        assert_eq!(
            date_to_xmlschema(TEXT, two_east).unwrap().to_string(),
            "2001-09-11T12:46:30Z"
        );
    }

    #[test]
    fn test_nil_and_errors() {
        assert_eq!(date_to_string(None::<&str>, utc()).unwrap().to_string(), "");
        assert_matches!(
            date_to_string("the day after tomorrow", utc()),
            Err(Error::InvalidTemporalInput(_))
        );
    }

    #[test]
    fn test_date_to_utc() {
        let utc_time = date_to_utc(NUMERIC, utc()).unwrap().unwrap();
        assert!(utc_time.is_utc());
        assert_eq!(utc_time.to_xmlschema(), "2014-05-10T00:10:07Z");
        assert_eq!(date_to_utc(DateInput::Nil, utc()).unwrap(), None);
    }
}
