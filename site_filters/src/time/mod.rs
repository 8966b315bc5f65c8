//! Canonical temporal values and the coercion of loosely-typed date input into them.
//!
//! Every date filter goes through [`coerce()`], which accepts a [`DateInput`]: a native
//! [`Timestamp`], text in the grammar described at [`parse()`], or epoch seconds.
//! The host timezone is never read from the environment; it is passed in explicitly as
//! a [`FixedOffset`] and used for epoch seconds and for text without an offset.

mod grammar;

use std::borrow::Cow;
use std::fmt;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};

pub use self::grammar::parse_zone;
use crate::{Error, Result, Value};

/// The zone a [`Timestamp`] is presented in
///
/// `Utc` marks values that are *explicitly* UTC. A zero fixed offset is kept apart from it:
/// the message format renders the former as `-0000` and the latter as `+0000`, and the
/// machine-readable format uses `Z` and `+00:00` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Utc,
    Fixed(FixedOffset),
}

impl Zone {
    /// The numeric offset of this zone; zero for [`Zone::Utc`]
    #[inline]
    pub fn offset(self) -> FixedOffset {
        match self {
            Zone::Utc => Utc.fix(),
            Zone::Fixed(offset) => offset,
        }
    }

    #[inline]
    pub fn is_utc(self) -> bool {
        matches!(self, Zone::Utc)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("UTC"),
            Zone::Fixed(offset) => write_offset(f, *offset, ""),
        }
    }
}

/// Writes `offset` as `+HHMM` (or `+HH:MM` with `separator = ":"`)
pub(crate) fn write_offset(
    f: &mut impl fmt::Write,
    offset: FixedOffset,
    separator: &str,
) -> fmt::Result {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    write!(f, "{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

/// The canonical temporal value: a UTC-normalized instant plus the zone it is shown in
///
/// Formatting never changes a `Timestamp`; conversions return new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    zone: Zone,
}

impl Timestamp {
    /// An instant that is explicitly UTC
    #[inline]
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            zone: Zone::Utc,
        }
    }

    /// An instant presented at a fixed offset
    #[inline]
    pub fn fixed(datetime: DateTime<FixedOffset>) -> Self {
        Self {
            instant: datetime.with_timezone(&Utc),
            zone: Zone::Fixed(*datetime.offset()),
        }
    }

    /// Builds an explicit UTC timestamp from calendar fields, `None` if any is out of range
    pub fn from_utc_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        Some(Self::utc(Utc.from_utc_datetime(&naive)))
    }

    /// Whole epoch seconds, presented in the host's `local` offset
    pub fn from_epoch(seconds: i64, local: FixedOffset) -> Result<Self> {
        let instant = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::InvalidTemporalInput(format!("{seconds} is out of range")))?;
        Ok(Self::at_local(instant, local))
    }

    /// Fractional epoch seconds, presented in the host's `local` offset
    pub fn from_epoch_f64(seconds: f64, local: FixedOffset) -> Result<Self> {
        let out_of_range = || Error::InvalidTemporalInput(format!("{seconds} is out of range"));
        if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let whole = seconds.floor();
        let mut secs = whole as i64;
        let mut nanos = ((seconds - whole) * 1e9).round() as u32;
        if nanos >= 1_000_000_000 {
            secs += 1;
            nanos -= 1_000_000_000;
        }
        let instant = DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)?;
        Ok(Self::at_local(instant, local))
    }

    fn at_local(instant: DateTime<Utc>, local: FixedOffset) -> Self {
        Self {
            instant,
            zone: Zone::Fixed(local),
        }
    }

    /// Combines a wall-clock reading with the zone it was read in
    pub(crate) fn from_naive(naive: NaiveDateTime, zone: Zone) -> Option<Self> {
        let instant = match zone {
            Zone::Utc => Utc.from_utc_datetime(&naive),
            Zone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()?
                .with_timezone(&Utc),
        };
        Some(Self { instant, zone })
    }

    /// The UTC-normalized instant
    #[inline]
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub fn is_utc(&self) -> bool {
        self.zone.is_utc()
    }

    /// The wall-clock reading in this timestamp's own zone
    #[inline]
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.instant.with_timezone(&self.zone.offset())
    }

    /// The same instant, re-tagged as explicitly UTC
    #[inline]
    pub fn to_utc(&self) -> Self {
        Self::utc(self.instant)
    }

    /// Machine-readable form: `T` separator, `Z` for UTC values, fraction only when present
    pub fn to_xmlschema(&self) -> String {
        self.local()
            .to_rfc3339_opts(SecondsFormat::AutoSi, self.is_utc())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    #[inline]
    fn from(instant: DateTime<Utc>) -> Self {
        Self::utc(instant)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    #[inline]
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self::fixed(datetime)
    }
}

/// `2013-03-27 11:22:33 UTC`, or `2014-05-10 00:10:07 +0000` for fixed offsets
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.local().format("%Y-%m-%d %H:%M:%S"), self.zone)
    }
}

/// Anything a date filter accepts
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput<'a> {
    /// Absent input; formatters render it as the empty string
    Nil,
    Time(Timestamp),
    Text(Cow<'a, str>),
    Epoch(i64),
    EpochFloat(f64),
}

impl From<Timestamp> for DateInput<'_> {
    #[inline]
    fn from(value: Timestamp) -> Self {
        DateInput::Time(value)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Time(value.into())
    }
}

impl From<DateTime<FixedOffset>> for DateInput<'_> {
    #[inline]
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateInput::Time(value.into())
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        DateInput::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    #[inline]
    fn from(value: &'a String) -> Self {
        DateInput::Text(Cow::Borrowed(value))
    }
}

impl From<String> for DateInput<'_> {
    #[inline]
    fn from(value: String) -> Self {
        DateInput::Text(Cow::Owned(value))
    }
}

macro_rules! epoch_from_int {
    ($($ty:ty),+) => { $(
        impl From<$ty> for DateInput<'_> {
            #[inline]
            fn from(value: $ty) -> Self {
                DateInput::Epoch(value.into())
            }
        }
    )+ };
}

epoch_from_int!(i64, i32, u32);

impl From<f64> for DateInput<'_> {
    #[inline]
    fn from(value: f64) -> Self {
        DateInput::EpochFloat(value)
    }
}

impl<'a, T: Into<DateInput<'a>>> From<Option<T>> for DateInput<'a> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(DateInput::Nil, Into::into)
    }
}

impl<'a> TryFrom<&'a Value> for DateInput<'a> {
    type Error = Error;

    fn try_from(value: &'a Value) -> Result<Self> {
        Ok(match value {
            Value::Nil => DateInput::Nil,
            Value::Time(time) => DateInput::Time(*time),
            Value::Str(text) => DateInput::Text(Cow::Borrowed(text)),
            Value::Int(seconds) => DateInput::Epoch(*seconds),
            Value::Float(seconds) => DateInput::EpochFloat(*seconds),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidTemporalInput(format!(
                    "a {} is not a date",
                    value.type_name()
                )));
            }
        })
    }
}

/// Normalizes date input into a [`Timestamp`]
///
/// * native timestamps pass through untouched,
/// * epoch seconds are taken as UTC instants and presented in `local`,
/// * text is parsed with [`parse()`]; zone-less text is read as wall-clock time in `local`,
/// * [`DateInput::Nil`] yields `None`.
///
/// Text that cannot be parsed is an [`Error::InvalidTemporalInput`], never a zero date.
pub fn coerce(input: DateInput<'_>, local: FixedOffset) -> Result<Option<Timestamp>> {
    match input {
        DateInput::Nil => Ok(None),
        DateInput::Time(time) => Ok(Some(time)),
        DateInput::Epoch(seconds) => Timestamp::from_epoch(seconds, local).map(Some),
        DateInput::EpochFloat(seconds) => Timestamp::from_epoch_f64(seconds, local).map(Some),
        DateInput::Text(text) => parse(&text, local).map(Some),
    }
}

/// Parses date text
///
/// Accepted shapes, all case-insensitive:
///
/// * `2013-03-27`, `2013/03/27`, optionally followed by `T` or a space and a time
/// * `September 11, 2001`, `11 Sep 2001`, optionally led by a weekday name
/// * times `HH:MM`, `HH:MM:SS`, `HH:MM:SS.fraction`, optionally with `am` / `pm`, and a
///   bare hour with a meridian (`1pm`, `12 am`)
/// * zones `Z`, `UTC`, `GMT`, `±HH`, `±HHMM`, `±HH:MM`
pub fn parse(text: &str, local: FixedOffset) -> Result<Timestamp> {
    grammar::parse(text, Zone::Fixed(local)).map_err(|reason| {
        tracing::debug!(input = text, reason, "unparseable date text");
        Error::InvalidTemporalInput(format!("{text:?}: {reason}"))
    })
}
