use chrono::{FixedOffset, NaiveDate, NaiveTime};

use super::{Timestamp, Zone};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

type Reason = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Number(&'a str),
    Date { year: i32, month: u32, day: u32 },
    Time(Clock),
    Offset(Zone),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    hour: u32,
    minute: u32,
    second: u32,
    nano: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridian {
    Am,
    Pm,
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + ahead).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        let found = self.peek() == Some(byte);
        if found {
            self.pos += 1;
        }
        found
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        // only ASCII bytes are consumed, so both ends are char boundaries
        &self.text[start..self.pos]
    }

    fn digits(&mut self) -> &'a str {
        self.take_while(|b| b.is_ascii_digit())
    }

    fn number(&mut self, min_len: usize, max_len: usize) -> Result<u32, Reason> {
        let digits = self.digits();
        if digits.len() < min_len || digits.len() > max_len {
            return Err("malformed number");
        }
        digits.parse().map_err(|_| "malformed number")
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, Reason> {
        self.take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b','));
        let Some(byte) = self.peek() else {
            return Ok(None);
        };
        let token = match byte {
            b'a'..=b'z' | b'A'..=b'Z' => {
                let word = self.take_while(|b| b.is_ascii_alphabetic());
                // abbreviations may carry a period: "Sep. 11"
                self.eat(b'.');
                Token::Word(word)
            }
            b'0'..=b'9' => self.after_digits()?,
            b'+' | b'-' => self.offset()?,
            _ => return Err("unexpected character"),
        };
        Ok(Some(token))
    }

    fn after_digits(&mut self) -> Result<Token<'a>, Reason> {
        let start = self.pos;
        let digits = self.digits();
        match self.peek() {
            Some(b':') => {
                self.pos = start;
                self.clock().map(Token::Time)
            }
            Some(sep @ (b'-' | b'/'))
                if digits.len() == 4 && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) =>
            {
                let year = digits.parse().map_err(|_| "malformed year")?;
                self.pos += 1;
                let month = self.number(1, 2)?;
                if !self.eat(sep) {
                    return Err("incomplete date");
                }
                let day = self.number(1, 2)?;
                Ok(Token::Date { year, month, day })
            }
            // a bare hour: "1pm", "12 am"
            _ if digits.len() <= 2 && self.meridian_follows() => {
                let hour = digits.parse().map_err(|_| "malformed hour")?;
                Ok(Token::Time(Clock {
                    hour,
                    minute: 0,
                    second: 0,
                    nano: 0,
                }))
            }
            _ => Ok(Token::Number(digits)),
        }
    }

    fn meridian_follows(&self) -> bool {
        let rest = self.text[self.pos..].trim_start_matches(' ');
        let word = rest
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        word.eq_ignore_ascii_case("am") || word.eq_ignore_ascii_case("pm")
    }

    fn clock(&mut self) -> Result<Clock, Reason> {
        let hour = self.number(1, 2)?;
        if !self.eat(b':') {
            return Err("malformed time");
        }
        let minute = self.number(2, 2)?;
        let mut second = 0;
        let mut nano = 0;
        if self.eat(b':') {
            second = self.number(2, 2)?;
            if self.eat(b'.') || self.eat(b',') {
                let fraction = self.digits();
                if fraction.is_empty() {
                    return Err("malformed fraction");
                }
                // nanosecond resolution, extra digits are dropped
                nano = fraction
                    .bytes()
                    .chain(std::iter::repeat(b'0'))
                    .take(9)
                    .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'));
            }
        }
        Ok(Clock {
            hour,
            minute,
            second,
            nano,
        })
    }

    fn offset(&mut self) -> Result<Token<'a>, Reason> {
        let negative = self.peek() == Some(b'-');
        self.pos += 1;
        let digits = self.digits();
        let (hours, mut minutes) = match digits.len() {
            1 | 2 => (digits, "0"),
            4 => digits.split_at(2),
            _ => return Err("malformed offset"),
        };
        if self.eat(b':') {
            if digits.len() == 4 {
                return Err("malformed offset");
            }
            minutes = self.take_while(|b| b.is_ascii_digit());
            if minutes.len() != 2 {
                return Err("malformed offset");
            }
        }
        let hours: i32 = hours.parse().map_err(|_| "malformed offset")?;
        let minutes: i32 = minutes.parse().map_err(|_| "malformed offset")?;
        if hours > 23 || minutes > 59 {
            return Err("offset out of range");
        }
        let seconds = hours * 3600 + minutes * 60;
        if negative && seconds == 0 {
            // "-0000" is the conventional spelling of an explicit UTC time
            return Ok(Token::Offset(Zone::Utc));
        }
        let offset = match negative {
            true => FixedOffset::west_opt(seconds),
            false => FixedOffset::east_opt(seconds),
        };
        offset
            .map(|offset| Token::Offset(Zone::Fixed(offset)))
            .ok_or("offset out of range")
    }
}

fn lookup(names: &[&str], word: &str) -> Option<usize> {
    if word.len() < 3 {
        return None;
    }
    names
        .iter()
        .position(|name| name.starts_with(word) && (word.len() == 3 || word.len() == name.len()))
}

fn month_number(word: &str) -> Option<u32> {
    if word == "sept" {
        return Some(9);
    }
    lookup(&MONTHS, word).map(|index| index as u32 + 1)
}

fn is_weekday(word: &str) -> bool {
    matches!(word, "tues" | "thur" | "thurs") || lookup(&WEEKDAYS, word).is_some()
}

fn is_utc_word(word: &str) -> bool {
    matches!(word, "z" | "utc" | "gmt" | "ut")
}

fn expand_year(digits: &str) -> Result<i32, Reason> {
    let year: i32 = digits.parse().map_err(|_| "malformed year")?;
    Ok(match digits.len() {
        1 | 2 if year < 69 => 2000 + year,
        1 | 2 => 1900 + year,
        _ => year,
    })
}

fn set<T>(slot: &mut Option<T>, value: T, reason: Reason) -> Result<(), Reason> {
    match slot.replace(value) {
        Some(_) => Err(reason),
        None => Ok(()),
    }
}

/// Parses `text`; zone-less readings are taken to be wall-clock time in `default_zone`
pub(super) fn parse(text: &str, default_zone: Zone) -> Result<Timestamp, Reason> {
    let mut lexer = Lexer::new(text);
    let mut iso_date = None;
    let mut month = None;
    let mut numbers = Vec::with_capacity(2);
    let mut clock = None;
    let mut word_zone = None;
    let mut offset_zone = None;
    let mut meridian = None;

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Date { year, month, day } => {
                set(&mut iso_date, (year, month, day), "more than one date")?
            }
            Token::Time(time) => set(&mut clock, time, "more than one time")?,
            Token::Offset(zone) => set(&mut offset_zone, zone, "more than one offset")?,
            Token::Number(digits) => numbers.push(digits),
            Token::Word(word) => {
                let word = word.to_ascii_lowercase();
                if let Some(number) = month_number(&word) {
                    set(&mut month, number, "more than one month")?;
                } else if is_utc_word(&word) {
                    set(&mut word_zone, Zone::Utc, "more than one zone")?;
                } else if word == "am" {
                    set(&mut meridian, Meridian::Am, "more than one meridian")?;
                } else if word == "pm" {
                    set(&mut meridian, Meridian::Pm, "more than one meridian")?;
                } else if word == "t" && iso_date.is_some() && clock.is_none() {
                    // ISO date/time separator
                } else if !is_weekday(&word) {
                    return Err("unknown word");
                }
            }
        }
    }

    let (year, month, day) = match (iso_date, month) {
        (Some(date), None) if numbers.is_empty() => date,
        (Some(_), _) => return Err("unexpected fields after the date"),
        (None, Some(month)) => match numbers.as_slice() {
            [first, second] => {
                let first_is_year = first.len() > 2 || first.parse::<u32>().is_ok_and(|n| n > 31);
                let (day, year) = match first_is_year {
                    true => (second, first),
                    false => (first, second),
                };
                let day = day.parse().map_err(|_| "malformed day")?;
                (expand_year(year)?, month, day)
            }
            [] | [_] => return Err("incomplete date"),
            _ => return Err("too many numbers"),
        },
        (None, None) => return Err("no date found"),
    };
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or("date out of range")?;

    let mut clock = clock.unwrap_or(Clock {
        hour: 0,
        minute: 0,
        second: 0,
        nano: 0,
    });
    match (meridian, clock.hour) {
        (None, _) => {}
        (Some(_), hour) if hour == 0 || hour > 12 => {
            return Err("hour out of range for am/pm");
        }
        (Some(Meridian::Am), 12) => clock.hour = 0,
        (Some(Meridian::Pm), hour) if hour < 12 => clock.hour = hour + 12,
        (Some(_), _) => {}
    }
    let time = NaiveTime::from_hms_nano_opt(clock.hour, clock.minute, clock.second, clock.nano)
        .ok_or("time out of range")?;

    let zone = offset_zone.or(word_zone).unwrap_or(default_zone);
    Timestamp::from_naive(date.and_time(time), zone).ok_or("time out of range")
}

/// Parses a zone designation on its own: `UTC`, `Z`, `GMT`, `±HH`, `±HHMM` or `±HH:MM`
///
/// Used for the host timezone setting. Returns `None` for anything else.
pub fn parse_zone(text: &str) -> Option<Zone> {
    let mut lexer = Lexer::new(text.trim());
    let zone = match lexer.next_token().ok()?? {
        Token::Offset(zone) => zone,
        Token::Word(word) if is_utc_word(&word.to_ascii_lowercase()) => Zone::Utc,
        _ => return None,
    };
    match lexer.next_token() {
        Ok(None) => Some(zone),
        _ => None,
    }
}
