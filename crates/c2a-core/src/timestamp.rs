use std::fmt;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Colloquy's pre-ISO timestamp form, e.g. `2008-05-20 21:56:04 -0700`.
const LEGACY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// A point in time as recorded in a transcript, keeping the source's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    at: OffsetDateTime,
}

impl Timestamp {
    /// Parse any of the timestamp forms Colloquy has written over the years.
    ///
    /// Tries RFC 3339 first, then the legacy space-separated form, then the
    /// broader ISO 8601 grammar (basic format, offsets without a colon).
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        let trimmed = raw.trim();
        OffsetDateTime::parse(trimmed, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(trimmed, LEGACY_FORMAT))
            .or_else(|_| OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT))
            .map(|at| Self { at })
            .map_err(|_| TimestampError(raw.to_string()))
    }

    /// RFC 3339 at second precision: `2024-01-01T10:00:00Z` or
    /// `2008-05-20T21:56:04-07:00`. Sub-second digits are dropped.
    pub fn canonical(&self) -> String {
        format!("{}{}", self.date_time('T', ':'), self.offset_suffix(true))
    }

    /// Filename-safe rendering, e.g. `2008-05-20T21.56.04-0700`.
    ///
    /// Contains no `:` or `/`, and sorts chronologically for a fixed offset.
    pub fn file_token(&self) -> String {
        format!("{}{}", self.date_time('T', '.'), self.offset_suffix(false))
    }

    fn date_time(&self, date_sep: char, time_sep: char) -> String {
        let at = self.at;
        format!(
            "{:04}-{:02}-{:02}{date_sep}{:02}{time_sep}{:02}{time_sep}{:02}",
            at.year(),
            u8::from(at.month()),
            at.day(),
            at.hour(),
            at.minute(),
            at.second(),
        )
    }

    fn offset_suffix(&self, extended: bool) -> String {
        let offset = self.at.offset();
        if extended && offset.is_utc() {
            return "Z".to_string();
        }
        let sign = if offset.is_negative() { '-' } else { '+' };
        let (hours, minutes, _) = offset.as_hms();
        let (hours, minutes) = (hours.unsigned_abs(), minutes.unsigned_abs());
        if extended {
            format!("{sign}{hours:02}:{minutes:02}")
        } else {
            format!("{sign}{hours:02}{minutes:02}")
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
