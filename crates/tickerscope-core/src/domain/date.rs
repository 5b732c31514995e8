use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date in `YYYY-MM-DD` form.
///
/// All series indexing, range trimming, and persistence use this type; the
/// intraday portion of provider timestamps is deliberately discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        Date::parse(trimmed, ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: trimmed.to_owned(),
            })
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Date of a provider's Unix timestamp, UTC.
    pub fn from_unix_timestamp(ts: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(ts)
            .map(|dt| Self(dt.date()))
            .map_err(|_| ValidationError::InvalidDate {
                value: ts.to_string(),
            })
    }

    /// Unix timestamp of midnight UTC on this date.
    pub fn unix_timestamp(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    /// This date moved back by `days` calendar days, saturating at the
    /// calendar's lower bound.
    pub fn minus_days(self, days: u32) -> Self {
        self.0
            .checked_sub(Duration::days(i64::from(days)))
            .map_or(Self(Date::MIN), Self)
    }

    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.0.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(ISO_DATE)
            .expect("TradingDate must be ISO formattable")
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
