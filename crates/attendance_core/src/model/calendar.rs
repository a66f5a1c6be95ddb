//! Calendar keys for the attendance ledger.
//!
//! # Responsibility
//! - Define `DateKey` (outer ledger key) and `Period` (class slot in a day).
//! - Reject malformed raw input at construction time.
//!
//! # Invariants
//! - `DateKey` always renders back to the exact `YYYY-MM-DD` text it was
//!   parsed from.
//! - `Period` is always inside `1..=7`.

use super::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// First class slot of a day.
pub const FIRST_PERIOD: u8 = 1;
/// Last class slot of a day.
pub const LAST_PERIOD: u8 = 7;

/// Calendar date used as the outer ledger key.
///
/// Serialized as its ISO text so persisted blobs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parses a strict `YYYY-MM-DD` calendar date.
    ///
    /// # Errors
    /// - Returns `ModelError::InvalidDateKey` for non-dates (`2025-02-30`),
    ///   missing zero padding (`2025-4-1`) or any other shape.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();
        let date = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
            .map_err(|_| ModelError::InvalidDateKey(value.to_string()))?;
        if date.format(DATE_KEY_FORMAT).to_string() != trimmed {
            return Err(ModelError::InvalidDateKey(value.to_string()));
        }
        Ok(Self(date))
    }

    /// Returns the underlying calendar date.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for DateKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

/// Class slot within a day, numbered `1..=7`.
///
/// `Ord` exists only so serialized ledgers have a stable key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Period(u8);

impl Period {
    /// Creates a period from its slot number.
    pub fn new(value: u8) -> Result<Self, ModelError> {
        if (FIRST_PERIOD..=LAST_PERIOD).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidPeriod(i64::from(value)))
        }
    }

    /// Returns the slot number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Iterates every period of a day in slot order.
    pub fn all() -> impl Iterator<Item = Period> {
        (FIRST_PERIOD..=LAST_PERIOD).map(Period)
    }
}

impl TryFrom<u8> for Period {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Period {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ModelError::InvalidPeriod(value))
            .and_then(Self::new)
    }
}

impl From<Period> for u8 {
    fn from(value: Period) -> Self {
        value.0
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{DateKey, Period};
    use crate::model::ModelError;

    #[test]
    fn date_key_accepts_iso_dates() {
        let key = DateKey::parse("2025-04-10").expect("valid date");
        assert_eq!(key.to_string(), "2025-04-10");
    }

    #[test]
    fn date_key_rejects_unpadded_and_impossible_dates() {
        assert!(matches!(
            DateKey::parse("2025-4-10"),
            Err(ModelError::InvalidDateKey(_))
        ));
        assert!(DateKey::parse("2025-02-30").is_err());
        assert!(DateKey::parse("10/04/2025").is_err());
        assert!(DateKey::parse("").is_err());
    }

    #[test]
    fn period_range_is_one_to_seven() {
        assert!(Period::new(0).is_err());
        assert!(Period::new(8).is_err());
        assert_eq!(Period::new(7).map(Period::number), Ok(7));
        assert_eq!(
            Period::try_from(-1_i64),
            Err(ModelError::InvalidPeriod(-1))
        );
        let numbers: Vec<u8> = Period::all().map(Period::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
