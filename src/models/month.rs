use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown month label: {0:?}")]
pub struct ParseMonthError(String);

/// Calendar month label. Labels carry no year: "march" collects every
/// March transaction in the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month a calendar date contributes to.
    pub fn of(date: NaiveDate) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// Zero-based position in the calendar year.
    pub fn index(self) -> usize {
        self as usize
    }

    /// January through `self`, inclusive.
    pub fn through(self) -> impl Iterator<Item = Month> {
        Self::ALL.into_iter().take(self.index() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseMonthError(s.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_of_date_uses_calendar_month() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(Month::of(d), Month::March);
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(Month::of(d), Month::April);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("March".parse::<Month>(), Ok(Month::March));
        assert_eq!("DECEMBER".parse::<Month>(), Ok(Month::December));
        assert_eq!(" june ".parse::<Month>(), Ok(Month::June));
        assert!("mar".parse::<Month>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_label() {
        assert_eq!(serde_json::to_string(&Month::May).unwrap(), "\"may\"");
        let m: Month = serde_json::from_str("\"September\"").unwrap();
        assert_eq!(m, Month::September);
    }

    #[test]
    fn through_includes_end_month() {
        let months: Vec<_> = Month::March.through().collect();
        assert_eq!(months, vec![Month::January, Month::February, Month::March]);
        assert_eq!(Month::December.through().count(), 12);
    }
}
