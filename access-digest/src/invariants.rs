use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use derive_more::{AsRef, Display};

const DAY_FORMAT: &str = "%d-%m-%Y";

/// Calendar day in `DD-MM-YYYY` form, the key of a day bucket.
#[derive(Debug, Display, AsRef, Clone, PartialEq, Eq, Hash)]
pub struct DayKey(String);

impl DayKey {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The local calendar day before today.
    pub fn yesterday() -> Self {
        Self::yesterday_of(&Local::now())
    }

    /// Calendar day before `now`'s own date. Days are counted on the wall
    /// clock, so a 23 or 25 hour day is never skipped or repeated.
    pub fn yesterday_of<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        now.date_naive().pred_opt().unwrap_or(NaiveDate::MIN).into()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self(value.format(DAY_FORMAT).to_string())
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DAY_FORMAT).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;
    use chrono::FixedOffset;

    #[test]
    fn day_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_that!(DayKey::from(date).to_string()).is_equal_to("04-03-2024".to_string());
    }

    #[test]
    fn parse_normalizes_and_rejects_garbage() {
        let key: DayKey = "1-1-2024".parse().unwrap();
        assert_eq!(key.as_str(), "01-01-2024");
        assert_that!("2024-01-01".parse::<DayKey>().is_err()).is_true();
        assert_that!("31-02-2024".parse::<DayKey>().is_err()).is_true();
    }

    #[test]
    fn yesterday_steps_back_one_calendar_day_across_dst() {
        // early on the day after spring-forward, New York time
        let spring = FixedOffset::west_opt(4 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 11, 0, 30, 0)
            .unwrap();
        assert_that!(DayKey::yesterday_of(&spring).to_string())
            .is_equal_to("10-03-2024".to_string());

        // late on the fall-back day itself
        let fall = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 11, 3, 23, 30, 0)
            .unwrap();
        assert_that!(DayKey::yesterday_of(&fall).to_string())
            .is_equal_to("02-11-2024".to_string());

        let new_year = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();
        assert_that!(DayKey::yesterday_of(&new_year).to_string())
            .is_equal_to("31-12-2023".to_string());
    }

    #[test]
    fn yesterday_is_one_day_before_today() {
        let today = Local::now().date_naive();
        let expected: DayKey = today.pred_opt().unwrap().into();
        let got = DayKey::yesterday();
        // tolerate a run straddling midnight
        let fallback: DayKey = today.into();
        assert_that!(got == expected || got == fallback).is_true();
    }
}
