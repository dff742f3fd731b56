//! Working-day calendar arithmetic (§4.4): an ordered set of holiday date
//! ranges plus the fixed Saturday/Sunday weekend rule.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` holiday range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayRange {
    pub fn single_day(date: NaiveDate) -> Self {
        HolidayRange {
            start: date,
            end: date,
        }
    }

    fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A calendar of non-working holiday ranges, layered on top of the fixed
/// Saturday/Sunday weekend rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub holidays: Vec<HolidayRange>,
}

impl Calendar {
    pub fn new() -> Self {
        Calendar::default()
    }

    pub fn with_holidays(holidays: Vec<HolidayRange>) -> Self {
        Calendar { holidays }
    }

    fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|range| range.contains(date))
    }

    /// True iff `date` is Monday-Friday and not inside any holiday range.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.is_holiday(date)
    }

    /// `n == 0` returns the first working day `>= start`. `n > 0` advances
    /// day by day, counting only working days, until `n` have elapsed, and
    /// returns the last one counted.
    pub fn add_working_days(&self, start: NaiveDate, n: u32) -> NaiveDate {
        let mut date = start;
        while !self.is_working_day(date) {
            date += Duration::days(1);
        }
        if n == 0 {
            return date;
        }
        let mut counted = 0;
        loop {
            date += Duration::days(1);
            if self.is_working_day(date) {
                counted += 1;
                if counted == n {
                    return date;
                }
            }
        }
    }

    /// Inclusive count of working days in `[a, b]`.
    pub fn working_days_between(&self, a: NaiveDate, b: NaiveDate) -> u32 {
        if a > b {
            return 0;
        }
        let mut count = 0;
        let mut date = a;
        while date <= b {
            if self.is_working_day(date) {
                count += 1;
            }
            date += Duration::days(1);
        }
        count
    }
}

/// The twelve US federal holidays observed by the reference calendar for a
/// given year (§4.4). Deterministic, closed-form rules — no lookup tables.
pub fn us_federal_holidays(year: i32) -> Vec<HolidayRange> {
    let mut holidays = Vec::with_capacity(12);
    let mut add = |date: Option<NaiveDate>| {
        if let Some(d) = date {
            holidays.push(HolidayRange::single_day(d));
        }
    };

    add(NaiveDate::from_ymd_opt(year, 1, 1)); // New Year's Day
    add(nth_weekday_of_month(year, 1, Weekday::Mon, 3)); // MLK Day
    add(nth_weekday_of_month(year, 2, Weekday::Mon, 3)); // Presidents' Day
    add(last_weekday_of_month(year, 5, Weekday::Mon)); // Memorial Day
    add(NaiveDate::from_ymd_opt(year, 7, 4)); // Independence Day
    add(nth_weekday_of_month(year, 9, Weekday::Mon, 1)); // Labor Day
    add(nth_weekday_of_month(year, 10, Weekday::Mon, 2)); // Columbus Day
    add(NaiveDate::from_ymd_opt(year, 11, 11)); // Veterans Day
    let thanksgiving = nth_weekday_of_month(year, 11, Weekday::Thu, 4);
    add(thanksgiving); // Thanksgiving
    add(thanksgiving.map(|d| d + Duration::days(1))); // Day After Thanksgiving
    add(NaiveDate::from_ymd_opt(year, 12, 24)); // Christmas Eve
    add(NaiveDate::from_ymd_opt(year, 12, 25)); // Christmas

    holidays
}

/// The `nth` occurrence (1-indexed) of `weekday` in `month` of `year`.
fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<NaiveDate> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() as i64
        - first_of_month.weekday().num_days_from_monday() as i64)
        % 7;
    let first_occurrence = first_of_month + Duration::days(offset);
    first_occurrence.checked_add_signed(Duration::days(7 * (nth as i64 - 1)))
}

/// The last occurrence of `weekday` in `month` of `year`.
fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_of_month = next_month_first - Duration::days(1);
    let offset = (7 + last_of_month.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64)
        % 7;
    Some(last_of_month - Duration::days(offset))
}
