use rulekit_codec::prelude::*;

use crate::month::{days_in_month, is_nth_hit, resolve_position};

/// Matches every date.
#[rule_model(tag = "calendar.every_day")]
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct EveryDay {}

impl Rule for EveryDay {
    fn matches(&self, _date: NaiveDate) -> bool {
        true
    }
}

/// Matches dates falling on `weekday`.
#[rule_model(tag = "calendar.day_of_week")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DayOfWeek {
    pub weekday: Weekday,
}

impl Rule for DayOfWeek {
    fn matches(&self, date: NaiveDate) -> bool {
        date.weekday() == self.weekday
    }
}

/// Matches the `day`-th day of every month; `-1` is the last day.
#[rule_model(tag = "calendar.day_of_month")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DayOfMonth {
    pub day: i32,
}

impl Rule for DayOfMonth {
    fn matches(&self, date: NaiveDate) -> bool {
        resolve_position(self.day, days_in_month(date)) == Some(date.day())
    }
}

/// Matches the `occurrence`-th `weekday` of every month; `-1` is the last one.
#[rule_model(tag = "calendar.nth_weekday_of_month")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NthWeekdayOfMonth {
    pub occurrence: i32,
    pub weekday: Weekday,
}

impl Rule for NthWeekdayOfMonth {
    fn matches(&self, date: NaiveDate) -> bool {
        is_nth_hit(date, self.occurrence, |day| day.weekday() == self.weekday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn day_of_month_counts_from_both_ends() {
        assert!(DayOfMonth { day: 28 }.matches(date(2015, 2, 28)));
        assert!(DayOfMonth { day: -1 }.matches(date(2015, 2, 28)));
        assert!(DayOfMonth { day: -1 }.matches(date(2016, 2, 29)));
        assert!(!DayOfMonth { day: -1 }.matches(date(2016, 2, 28)));
        assert!(!DayOfMonth { day: 31 }.matches(date(2015, 4, 30)));
        assert!(!DayOfMonth { day: 0 }.matches(date(2015, 4, 1)));
    }

    #[test]
    fn nth_weekday_of_month() {
        // Thanksgiving 2015, fourth Thursday of November.
        let rule = NthWeekdayOfMonth { occurrence: 4, weekday: Weekday::Thu };
        assert!(rule.matches(date(2015, 11, 26)));
        assert!(!rule.matches(date(2015, 11, 19)));

        // Last Monday of May 2015.
        let rule = NthWeekdayOfMonth { occurrence: -1, weekday: Weekday::Mon };
        assert!(rule.matches(date(2015, 5, 25)));
        assert!(!rule.matches(date(2015, 5, 18)));
    }

    #[test]
    fn day_of_week() {
        assert!(DayOfWeek { weekday: Weekday::Tue }.matches(date(2015, 3, 3)));
        assert!(!DayOfWeek { weekday: Weekday::Tue }.matches(date(2015, 3, 4)));
        assert!(EveryDay {}.matches(date(1970, 1, 1)));
    }
}
