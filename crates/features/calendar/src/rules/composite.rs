use rulekit_codec::prelude::*;

use crate::month::is_nth_hit;

/// Matches the `occurrence`-th date of a month on which `rule` matches.
///
/// Negative occurrences count from the end of the month; `-1` is the last match.
#[rule_model(tag = "calendar.nth_occurrence")]
pub struct NthOccurrence {
    pub occurrence: i32,
    pub rule: Box<dyn Rule>,
}

impl Rule for NthOccurrence {
    fn matches(&self, date: NaiveDate) -> bool {
        is_nth_hit(date, self.occurrence, |day| self.rule.matches(day))
    }
}

/// Shifts `rule` by `days`: matches a date when `rule` matches the date `days`
/// earlier. Negative offsets shift backwards.
#[rule_model(tag = "calendar.day_offset")]
pub struct DayOffset {
    pub days: i32,
    pub rule: Box<dyn Rule>,
}

impl Rule for DayOffset {
    fn matches(&self, date: NaiveDate) -> bool {
        TimeDelta::try_days(i64::from(self.days))
            .and_then(|offset| date.checked_sub_signed(offset))
            .is_some_and(|shifted| self.rule.matches(shifted))
    }
}

/// Matches when any nested rule matches. An empty list never matches.
#[rule_model(tag = "calendar.any_of")]
pub struct AnyOf {
    pub rules: Vec<Box<dyn Rule>>,
}

impl Rule for AnyOf {
    fn matches(&self, date: NaiveDate) -> bool {
        self.rules.iter().any(|rule| rule.matches(date))
    }
}

/// Matches when every nested rule matches. An empty list always matches.
#[rule_model(tag = "calendar.all_of")]
pub struct AllOf {
    pub rules: Vec<Box<dyn Rule>>,
}

impl Rule for AllOf {
    fn matches(&self, date: NaiveDate) -> bool {
        self.rules.iter().all(|rule| rule.matches(date))
    }
}
