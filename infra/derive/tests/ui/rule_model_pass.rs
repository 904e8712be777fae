use rulekit_codec::prelude::*;

#[rule_model(tag = "ui.weekend")]
pub struct Weekend {}

impl Rule for Weekend {
    fn matches(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

#[rule_model]
pub struct Shifted {
    pub days: i64,
    pub rule: Box<dyn Rule>,
}

impl Rule for Shifted {
    fn matches(&self, date: NaiveDate) -> bool {
        TimeDelta::try_days(self.days)
            .and_then(|delta| date.checked_sub_signed(delta))
            .is_some_and(|shifted| self.rule.matches(shifted))
    }
}

fn main() {
    assert_eq!(<Weekend as RuleModel>::TAG, "ui.weekend");
    assert!(<Shifted as RuleModel>::TAG.ends_with(".Shifted"));
    assert_eq!(Weekend::type_info().tag(), "ui.weekend");
}
