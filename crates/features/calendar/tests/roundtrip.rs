use rulekit_calendar::*;
use rulekit_codec::prelude::*;

fn codec() -> RuleSerializer {
    RuleSerializer::builder(&CALENDAR).build()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn builtins() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(EveryDay {}),
        Box::new(DayOfWeek { weekday: Weekday::Thu }),
        Box::new(DayOfMonth { day: -2 }),
        Box::new(NthWeekdayOfMonth { occurrence: 2, weekday: Weekday::Sun }),
        Box::new(NthOccurrence { occurrence: -1, rule: Box::new(DayOfWeek { weekday: Weekday::Fri }) }),
        Box::new(DayOffset { days: -7, rule: Box::new(DayOfMonth { day: 1 }) }),
        Box::new(AnyOf {
            rules: vec![Box::new(DayOfMonth { day: 1 }), Box::new(DayOfMonth { day: 15 })],
        }),
        Box::new(AllOf {
            rules: vec![Box::new(DayOfWeek { weekday: Weekday::Fri }), Box::new(DayOfMonth { day: 13 })],
        }),
    ]
}

#[test]
fn every_builtin_rule_roundtrips() {
    let codec = codec();
    let start = date(2015, 1, 1);

    for rule in builtins() {
        let text = codec.serialize(rule.as_ref(), &[]).expect("serialize failed");
        let restored = codec.deserialize_dyn(&text, &[]).expect("deserialize failed");

        assert_eq!(restored.rule_type(), rule.rule_type());
        assert_eq!(format!("{restored:?}"), format!("{rule:?}"));
        for when in start.iter_days().take(400) {
            assert_eq!(restored.matches(when), rule.matches(when), "{text} on {when}");
        }
    }
}

#[test]
fn offset_of_nth_occurrence_survives_encoding() {
    let codec = codec();
    let rule = DayOffset {
        days: 3,
        rule: Box::new(NthOccurrence { occurrence: 28, rule: Box::new(EveryDay {}) }),
    };

    let text = codec.serialize(&rule, &[]).unwrap();
    assert_eq!(
        text,
        r#"{"$type":"calendar.day_offset","days":3,"rule":{"$type":"calendar.nth_occurrence","occurrence":28,"rule":{"$type":"calendar.every_day"}}}"#
    );

    let restored: DayOffset = codec.deserialize(&text, &[]).unwrap();
    assert_eq!(restored.days, 3);
    assert!(restored.rule.is::<NthOccurrence>());

    for (when, expected) in [
        (date(2015, 3, 3), true),
        (date(2015, 5, 1), true),
        (date(2015, 3, 2), false),
        (date(2015, 3, 4), false),
        (date(2015, 2, 28), false),
    ] {
        assert_eq!(restored.matches(when), expected, "{when}");
    }
}

#[test]
fn weekday_names_are_accepted_in_long_form() {
    let rule: DayOfWeek = codec()
        .deserialize(r#"{"$type":"calendar.day_of_week","weekday":"Wednesday"}"#, &[])
        .unwrap();
    assert_eq!(rule, DayOfWeek { weekday: Weekday::Wed });
}

#[test]
fn calendar_module_owns_every_builtin() {
    let codec = codec();
    let known = codec.known_types(&[]).unwrap();

    for tag in [
        "calendar.every_day",
        "calendar.day_of_week",
        "calendar.day_of_month",
        "calendar.nth_weekday_of_month",
        "calendar.nth_occurrence",
        "calendar.day_offset",
        "calendar.any_of",
        "calendar.all_of",
    ] {
        let info = known.by_tag(tag).unwrap_or_else(|| panic!("{tag} is not known"));
        assert!(CALENDAR.owns(info));
    }
    assert_eq!(known.len(), 8);
}
