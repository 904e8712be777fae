use rulekit_codec::prelude::*;
use rulekit_codec::{InventoryScanner, ModuleScanner, RuleTypeInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

rulekit_codec::declare_rule_module!(pub static FIXTURE_RULES);

/// A module that is not linked: only [`PluginScanner`] knows its types.
pub const PLUGIN: &str = "fixture_plugin";

#[rule_model(tag = "fixture.always")]
#[derive(PartialEq, Eq)]
pub struct Always {}

#[rule_model(tag = "fixture.on_weekday")]
#[derive(PartialEq, Eq)]
pub struct OnWeekday {
    pub weekday: Weekday,
}

#[rule_model(tag = "fixture.not")]
pub struct Not {
    pub rule: Box<dyn Rule>,
}

#[rule_model(tag = "fixture.any_of")]
pub struct AnyOf {
    pub rules: Vec<Box<dyn Rule>>,
}

impl Rule for Always {
    fn matches(&self, _date: NaiveDate) -> bool {
        true
    }
}

impl Rule for OnWeekday {
    fn matches(&self, date: NaiveDate) -> bool {
        date.weekday() == self.weekday
    }
}

impl Rule for Not {
    fn matches(&self, date: NaiveDate) -> bool {
        !self.rule.matches(date)
    }
}

impl Rule for AnyOf {
    fn matches(&self, date: NaiveDate) -> bool {
        self.rules.iter().any(|rule| rule.matches(date))
    }
}

/// Owned by [`PLUGIN`] and registered by hand.
#[derive(Debug, PartialEq, Eq, rulekit_codec::serde::Serialize, rulekit_codec::serde::Deserialize)]
#[serde(crate = "rulekit_codec::serde", deny_unknown_fields)]
pub struct LeapDay {}

impl RuleModel for LeapDay {
    const TAG: &'static str = "plugin.leap_day";

    fn type_info() -> &'static RuleTypeInfo {
        static INFO: RuleTypeInfo = RuleTypeInfo::of::<LeapDay>(PLUGIN, LeapDay::TAG);
        &INFO
    }
}

impl Rule for LeapDay {
    fn matches(&self, date: NaiveDate) -> bool {
        date.month() == 2 && date.day() == 29
    }
}

/// A module whose only type reuses the tag of [`Always`].
pub const CLASH: &str = "fixture_clash";

/// Owned by [`CLASH`] and registered by hand.
#[derive(Debug, rulekit_codec::serde::Serialize, rulekit_codec::serde::Deserialize)]
#[serde(crate = "rulekit_codec::serde", deny_unknown_fields)]
pub struct Counterfeit {}

impl RuleModel for Counterfeit {
    const TAG: &'static str = "fixture.always";

    fn type_info() -> &'static RuleTypeInfo {
        static INFO: RuleTypeInfo = RuleTypeInfo::of::<Counterfeit>(CLASH, Counterfeit::TAG);
        &INFO
    }
}

impl Rule for Counterfeit {
    fn matches(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Scans linked modules through inventory and serves [`PLUGIN`] and [`CLASH`] by hand.
#[derive(Debug, Default)]
pub struct PluginScanner {
    scans: AtomicUsize,
}

impl PluginScanner {
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl ModuleScanner for PluginScanner {
    fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        match module.name() {
            PLUGIN => return Ok(vec![LeapDay::type_info()]),
            CLASH => return Ok(vec![Counterfeit::type_info()]),
            _ => {},
        }
        InventoryScanner.scan(module)
    }
}

/// Creates a compact serializer over [`FIXTURE_RULES`] with a fresh scan cache.
#[must_use]
pub fn setup_codec() -> (RuleSerializer, Arc<PluginScanner>) {
    let scanner = Arc::new(PluginScanner::default());
    let codec = RuleSerializer::builder(&FIXTURE_RULES).scanner(Arc::clone(&scanner)).build();
    (codec, scanner)
}

#[must_use]
pub fn clash() -> TypeSource {
    TypeSource::Module(RuleModule::named(CLASH))
}

#[must_use]
pub fn plugin() -> TypeSource {
    TypeSource::Module(RuleModule::named(PLUGIN))
}

/// # Panics
/// * If the date does not exist.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}
