use rulekit::codec::{InventoryScanner, ModuleScanner, RuleTypeInfo};
use rulekit::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

rulekit::codec::declare_rule_module!(pub static TEST_RULES);

/// A host-defined rule: the 15th and the last day of every month.
#[rule_model(tag = "host.payday")]
#[derive(PartialEq, Eq)]
pub struct Payday {}

impl Rule for Payday {
    fn matches(&self, date: NaiveDate) -> bool {
        date.day() == 15 || date.succ_opt().is_some_and(|next| next.day() == 1)
    }
}

/// Counts scans and delegates to the inventory scanner.
#[derive(Debug, Default)]
pub struct CountingScanner {
    scans: AtomicUsize,
}

impl CountingScanner {
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl ModuleScanner for CountingScanner {
    fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        InventoryScanner.scan(module)
    }
}

#[must_use]
pub fn test_rules() -> TypeSource {
    TypeSource::Module(TEST_RULES.clone())
}

/// # Panics
/// * If the date does not exist.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}
