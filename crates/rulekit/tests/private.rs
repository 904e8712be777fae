pub mod fixtures;

use fixtures::{CountingScanner, Payday, TEST_RULES, date, test_rules};
use rulekit::calendar::{AnyOf, CALENDAR, DayOfMonth};
use rulekit::domain::config::CodecConfig;
use rulekit::prelude::*;
use std::sync::Arc;

fn counting_serializer(config: &CodecConfig) -> (RuleSerializer, Arc<CountingScanner>) {
    let scanner = Arc::new(CountingScanner::default());
    let serializer = rulekit::configure(&CALENDAR, config)
        .expect("valid codec config")
        .scanner(Arc::clone(&scanner))
        .build();
    (serializer, scanner)
}

#[test]
fn scanned_modules_widen_the_same_instance_only() {
    let config = CodecConfig::default();
    let widened = rulekit::build_serializer(&CALENDAR, &config).unwrap();
    let rule = AnyOf { rules: vec![Box::new(Payday {}), Box::new(DayOfMonth { day: 1 })] };

    assert!(widened.serialize(&rule, &[]).is_err());
    let text = widened.serialize(&rule, &[test_rules()]).unwrap();

    let restored: AnyOf = widened.deserialize(&text, &[]).expect("host module stays known");
    assert!(restored.matches(date(2015, 2, 28)));
    assert!(widened.registry().is_scanned(&TEST_RULES));

    let fresh = rulekit::build_serializer(&CALENDAR, &config).unwrap();
    let err = fresh.deserialize::<AnyOf>(&text, &[]).unwrap_err();
    assert!(matches!(err, CodecError::UnknownType { .. }), "got {err:?}");
}

#[test]
fn configured_default_sources_are_always_known() {
    let config = CodecConfig {
        pretty: true,
        default_sources: vec![format!("module:{}", TEST_RULES.name())],
    };
    let serializer = rulekit::build_serializer(&CALENDAR, &config).unwrap();

    let text = serializer.serialize(&Payday {}, &[]).unwrap();
    assert!(text.contains('\n'));
    assert_eq!(serializer.deserialize::<Payday>(&text, &[]).unwrap(), Payday {});
}

#[test]
fn invalid_configured_sources_are_rejected() {
    let config = CodecConfig { pretty: false, default_sources: vec!["rules.toml".to_owned()] };

    let err = rulekit::build_serializer(&CALENDAR, &config).unwrap_err();
    assert!(
        matches!(err, CodecError::InvalidArgumentKind { ref kind, ref context } if kind == "plain string" && context.is_some()),
        "got {err:?}"
    );
}

#[test]
fn invalid_source_kinds_fail_without_scanning() {
    let (serializer, scanner) = counting_serializer(&CodecConfig::default());

    let err = serializer
        .serialize_with(&DayOfMonth { day: 1 }, &[format!("module:{}", TEST_RULES.name()).as_str(), "oops"])
        .unwrap_err();
    assert!(
        matches!(err, CodecError::InvalidArgumentKind { ref kind, .. } if kind == "plain string"),
        "got {err:?}"
    );
    assert_eq!(scanner.scans(), 0);
}

#[test]
fn each_module_is_scanned_once_per_instance() {
    let (serializer, scanner) = counting_serializer(&CodecConfig::default());

    for _ in 0..3 {
        serializer.serialize(&Payday {}, &[test_rules()]).unwrap();
    }
    assert_eq!(scanner.scans(), 2);
}

#[test]
fn unlinked_modules_fail_to_scan() {
    let serializer = rulekit::build_serializer(&CALENDAR, &CodecConfig::default()).unwrap();
    let missing = TypeSource::Module(RuleModule::named("not_linked_anywhere"));

    let err = serializer.deserialize_dyn(r#"{"$type":"calendar.every_day"}"#, &[missing]).unwrap_err();
    assert!(
        matches!(err, CodecError::ModuleScan { ref module, .. } if module == "not_linked_anywhere"),
        "got {err:?}"
    );
}
