use rulekit_domain::config::{LogLevel, LoggingConfig};
use rulekit_logger::Logger;

#[test]
fn console_only_config_has_no_guard() {
    let config = LoggingConfig {
        name: "integration-console-only".to_owned(),
        level: LogLevel::Debug,
        ..LoggingConfig::default()
    };

    let logger = Logger::from_config(&config).expect("logger should initialize");
    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
