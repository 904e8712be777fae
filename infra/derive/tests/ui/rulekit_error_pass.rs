use rulekit_derive::rulekit_error;
use std::borrow::Cow;

#[rulekit_error]
pub enum StoreError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing rule `{name}`{}", format_context(.context))]
    Missing { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, StoreError> {
    std::fs::read_to_string("/definitely/not/here").context("Reading rules")
}

fn main() {
    let err = read().expect_err("file should not exist");
    assert!(err.to_string().contains("(Reading rules)"));

    let internal: StoreError = "boom".into();
    assert!(matches!(internal, StoreError::Internal { .. }));
}
