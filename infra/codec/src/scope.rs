//! # Codec Scope
//!
//! Nested `Box<dyn Rule>` fields are encoded and decoded by serde without access
//! to the serializer that started the call. The scope makes the call's
//! [`KnownTypeSet`] available to them through a thread-local slot, and records the
//! first type resolution failure so the caller can report it instead of the
//! generic serde error it was wrapped in.

use serde::de::Error as _;
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::CodecError;
use crate::known::KnownTypeSet;
use crate::types::{Rule, TYPE_KEY};

const NO_SCOPE: &str = "rule values can only be encoded or decoded through a RuleSerializer";

#[derive(Debug)]
struct Scope {
    known: KnownTypeSet,
    failure: RefCell<Option<CodecError>>,
}

impl Scope {
    /// Records `err` unless an earlier failure is already recorded.
    fn fail(&self, err: CodecError) -> String {
        let message = err.to_string();
        self.failure.borrow_mut().get_or_insert(err);
        message
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Rc<Scope>>> = const { RefCell::new(None) };
}

fn active() -> Option<Rc<Scope>> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

/// Keeps a scope installed on the current thread until dropped.
///
/// Restores the previously active scope on drop, so calls may nest.
#[derive(Debug)]
pub(crate) struct ScopeGuard {
    current: Rc<Scope>,
    previous: Option<Rc<Scope>>,
}

impl ScopeGuard {
    pub(crate) fn enter(known: KnownTypeSet) -> Self {
        let current = Rc::new(Scope { known, failure: RefCell::new(None) });
        let previous = ACTIVE.with(|slot| slot.replace(Some(Rc::clone(&current))));
        Self { current, previous }
    }

    /// Takes the first type resolution failure recorded during the call.
    pub(crate) fn take_failure(&self) -> Option<CodecError> {
        self.current.failure.borrow_mut().take()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|slot| *slot.borrow_mut() = previous);
    }
}

impl Serialize for dyn Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let scope = active().ok_or_else(|| S::Error::custom(NO_SCOPE))?;
        let info = self.rule_type();
        if !scope.known.contains(info) {
            let err = CodecError::UnknownType {
                type_name: info.type_name().into(),
                context: Some("Encoding".into()),
            };
            return Err(S::Error::custom(scope.fail(err)));
        }

        let Value::Object(fields) = self.encode_fields().map_err(S::Error::custom)? else {
            return Err(S::Error::custom(format!(
                "rule type {} must encode to an object",
                info.type_name()
            )));
        };

        let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
        map.serialize_entry(TYPE_KEY, info.tag())?;
        for (name, value) in &fields {
            if name != TYPE_KEY {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Box<dyn Rule> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let scope = active().ok_or_else(|| D::Error::custom(NO_SCOPE))?;

        let Value::Object(mut fields) = Value::deserialize(deserializer)? else {
            return Err(D::Error::custom(format!("expected a rule object with a `{TYPE_KEY}` key")));
        };
        let tag = match fields.remove(TYPE_KEY) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(D::Error::custom(format!("`{TYPE_KEY}` must be a string, got {other}")));
            },
            None => return Err(D::Error::missing_field(TYPE_KEY)),
        };

        let Some(info) = scope.known.by_tag(&tag) else {
            let err = CodecError::UnknownType { type_name: tag.into(), context: Some("Decoding".into()) };
            return Err(D::Error::custom(scope.fail(err)));
        };

        info.decode(Value::Object(fields)).map_err(D::Error::custom)
    }
}
