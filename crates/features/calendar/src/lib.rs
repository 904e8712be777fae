//! Built-in calendar rules.
//!
//! This crate is the core rule module of the default serializer: every type
//! below is known to each call without naming it.
//!
//! | Rule                  | Matches when                                            |
//! |-----------------------|---------------------------------------------------------|
//! | [`EveryDay`]          | always                                                  |
//! | [`DayOfWeek`]         | the weekday equals `weekday`                            |
//! | [`DayOfMonth`]        | the day number equals `day`, negative counts from end   |
//! | [`NthWeekdayOfMonth`] | the date is the `occurrence`-th `weekday` of its month  |
//! | [`NthOccurrence`]     | the date is the `occurrence`-th match of `rule` in its month |
//! | [`DayOffset`]         | `rule` matches the date `days` earlier                  |
//! | [`AnyOf`] / [`AllOf`] | any / all nested rules match                            |
//!
//! Occurrence and day numbers of zero never match.

mod month;
mod rules;

pub use rules::{
    AllOf, AnyOf, DayOfMonth, DayOfWeek, DayOffset, EveryDay, NthOccurrence, NthWeekdayOfMonth,
};

rulekit_codec::declare_rule_module!(pub static CALENDAR);
