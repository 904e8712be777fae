mod composite;
mod simple;

pub use composite::{AllOf, AnyOf, DayOffset, NthOccurrence};
pub use simple::{DayOfMonth, DayOfWeek, EveryDay, NthWeekdayOfMonth};
