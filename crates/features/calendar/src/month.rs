use chrono::{Datelike, NaiveDate};

/// Number of days in the month of `date`.
pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    (29..=31).rev().find(|day| date.with_day(*day).is_some()).unwrap_or(28)
}

/// Iterates the days of the month of `date` in order.
pub(crate) fn days_of_month(date: NaiveDate) -> impl DoubleEndedIterator<Item = NaiveDate> {
    (1..=days_in_month(date)).filter_map(move |day| date.with_day(day))
}

/// Resolves a signed day number within `1..=len`; negative numbers count from the end.
///
/// Returns `None` for zero and for numbers outside the range.
pub(crate) fn resolve_position(position: i32, len: u32) -> Option<u32> {
    let resolved = match i64::from(position) {
        0 => return None,
        p if p > 0 => p,
        p => i64::from(len) + p + 1,
    };
    u32::try_from(resolved).ok().filter(|day| (1..=len).contains(day))
}

/// Returns `true` when `date` satisfies `hit` and is its `occurrence`-th hit in the
/// month, counted from the start for positive and from the end for negative values.
pub(crate) fn is_nth_hit(date: NaiveDate, occurrence: i32, hit: impl Fn(NaiveDate) -> bool) -> bool {
    if occurrence == 0 || !hit(date) {
        return false;
    }
    let Ok(wanted) = usize::try_from(occurrence.unsigned_abs()) else {
        return false;
    };

    let rank = if occurrence > 0 {
        days_of_month(date).take_while(|day| *day <= date).filter(|day| hit(*day)).count()
    } else {
        days_of_month(date).rev().take_while(|day| *day >= date).filter(|day| hit(*day)).count()
    };
    rank == wanted
}
