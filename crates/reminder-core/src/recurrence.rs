//! Next-occurrence calculation for fixed cadences.

use chrono::{Datelike, Days, Months, NaiveDateTime, Weekday};

use crate::rule::{Frequency, RecurrenceRule};

/// Compute the next occurrence of a fixed cadence.
///
/// Always measured from `anchor`, the time the reminder was scheduled for,
/// so completing a reminder late does not shift the series. Month-based
/// cadences clamp to the last valid day of the target month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn next_occurrence(anchor: NaiveDateTime, frequency: Frequency) -> NaiveDateTime {
    match frequency {
        Frequency::Daily => add_days(anchor, 1),
        Frequency::Weekdays => next_matching(anchor, |day| !is_weekend(day)),
        Frequency::Weekends => next_matching(anchor, is_weekend),
        Frequency::Weekly => add_days(anchor, 7),
        Frequency::Biweekly => add_days(anchor, 14),
        Frequency::Monthly => add_months(anchor, 1),
        Frequency::Bimonthly => add_months(anchor, 2),
        Frequency::Quarterly => add_months(anchor, 3),
        Frequency::Triannual => add_months(anchor, 4),
        Frequency::Biannual => add_months(anchor, 6),
        Frequency::Yearly => add_months(anchor, 12),
    }
}

/// Compute the next occurrence for any rule.
///
/// Custom rules are driven by their queue (see [`crate::advance`]) and
/// unrecognized rules have no cadence; both return `anchor` unchanged.
pub fn next_for_rule(anchor: NaiveDateTime, rule: &RecurrenceRule) -> NaiveDateTime {
    match rule {
        RecurrenceRule::Fixed(freq) => next_occurrence(anchor, *freq),
        RecurrenceRule::Custom(_) | RecurrenceRule::Unrecognized(_) => anchor,
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Step one day forward, then keep stepping until `accept` holds.
fn next_matching(anchor: NaiveDateTime, accept: impl Fn(Weekday) -> bool) -> NaiveDateTime {
    let mut candidate = add_days(anchor, 1);
    // At most six extra steps: every week has both kinds of day.
    for _ in 0..6 {
        if accept(candidate.weekday()) {
            break;
        }
        candidate = add_days(candidate, 1);
    }
    candidate
}

// Out-of-range results only occur near year 262143; keep the anchor there.
fn add_days(anchor: NaiveDateTime, days: u64) -> NaiveDateTime {
    anchor.checked_add_days(Days::new(days)).unwrap_or(anchor)
}

fn add_months(anchor: NaiveDateTime, months: u32) -> NaiveDateTime {
    anchor
        .checked_add_months(Months::new(months))
        .unwrap_or(anchor)
}
