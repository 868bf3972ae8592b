//! Custom recurrence queue handling.

use chrono::NaiveDateTime;

/// Pop the next custom occurrence.
///
/// Returns the first queued date and the rest of the queue in order. An
/// empty queue yields `(None, [])`: the custom series is exhausted and no
/// successor should be created.
pub fn advance(queue: &[NaiveDateTime]) -> (Option<NaiveDateTime>, Vec<NaiveDateTime>) {
    match queue.split_first() {
        Some((next, remaining)) => (Some(*next), remaining.to_vec()),
        None => (None, Vec::new()),
    }
}
