//! Cadence rules attached to recurring reminders.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// A fixed recurrence cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
    Weekly,
    /// Every two weeks.
    Biweekly,
    Monthly,
    /// Every two months.
    Bimonthly,
    /// Every three months.
    Quarterly,
    /// Every four months.
    Triannual,
    /// Every six months.
    Biannual,
    Yearly,
}

impl Frequency {
    /// All fixed cadences, in increasing period.
    pub const ALL: [Frequency; 11] = [
        Frequency::Daily,
        Frequency::Weekdays,
        Frequency::Weekends,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Bimonthly,
        Frequency::Quarterly,
        Frequency::Triannual,
        Frequency::Biannual,
        Frequency::Yearly,
    ];

    /// The wire name of this cadence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekdays => "weekdays",
            Frequency::Weekends => "weekends",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Bimonthly => "bimonthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Triannual => "triannual",
            Frequency::Biannual => "biannual",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.as_str() == name)
            .ok_or_else(|| RuleError::Unknown(s.to_string()))
    }
}

/// How a reminder recurs.
///
/// A `Custom` rule owns its queue of future dates, so a custom cadence can
/// never be separated from the dates that drive it. An empty queue means the
/// custom recurrence is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// A calendar cadence computed from the anchor date.
    Fixed(Frequency),
    /// Pre-computed future dates, consumed front to back.
    Custom(Vec<NaiveDateTime>),
    /// A stored rule name this build does not know. Kept verbatim so the
    /// record survives a round trip; recurrence falls back to the anchor.
    Unrecognized(String),
}

impl RecurrenceRule {
    /// Wire name of the custom cadence.
    pub const CUSTOM: &'static str = "custom";

    /// Parse a rule name supplied by a client or a language model.
    ///
    /// Returns `Ok(None)` for the "no recurrence" sentinels (`""`, `"none"`,
    /// `"null"`). A queue supplied alongside a fixed cadence is discarded.
    pub fn parse(name: &str, queue: Vec<NaiveDateTime>) -> Result<Option<Self>, RuleError> {
        let trimmed = name.trim();
        if is_none_sentinel(trimmed) {
            return Ok(None);
        }

        if trimmed.eq_ignore_ascii_case(Self::CUSTOM) {
            if queue.is_empty() {
                return Err(RuleError::EmptyCustomQueue);
            }
            return Ok(Some(RecurrenceRule::Custom(queue)));
        }

        trimmed.parse().map(|freq| Some(RecurrenceRule::Fixed(freq)))
    }

    /// Rebuild a rule from stored columns.
    ///
    /// Never fails: an unknown name becomes [`RecurrenceRule::Unrecognized`]
    /// and a custom rule may carry an empty (exhausted) queue.
    pub fn from_stored(name: Option<&str>, queue: Vec<NaiveDateTime>) -> Option<Self> {
        let name = name.map(str::trim).filter(|n| !is_none_sentinel(n))?;

        if name.eq_ignore_ascii_case(Self::CUSTOM) {
            return Some(RecurrenceRule::Custom(queue));
        }

        match name.parse() {
            Ok(freq) => Some(RecurrenceRule::Fixed(freq)),
            Err(_) => Some(RecurrenceRule::Unrecognized(name.to_string())),
        }
    }

    /// The rule name as stored and sent over the wire.
    pub fn name(&self) -> &str {
        match self {
            RecurrenceRule::Fixed(freq) => freq.as_str(),
            RecurrenceRule::Custom(_) => Self::CUSTOM,
            RecurrenceRule::Unrecognized(name) => name,
        }
    }

    /// The pending custom dates; empty for every other rule.
    pub fn queue(&self) -> &[NaiveDateTime] {
        match self {
            RecurrenceRule::Custom(queue) => queue,
            _ => &[],
        }
    }

    /// True for a custom rule whose queue has run out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RecurrenceRule::Custom(queue) if queue.is_empty())
    }
}

fn is_none_sentinel(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("null")
}
