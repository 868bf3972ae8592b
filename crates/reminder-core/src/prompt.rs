//! Prompt construction for reminder extraction.

use chrono::NaiveDateTime;

use crate::rule::{Frequency, RecurrenceRule};
use crate::timestamp;

/// Number of future dates the model is asked to pre-compute for custom rules.
pub const CUSTOM_QUEUE_LENGTH: usize = 5;

/// Build the extraction prompt, anchored at the user's current time.
pub fn extraction_prompt(now: NaiveDateTime) -> String {
    let standard_rules = Frequency::ALL
        .iter()
        .map(|freq| format!("\"{}\"", freq.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let custom = RecurrenceRule::CUSTOM;
    let now = timestamp::format(&now);

    format!(
        r#"You are a reminder assistant. Current time: {now}.
Your task is to extract reminder details from user input into a JSON format.

Extract details into JSON:
- title: Content of the reminder.
- remind_at: ISO 8601 timestamp. Default to 1 hour from now if missing.

Rules for 'recurring_rule':
    1. If it fits a standard pattern ({standard_rules}), use that value.
    2. If it is COMPLEX (e.g., "every 3 days", "Mon, Wed, Fri", "first 2 days then skip 1"), set "recurring_rule": "{custom}".
    3. If it does not repeat, set "recurring_rule": null.

Rules for 'recurrence_queue':
    - IF rule is "{custom}": Calculate the NEXT {CUSTOM_QUEUE_LENGTH} occurrence dates (ISO 8601) after remind_at based on the user's logic and return them as a list of strings.
    - IF rule is standard or null: Return [].

- extra_info: Any additional info, or null.

Return ONLY raw JSON with NO EXTRA COMMENT.

Example response:
{{
    "title": "Doctor's appointment",
    "remind_at": "2024-07-01T15:30:00",
    "extra_info": "Bring medical records",
    "recurring_rule": "yearly",
    "recurrence_queue": []
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_prompt_mentions_time_and_rules() {
        let now = NaiveDate::from_ymd_opt(2024, 2, 5)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let prompt = extraction_prompt(now);

        assert!(prompt.contains("Current time: 2024-02-05T08:15:00."));
        for freq in Frequency::ALL {
            assert!(prompt.contains(&format!("\"{}\"", freq.as_str())));
        }
        assert!(prompt.contains("NEXT 5 occurrence dates"));
        assert!(prompt.contains("\"recurring_rule\": \"custom\""));
    }
}
