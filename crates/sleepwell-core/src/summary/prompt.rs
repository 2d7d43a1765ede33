use std::fmt::Display;

use chrono::TimeZone;
use indoc::formatdoc;

use crate::format::{format_duration_for_log, format_numeric_date};
use crate::session::SleepSession;

/// Build the summary prompt for `sessions` (oldest first), dating each one
/// in `tz`.
pub fn build_prompt<Tz>(sessions: &[SleepSession], goal_ms: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let data = sessions
        .iter()
        .map(|session| {
            format!(
                "- Date: {}, Duration: {}",
                format_numeric_date(&session.start_time.with_timezone(tz)),
                format_duration_for_log(session.duration_ms)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        Based on the following sleep data for the last {count} sessions, provide a friendly and insightful summary of the user's sleep patterns.
        The user's sleep goal is {goal}.
        Mention consistency, whether they are meeting their goal, and offer one simple, actionable tip for improvement.
        Format the output as markdown.

        Sleep Data:
        {data}
        ",
        count = sessions.len(),
        goal = format_duration_for_log(goal_ms),
    }
}
