//! Completed sleep sessions.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One completed sleep interval. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub id: String,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
    /// `end_time - start_time` in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl SleepSession {
    /// Build a session ending at `end`. The id is the end timestamp.
    ///
    /// Both ends are truncated to whole milliseconds, the precision they are
    /// stored with. A clock that stepped backwards yields a zero duration.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let (start, end) = (start.trunc_subsecs(3), end.trunc_subsecs(3));
        let duration_ms = (end - start).num_milliseconds().max(0) as u64;
        Self {
            id: iso_millis::to_string(&end),
            start_time: start,
            end_time: end,
            duration_ms,
        }
    }

    pub fn meets_goal(&self, goal_ms: u64) -> bool {
        self.duration_ms >= goal_ms
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix on the way out;
/// any RFC 3339 timestamp on the way in.
pub(crate) mod iso_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn to_string(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&to_string(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
