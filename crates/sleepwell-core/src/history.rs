//! Read-only views over the session history: the table and the chart.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;

use crate::format::{format_date, format_duration_for_log, format_time, ms_to_hours};
use crate::session::SleepSession;

/// Sessions shown in the chart.
pub const CHART_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub duration_ms: u64,
    pub goal_met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub goal_hours: f64,
    pub y_max: f64,
}

/// History table rows, newest first, with times shown in `tz`.
pub fn rows<Tz>(sessions: &[SleepSession], goal_ms: u64, tz: &Tz) -> Vec<HistoryRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    sessions
        .iter()
        .rev()
        .map(|s| {
            let start = s.start_time.with_timezone(tz);
            HistoryRow {
                id: s.id.clone(),
                date: format_date(&start),
                start: format_time(&start),
                end: format_time(&s.end_time.with_timezone(tz)),
                duration: format_duration_for_log(s.duration_ms),
                duration_ms: s.duration_ms,
                goal_met: s.meets_goal(goal_ms),
            }
        })
        .collect()
}

/// Chart of the last [`CHART_WINDOW`] sessions in chronological order.
pub fn chart<Tz>(sessions: &[SleepSession], goal_ms: u64, tz: &Tz) -> ChartData
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let recent = &sessions[sessions.len().saturating_sub(CHART_WINDOW)..];
    let points: Vec<ChartPoint> = recent
        .iter()
        .map(|s| ChartPoint {
            label: format_date(&s.start_time.with_timezone(tz)),
            hours: ms_to_hours(s.duration_ms),
        })
        .collect();

    let goal_hours = ms_to_hours(goal_ms);
    let peak = points.iter().map(|p| p.hours).fold(goal_hours, f64::max);
    ChartData {
        points,
        goal_hours,
        y_max: (peak + 1.0).ceil(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const HOUR: u64 = 3_600_000;

    fn night(day: u32, minutes: i64) -> SleepSession {
        let start = Utc.with_ymd_and_hms(2024, 3, day, 23, 15, 0).unwrap();
        SleepSession::new(start, start + Duration::minutes(minutes))
    }

    #[test]
    fn rows_are_newest_first() {
        let sessions = vec![night(1, 420), night(2, 510)];
        let rows = rows(&sessions, 8 * HOUR, &Utc);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "Mar 2");
        assert_eq!(rows[0].start, "11:15 PM");
        assert_eq!(rows[0].end, "07:45 AM");
        assert_eq!(rows[0].duration, "8h 30m");
        assert!(rows[0].goal_met);
        assert!(!rows[1].goal_met);
    }

    #[test]
    fn row_duration_drops_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 15, 0).unwrap();
        let short = SleepSession::new(start, start + Duration::seconds(45 * 60 + 30));
        let rows = rows(&[short], 8 * HOUR, &Utc);
        assert_eq!(rows[0].duration, "45m");
    }

    #[test]
    fn goal_met_is_inclusive() {
        let rows = rows(&[night(1, 480)], 8 * HOUR, &Utc);
        assert!(rows[0].goal_met);
    }

    #[test]
    fn chart_keeps_last_seven() {
        let sessions: Vec<_> = (1..=9).map(|d| night(d, 360)).collect();
        let chart = chart(&sessions, 8 * HOUR, &Utc);
        assert_eq!(chart.points.len(), 7);
        assert_eq!(chart.points[0].label, "Mar 3");
        assert_eq!(chart.points[6].label, "Mar 9");
    }

    #[test]
    fn y_axis_clears_goal_and_longest_night() {
        let chart_low = chart(&[night(1, 300)], 8 * HOUR, &Utc);
        assert_eq!(chart_low.goal_hours, 8.0);
        assert_eq!(chart_low.y_max, 9.0);

        let chart_high = chart(&[night(1, 570)], 8 * HOUR, &Utc);
        assert_eq!(chart_high.points[0].hours, 9.5);
        assert_eq!(chart_high.y_max, 11.0);
    }

    #[test]
    fn empty_history_has_goal_only_axis() {
        let chart = chart(&[], 0, &Utc);
        assert!(chart.points.is_empty());
        assert_eq!(chart.y_max, 1.0);
    }
}
