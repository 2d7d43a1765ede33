//! Integration tests for the sleep tracker.
//!
//! These drive a full [`SleepApp`] over an in-memory database with a manual
//! clock, covering start, goal alarm, snooze, wake and the settings gate.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use sleepwell_core::alarm::{AlarmStyle, Tone, ToneSink};
use sleepwell_core::format::format_duration_for_log;
use sleepwell_core::{
    AlarmCause, Clock, Database, Event, ManualClock, SessionStore, SleepApp, SleepSession, SleepState,
    SnoozeMinutes,
};

#[derive(Default)]
struct Recording {
    plays: Vec<AlarmStyle>,
}

impl ToneSink for Recording {
    fn play(&mut self, style: AlarmStyle, _tone: &Tone) {
        self.plays.push(style);
    }
}

type App<'a> = SleepApp<&'a Database, Recording, ManualClock>;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap()
}

fn app(db: &Database, goal: Duration) -> App<'_> {
    let mut app = SleepApp::new(db, Recording::default(), ManualClock::new(t0()));
    app.stage_goal_ms(goal.num_milliseconds() as u64);
    app.confirm_settings();
    app
}

/// Tick once per second for `secs`, collecting emitted events.
fn run_for(app: &mut App<'_>, secs: i64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..secs {
        app.clock().advance(Duration::seconds(1));
        events.extend(app.tick());
    }
    events
}

fn triggers(events: &[Event]) -> Vec<AlarmCause> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::AlarmTriggered { cause, .. } => Some(*cause),
            _ => None,
        })
        .collect()
}

#[test]
fn test_goal_alarm_rings_exactly_once() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(10));
    assert!(matches!(app.start_sleep(), Event::SleepStarted { .. }));

    let before = run_for(&mut app, 9 * 60 + 59);
    assert!(triggers(&before).is_empty());
    assert!(matches!(app.machine().state(), SleepState::Sleeping { .. }));

    let after = run_for(&mut app, 20 * 60);
    assert_eq!(triggers(&after), vec![AlarmCause::GoalReached]);
    assert!(app.machine().state().is_ringing());
    assert!(app.alarm().is_playing());
}

#[test]
fn test_snooze_silences_then_rings_again() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(10));
    app.start_sleep();
    run_for(&mut app, 10 * 60);
    assert!(app.machine().state().is_ringing());

    let snoozed = app.snooze().unwrap();
    assert!(matches!(snoozed, Event::Snoozed { minutes: 5, .. }));
    assert!(matches!(app.machine().state(), SleepState::Sleeping { .. }));
    assert!(!app.alarm().is_playing());

    let quiet = run_for(&mut app, 5 * 60 - 1);
    assert!(triggers(&quiet).is_empty());

    let rang = run_for(&mut app, 2);
    assert_eq!(triggers(&rang), vec![AlarmCause::SnoozeExpired]);
    assert!(app.machine().state().is_ringing());
    assert!(app.alarm().is_playing());
}

#[test]
fn test_snooze_uses_confirmed_length() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(1));
    app.stage_snooze(SnoozeMinutes::try_from(15).unwrap());
    app.confirm_settings();
    app.start_sleep();
    run_for(&mut app, 60);

    match app.snooze() {
        Some(Event::Snoozed { minutes, until, at }) => {
            assert_eq!(minutes, 15);
            assert_eq!(until - at, Duration::minutes(15));
        }
        other => panic!("expected snooze, got {other:?}"),
    }
}

#[test]
fn test_wake_records_session() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::hours(8));
    app.start_sleep();
    app.clock().advance(Duration::minutes(7 * 60 + 12));
    let t1 = app.clock().now();

    let Some(Event::SessionRecorded { session, .. }) = app.wake() else {
        panic!("wake did not record a session");
    };
    assert_eq!(session.start_time, t0());
    assert_eq!(session.end_time, t1);
    assert_eq!(session.duration_ms, (7 * 60 + 12) * 60_000);
    assert_eq!(app.sessions().last(), Some(&session));
    assert!(app.machine().state().is_idle());

    let (stored, _) = SessionStore::load(&db);
    assert_eq!(stored.last(), Some(&session));
}

#[test]
fn test_wake_from_ringing_stops_alarm() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(1));
    app.start_sleep();
    run_for(&mut app, 61);
    assert!(app.alarm().is_playing());

    assert!(app.stop_alarm().is_some());
    assert!(!app.alarm().is_playing());
    let plays = app.alarm().sink().plays.len();
    run_for(&mut app, 30);
    assert_eq!(app.alarm().sink().plays.len(), plays);
    assert!(app.wake().is_none());
}

#[test]
fn test_start_rejected_while_settings_unconfirmed() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::hours(8));
    app.stage_alarm_style(AlarmStyle::Ascending);

    match app.start_sleep() {
        Event::StartRejected { reason, .. } => {
            assert_eq!(reason, "Please confirm your settings before starting a sleep session.");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(app.machine().state().is_idle());
    assert_eq!(app.machine().elapsed_ms(t0() + Duration::hours(1)), 0);
}

#[test]
fn test_notifications_off_never_rings() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(1));
    app.set_notifications(false);
    app.start_sleep();
    let events = run_for(&mut app, 5 * 60);
    assert!(triggers(&events).is_empty());
    assert!(!app.alarm().is_playing());
    assert!(app.alarm().sink().plays.is_empty());
}

#[test]
fn test_alarm_repeats_with_selected_style() {
    let db = Database::open_memory().unwrap();
    let mut app = app(&db, Duration::minutes(1));
    app.stage_alarm_style(AlarmStyle::Digital);
    app.confirm_settings();
    app.start_sleep();
    run_for(&mut app, 70);

    let plays = &app.alarm().sink().plays;
    assert!(plays.len() > 1);
    assert!(plays.iter().all(|s| *s == AlarmStyle::Digital));
}

#[test]
fn test_duration_for_log_examples() {
    assert_eq!(format_duration_for_log(0), "0m");
    assert_eq!(format_duration_for_log(90 * 60_000), "1h 30m");
}

fn arb_session() -> impl Strategy<Value = SleepSession> {
    (
        1_500_000_000_000i64..1_900_000_000_000,
        0i64..86_400_000,
        0i64..1_000_000,
        0i64..1_000_000,
    )
        .prop_map(|(start_ms, len_ms, start_ns, end_ns)| {
            let start = Utc.timestamp_millis_opt(start_ms).unwrap() + Duration::nanoseconds(start_ns);
            let end = start + Duration::milliseconds(len_ms) + Duration::nanoseconds(end_ns);
            SleepSession::new(start, end)
        })
}

proptest! {
    #[test]
    fn prop_history_and_goal_round_trip(
        sessions in prop::collection::vec(arb_session(), 0..20),
        goal_ms in 0u64..86_400_000,
    ) {
        let db = Database::open_memory().unwrap();
        prop_assert!(SessionStore::save(
            &db,
            &sessions,
            goal_ms,
            AlarmStyle::Ascending,
            SnoozeMinutes::default(),
        ));
        let (loaded, goal) = SessionStore::load(&db);
        prop_assert_eq!(loaded, sessions);
        prop_assert_eq!(goal, goal_ms);
    }
}
