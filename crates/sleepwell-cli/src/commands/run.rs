//! Interactive tracker loop.
//!
//! One current-thread runtime drives a 1-second tick, stdin commands and
//! summary results. All state lives on the loop; the summary request is the
//! only work that runs in a spawned task.

use std::time::Duration;

use chrono::Local;
use indoc::indoc;
use sleepwell_core::alarm::ToneSink;
use sleepwell_core::history;
use sleepwell_core::summary::summarize_configured;
use sleepwell_core::{
    AlarmStyle, Clock, Config, Event, KvStore, SleepApp, SnoozeMinutes, SummaryJob, SummaryTicket,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::history::{render_chart, render_rows};
use super::open_app;

const HELP: &str = indoc! {"
    Commands:
      start                 start a sleep session
      wake                  confirm wake and record the session
      stop                  stop the alarm (same as wake)
      snooze                silence the alarm for the snooze length
      notify on|off         toggle the goal alarm
      goal H M S            stage a new sleep goal
      alarm STYLE           stage an alarm style (Beep, Ascending, Digital)
      snooze-minutes N      stage a snooze length (5, 10, 15)
      confirm               apply staged settings
      discard               drop staged settings
      summary               request an AI summary of recent sleep
      history               list recorded sessions
      chart                 chart the last seven sessions
      status                print the current state
      help                  show this help
      quit                  leave
"};

/// What a command line produced.
enum Reply {
    Events(Vec<Event>),
    Text(String),
    Summary(Event, SummaryJob),
    Quit,
}

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(&mut app, config))
}

async fn event_loop<K, S, C>(
    app: &mut SleepApp<K, S, C>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>>
where
    K: KvStore,
    S: ToneSink,
    C: Clock,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let (tx, mut rx) = mpsc::unbounded_channel::<(SummaryTicket, String)>();

    eprint!("{HELP}");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in app.tick() {
                    emit(&event)?;
                }
            }
            Some((ticket, html)) = rx.recv() => {
                emit(&app.finish_summary(ticket, html))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match handle(app, &line) {
                    Reply::Events(events) => {
                        for event in &events {
                            emit(event)?;
                        }
                    }
                    Reply::Text(text) => print!("{text}"),
                    Reply::Summary(started, job) => {
                        emit(&started)?;
                        let summary_config = config.summary.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let html =
                                summarize_configured(&summary_config, &job.sessions, job.goal_ms).await;
                            // The loop may already be gone.
                            let _ = tx.send((job.ticket, html));
                        });
                    }
                    Reply::Quit => break,
                }
            }
        }
    }
    Ok(())
}

/// One JSON object per line on stdout.
fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn say(text: impl Into<String>) -> Reply {
    let mut text = text.into();
    text.push('\n');
    Reply::Text(text)
}

fn handle<K, S, C>(app: &mut SleepApp<K, S, C>, input: &str) -> Reply
where
    K: KvStore,
    S: ToneSink,
    C: Clock,
{
    let mut words = input.split_whitespace();
    let Some(command) = words.next() else {
        return Reply::Events(Vec::new());
    };
    let args: Vec<&str> = words.collect();

    match command.to_ascii_lowercase().as_str() {
        "start" => Reply::Events(vec![app.start_sleep()]),
        "wake" => app
            .wake()
            .map(|e| Reply::Events(vec![e]))
            .unwrap_or_else(|| say("No sleep session in progress.")),
        "stop" => app
            .stop_alarm()
            .map(|e| Reply::Events(vec![e]))
            .unwrap_or_else(|| say("No sleep session in progress.")),
        "snooze" => app
            .snooze()
            .map(|e| Reply::Events(vec![e]))
            .unwrap_or_else(|| say("The alarm is not ringing.")),
        "notify" => match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
            Some("on") => Reply::Events(vec![app.set_notifications(true)]),
            Some("off") => Reply::Events(vec![app.set_notifications(false)]),
            _ => say("Usage: notify on|off"),
        },
        "goal" => {
            let field = |i: usize| args.get(i).copied().unwrap_or("0");
            Reply::Events(vec![app.stage_goal_fields(field(0), field(1), field(2))])
        }
        "alarm" => match args.first().map(|a| a.parse::<AlarmStyle>()) {
            Some(Ok(style)) => Reply::Events(vec![app.stage_alarm_style(style)]),
            Some(Err(e)) => say(e.to_string()),
            None => say("Usage: alarm Beep|Ascending|Digital"),
        },
        "snooze-minutes" => {
            let parsed = args
                .first()
                .and_then(|a| a.parse::<u64>().ok())
                .map(SnoozeMinutes::try_from);
            match parsed {
                Some(Ok(snooze)) => Reply::Events(vec![app.stage_snooze(snooze)]),
                Some(Err(e)) => say(e.to_string()),
                None => say("Usage: snooze-minutes 5|10|15"),
            }
        }
        "confirm" => Reply::Events(vec![app.confirm_settings()]),
        "discard" => Reply::Events(vec![app.discard_settings()]),
        "summary" => match app.begin_summary() {
            Some((started, job)) => Reply::Summary(started, job),
            None => say("A summary is already being generated."),
        },
        "history" => Reply::Text(render_rows(&history::rows(
            app.sessions(),
            app.settings().goal_ms,
            &Local,
        ))),
        "chart" => Reply::Text(render_chart(&history::chart(
            app.sessions(),
            app.settings().goal_ms,
            &Local,
        ))),
        "status" => Reply::Events(vec![app.snapshot()]),
        "help" => Reply::Text(HELP.to_string()),
        "quit" | "exit" => Reply::Quit,
        other => say(format!("Unknown command '{other}'. Type 'help' for a list.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use sleepwell_core::{Database, ManualClock, SilentSink};

    fn app(db: &Database) -> SleepApp<&Database, SilentSink, ManualClock> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap());
        SleepApp::new(db, SilentSink, clock)
    }

    fn events(reply: Reply) -> Vec<Event> {
        match reply {
            Reply::Events(events) => events,
            _ => panic!("expected events"),
        }
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn start_then_wake_records() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        assert!(matches!(events(handle(&mut app, "start"))[..], [Event::SleepStarted { .. }]));
        app.clock().advance(ChronoDuration::hours(7));
        assert!(matches!(
            events(handle(&mut app, "WAKE"))[..],
            [Event::SessionRecorded { .. }]
        ));
        assert_eq!(app.sessions().len(), 1);
        assert!(text(handle(&mut app, "wake")).contains("No sleep session"));
    }

    #[test]
    fn goal_fields_default_to_zero() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        handle(&mut app, "goal 6");
        handle(&mut app, "confirm");
        assert_eq!(app.settings().goal_ms, 6 * 3_600_000);

        handle(&mut app, "goal x 45 abc");
        handle(&mut app, "confirm");
        assert_eq!(app.settings().goal_ms, 45 * 60_000);
    }

    #[test]
    fn start_is_blocked_by_staged_settings() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        handle(&mut app, "alarm digital");
        assert!(matches!(
            events(handle(&mut app, "start"))[..],
            [Event::StartRejected { .. }]
        ));
        handle(&mut app, "discard");
        assert!(matches!(events(handle(&mut app, "start"))[..], [Event::SleepStarted { .. }]));
    }

    #[test]
    fn bad_arguments_explain_themselves() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        assert!(text(handle(&mut app, "alarm siren")).contains("Unknown alarm style"));
        assert!(text(handle(&mut app, "snooze-minutes 7")).contains("Invalid snooze"));
        assert!(text(handle(&mut app, "notify maybe")).contains("Usage"));
        assert!(text(handle(&mut app, "dance")).contains("Unknown command"));
        assert!(!app.machine().settings_pending());
    }

    #[test]
    fn summary_is_single_flight() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        assert!(matches!(handle(&mut app, "summary"), Reply::Summary(..)));
        assert!(text(handle(&mut app, "summary")).contains("already"));
    }

    #[test]
    fn quit_and_blank_lines() {
        let db = Database::open_memory().unwrap();
        let mut app = app(&db);
        assert!(matches!(handle(&mut app, "quit"), Reply::Quit));
        assert!(events(handle(&mut app, "   ")).is_empty());
    }
}
