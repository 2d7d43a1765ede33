use chrono::Local;
use clap::Subcommand;
use sleepwell_core::history::{self, ChartData};
use sleepwell_core::{Database, SessionStore};

const BAR_WIDTH: usize = 40;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded sessions, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Chart the last seven sessions against the goal
    Chart {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = SessionStore::open(&db);
    let goal_ms = store.settings().goal_ms;

    match action {
        HistoryAction::List { json, limit } => {
            let mut rows = history::rows(store.sessions(), goal_ms, &Local);
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render_rows(&rows));
            }
        }
        HistoryAction::Chart { json } => {
            let chart = history::chart(store.sessions(), goal_ms, &Local);
            if json {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                print!("{}", render_chart(&chart));
            }
        }
    }
    Ok(())
}

pub fn render_rows(rows: &[history::HistoryRow]) -> String {
    if rows.is_empty() {
        return "No sleep sessions recorded yet.\n".to_string();
    }
    let mut out = format!("{:<8} {:<9} {:<9} {:<10} {}\n", "Date", "Start", "End", "Duration", "Goal");
    for row in rows {
        out.push_str(&format!(
            "{:<8} {:<9} {:<9} {:<10} {}\n",
            row.date,
            row.start,
            row.end,
            row.duration,
            if row.goal_met { "met" } else { "-" }
        ));
    }
    out
}

/// Horizontal bars scaled to the chart's y-axis maximum, `|` marking the goal.
pub fn render_chart(chart: &ChartData) -> String {
    if chart.points.is_empty() {
        return "No sleep sessions recorded yet.\n".to_string();
    }
    let scale = |hours: f64| ((hours / chart.y_max) * BAR_WIDTH as f64).round() as usize;
    let goal_col = scale(chart.goal_hours).min(BAR_WIDTH);

    let mut out = String::new();
    for point in &chart.points {
        let filled = scale(point.hours).min(BAR_WIDTH);
        let bar: String = (0..BAR_WIDTH)
            .map(|i| match (i < filled, i == goal_col) {
                (_, true) => '|',
                (true, false) => '#',
                (false, false) => ' ',
            })
            .collect();
        out.push_str(&format!("{:<7} {bar} {:.1}h\n", point.label, point.hours));
    }
    out.push_str(&format!(
        "goal {:.1}h, axis 0-{:.0}h\n",
        chart.goal_hours, chart.y_max
    ));
    out
}
