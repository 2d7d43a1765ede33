use clap::Subcommand;
use sleepwell_core::{AlarmStyle, Config, SnoozeMinutes};

use super::open_app;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the confirmed settings as JSON
    Show,
    /// Stage new values and confirm them in one step
    Set {
        /// Goal hours
        #[arg(long)]
        hours: Option<String>,
        /// Goal minutes
        #[arg(long)]
        minutes: Option<String>,
        /// Goal seconds
        #[arg(long)]
        seconds: Option<String>,
        /// Alarm style: Beep, Ascending or Digital
        #[arg(long)]
        alarm: Option<AlarmStyle>,
        /// Snooze length in minutes: 5, 10 or 15
        #[arg(long)]
        snooze: Option<u64>,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app(config)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(app.settings())?);
        }
        SettingsAction::Set {
            hours,
            minutes,
            seconds,
            alarm,
            snooze,
        } => {
            if hours.is_some() || minutes.is_some() || seconds.is_some() {
                let (h, m, s) = app.stage().goal_hms();
                app.stage_goal_fields(
                    &hours.unwrap_or_else(|| h.to_string()),
                    &minutes.unwrap_or_else(|| m.to_string()),
                    &seconds.unwrap_or_else(|| s.to_string()),
                );
            }
            if let Some(style) = alarm {
                app.stage_alarm_style(style);
            }
            if let Some(minutes) = snooze {
                app.stage_snooze(SnoozeMinutes::try_from(minutes)?);
            }
            let event = app.confirm_settings();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
