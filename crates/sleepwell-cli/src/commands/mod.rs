pub mod auth;
pub mod config;
pub mod history;
pub mod run;
pub mod settings;
pub mod summary;

use sleepwell_core::{Config, Database, SleepApp, SystemClock};

use crate::bell::BellSink;

pub type CliApp = SleepApp<Database, BellSink, SystemClock>;

/// Open the on-disk database and build the application around it.
pub fn open_app(config: &Config) -> Result<CliApp, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(SleepApp::with_config(
        db,
        BellSink::new(config.alarm.bell),
        SystemClock,
        config,
    ))
}
