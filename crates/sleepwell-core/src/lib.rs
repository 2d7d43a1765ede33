//! # SleepWell Core Library
//!
//! This library provides the core logic for the SleepWell sleep tracker.
//! Every operation is available through the standalone CLI binary; the
//! library has no UI dependency and can be driven entirely from tests.
//!
//! ## Architecture
//!
//! - **Sleep Machine**: A wall-clock-based state machine (`Idle`, `Sleeping`,
//!   `AlarmRinging`) that requires the caller to periodically invoke `tick()`
//! - **Alarm Engine**: Synthesized tones repeated until stopped
//! - **Storage**: SQLite key-value persistence and TOML-based configuration
//! - **Summary**: AI sleep summaries through a text-generation service
//!
//! ## Key Components
//!
//! - [`SleepApp`]: Owned application state tying everything together
//! - [`SleepMachine`]: Core sleep session state machine
//! - [`SessionStore`]: Session history and settings persistence
//! - [`Config`]: Application configuration management

pub mod alarm;
pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod session;
pub mod settings;
pub mod storage;
pub mod summary;
pub mod tracker;

pub use alarm::{AlarmEngine, AlarmStyle, SilentSink, Tone, ToneSink};
pub use app::{SleepApp, SummaryJob};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, SummaryError, ValidationError};
pub use events::Event;
pub use session::SleepSession;
pub use settings::{SettingsStage, SleepSettings, SnoozeMinutes, StagedSettings};
pub use storage::{Config, Database, KvStore, SessionStore};
pub use summary::{GeminiClient, SummaryState, SummaryTicket, TextGenerator};
pub use tracker::{AlarmCause, SleepMachine, SleepState, StartRejected};
