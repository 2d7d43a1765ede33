//! AI sleep summaries.
//!
//! [`summarize`] never fails: an empty history or any service error turns
//! into a fixed message for the user. [`SummaryState`] keeps at most one
//! request in flight and tells a late answer apart from a current one.

mod client;
pub mod credentials;
mod prompt;
mod render;

pub use client::{GeminiClient, TextGenerator};
pub use prompt::build_prompt;
pub use render::markdown_to_html;

use chrono::Local;

use crate::session::SleepSession;
use crate::storage::SummaryConfig;

pub const FALLBACK_MESSAGE: &str = "Sorry, I was unable to generate a summary at this time.";
pub const NO_DATA_MESSAGE: &str = "No sleep data available to generate a summary.";

/// Number of recent sessions sent to the service unless configured otherwise.
pub const DEFAULT_WINDOW: usize = 7;

/// Summarize `sessions` against `goal_ms` as display HTML.
///
/// Every session passed in goes into the prompt; callers slice the history
/// to the window they want.
pub async fn summarize<G>(generator: &G, sessions: &[SleepSession], goal_ms: u64) -> String
where
    G: TextGenerator + Sync,
{
    if sessions.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let prompt = build_prompt(sessions, goal_ms, &Local);
    tracing::info!(sessions = sessions.len(), "requesting sleep summary");
    match generator.generate(&prompt).await {
        Ok(markdown) => markdown_to_html(&markdown),
        Err(e) => {
            tracing::warn!(error = %e, "summary request failed");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

/// [`summarize`] through a [`GeminiClient`] built from `config`.
///
/// A missing API key or a bad endpoint is treated like any other failure.
pub async fn summarize_configured(
    config: &SummaryConfig,
    sessions: &[SleepSession],
    goal_ms: u64,
) -> String {
    if sessions.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }
    match GeminiClient::from_config(config) {
        Ok(client) => summarize(&client, sessions, goal_ms).await,
        Err(e) => {
            tracing::warn!(error = %e, "summary client unavailable");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

/// Proof that a summary request was started, used to match its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryTicket(u64);

#[derive(Debug, Default)]
pub struct SummaryState {
    busy: bool,
    generation: u64,
}

impl SummaryState {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a request in flight. `None` while another one is outstanding.
    pub fn begin(&mut self) -> Option<SummaryTicket> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.generation += 1;
        Some(SummaryTicket(self.generation))
    }

    /// Settle a request. Returns whether its result should be shown.
    pub fn finish(&mut self, ticket: SummaryTicket) -> bool {
        if self.busy && ticket.0 == self.generation {
            self.busy = false;
            true
        } else {
            false
        }
    }

    /// Give up on the outstanding request; its answer will be discarded.
    pub fn invalidate(&mut self) {
        if self.busy {
            self.busy = false;
            self.generation += 1;
        }
    }
}
