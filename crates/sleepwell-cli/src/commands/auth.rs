use clap::Subcommand;
use sleepwell_core::summary::credentials::{self, KeySource, API_KEY_ENTRY};
use sleepwell_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the summary API key in the OS keyring
    SetKey {
        /// API key for the text-generation service
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show where the API key would be read from
    Status,
}

pub fn run(action: AuthAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err("API key must not be empty".into());
            }
            credentials::set(API_KEY_ENTRY, key)?;
            println!("API key stored in keyring");
        }
        AuthAction::Clear => {
            credentials::delete(API_KEY_ENTRY)?;
            println!("API key removed from keyring");
        }
        AuthAction::Status => {
            let env_var = &config.summary.api_key_env;
            let status = match credentials::resolve_api_key(env_var) {
                Some((_, KeySource::Env)) => format!("configured (from ${env_var})"),
                Some((_, KeySource::Keyring)) => "configured (from keyring)".to_string(),
                None => "not configured".to_string(),
            };
            println!("summary: {status}");
        }
    }
    Ok(())
}
