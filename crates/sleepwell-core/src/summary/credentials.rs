//! Thin wrapper around the OS keyring for the summary API key.

use crate::error::SummaryError;

const SERVICE: &str = "sleepwell";
pub const API_KEY_ENTRY: &str = "gemini_api_key";

pub fn get(key: &str) -> Result<Option<String>, SummaryError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set(key: &str, value: &str) -> Result<(), SummaryError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    entry.set_password(value)?;
    Ok(())
}

pub fn delete(key: &str) -> Result<(), SummaryError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Where the API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Keyring,
}

/// API key from `env_var`, falling back to the keyring.
///
/// An unreadable keyring is logged and treated as empty.
pub fn resolve_api_key(env_var: &str) -> Option<(String, KeySource)> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return Some((value.trim().to_string(), KeySource::Env));
        }
    }
    match get(API_KEY_ENTRY) {
        Ok(Some(value)) if !value.is_empty() => Some((value, KeySource::Keyring)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "could not read API key from keyring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_wins() {
        let var = "SLEEPWELL_TEST_KEY_ENV_WINS";
        std::env::set_var(var, "  from-env  ");
        let resolved = resolve_api_key(var);
        std::env::remove_var(var);
        assert_eq!(resolved, Some(("from-env".to_string(), KeySource::Env)));
    }
}
