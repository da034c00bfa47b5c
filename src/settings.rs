use std::time::Duration;

use thiserror::Error;

pub const RESULTS_ENDPOINT_VAR: &str = "QUIZ_RESULTS_ENDPOINT";
pub const RESULTS_TIMEOUT_VAR: &str = "QUIZ_RESULTS_TIMEOUT_SECS";
const DEFAULT_RESULTS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where finished games are posted. Nothing is posted when unset.
    pub results_endpoint: Option<String>,
    pub results_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("QUIZ_RESULTS_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let results_endpoint = lookup(RESULTS_ENDPOINT_VAR)
            .map(|endpoint| endpoint.trim().to_string())
            .filter(|endpoint| !endpoint.is_empty());

        let results_timeout = match lookup(RESULTS_TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_RESULTS_TIMEOUT_SECS),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(SettingsError::InvalidTimeout(raw))?,
        };

        Ok(Self {
            results_endpoint,
            results_timeout,
        })
    }
}
