//! Process configuration from environment variables

use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:5050";
const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EVENT_BUFFER: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be at least 1")]
    ZeroBuffer { var: &'static str },
}

/// Runtime settings for the terminal front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address of the interviewer service
    pub server_addr: String,
    /// `None` disables reply timers
    pub reply_timeout: Option<Duration>,
    /// Capacity of the session input queue
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            reply_timeout: Some(Duration::from_secs(DEFAULT_REPLY_TIMEOUT_SECS)),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("INTERVIEW_SERVER_ADDR").filter(|a| !a.trim().is_empty()) {
            config.server_addr = addr.trim().to_string();
        }

        if let Some(secs) = parse_number::<u64>(&lookup, "INTERVIEW_REPLY_TIMEOUT_SECS")? {
            config.reply_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(buffer) = parse_number::<usize>(&lookup, "INTERVIEW_EVENT_BUFFER")? {
            if buffer == 0 {
                return Err(ConfigError::ZeroBuffer {
                    var: "INTERVIEW_EVENT_BUFFER",
                });
            }
            config.event_buffer = buffer;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
