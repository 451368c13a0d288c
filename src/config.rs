use serde::Deserialize;
use std::time::Duration;

use crate::service::DEFAULT_LIST_TTL;

pub const LOG_LEVEL_ENV: &str = "USER_REGISTRY_LOG_LEVEL";

/// Startup settings for [`UserSystem`](crate::app_system::UserSystem).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `user_registry=debug`
    pub log_level: String,
    pub list_cache_ttl_secs: u64,
    /// Mailbox size of the repository actor
    pub repository_buffer: usize,
    /// Advisory only; logged at startup, never enforced.
    pub max_users: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            list_cache_ttl_secs: DEFAULT_LIST_TTL.as_secs(),
            repository_buffer: 32,
            max_users: 1000,
        }
    }
}

impl SystemConfig {
    /// Defaults, with the log level taken from `USER_REGISTRY_LOG_LEVEL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_string();
            }
        }
        config
    }

    pub fn list_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.list_cache_ttl_secs)
    }
}
