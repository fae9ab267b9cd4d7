use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::{Credential, StaticCredentialStore};

pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub login: LoginSettings,
    #[serde(default)]
    pub logging: LogSettings,
    /// Replaces the demo accounts when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<Credential>,
}

impl AppConfig {
    /// The credential table to authenticate against.
    pub fn credential_store(&self) -> StaticCredentialStore {
        if self.credentials.is_empty() {
            StaticCredentialStore::demo()
        } else {
            StaticCredentialStore::new(self.credentials.clone())
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Simulated classification latency.
    #[serde(default = "default_analysis_delay_ms")]
    pub delay_ms: u64,
}

impl AnalysisSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginSettings {
    /// Simulated sign-in round trip.
    #[serde(default = "default_login_delay_ms")]
    pub delay_ms: u64,
}

impl LoginSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_LOGIN_DELAY_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// An `EnvFilter` directive, e.g. "info" or "digifarm_application=debug".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn default_analysis_delay_ms() -> u64 {
    DEFAULT_ANALYSIS_DELAY_MS
}

fn default_login_delay_ms() -> u64 {
    DEFAULT_LOGIN_DELAY_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
