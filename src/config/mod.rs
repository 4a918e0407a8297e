use crate::models::dashboard::TimeRange;
use crate::services::token::AdminToken;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;
use validator::Validate;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RECENT_ORDERS_LIMIT: u32 = 10;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct TargetConfig {
    #[validate(url)]
    pub base_url: String,
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Credentials handed to the authorized checks.
///
/// An empty `admin_token` means "no real credential yet"; the suite then
/// falls back to the placeholder fixture and keeps authorized checks dormant.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub admin_token: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct SuiteConfig {
    #[serde(default)]
    pub run_authorized: bool,
    #[serde(default)]
    pub time_range: TimeRange,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_recent_orders_limit")]
    pub recent_orders_limit: u32,
    #[serde(default)]
    pub bypass_cache: bool,
    #[serde(default)]
    pub parallel: bool,
    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_recent_orders_limit() -> u32 {
    DEFAULT_RECENT_ORDERS_LIMIT
}

fn default_repeat() -> u32 {
    1
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            run_authorized: false,
            time_range: TimeRange::default(),
            recent_orders_limit: DEFAULT_RECENT_ORDERS_LIMIT,
            bypass_cache: false,
            parallel: false,
            repeat: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LogConfig {
    #[validate(length(min = 1))]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate, Default)]
pub struct AppConfig {
    #[validate(nested)]
    pub target: TargetConfig,
    pub auth: AuthConfig,
    #[validate(nested)]
    pub suite: SuiteConfig,
    #[validate(nested)]
    pub log: LogConfig,
}

fn parse_bool(value: &str) -> bool {
    let lower = value.to_lowercase();
    matches!(lower.as_str(), "true" | "1" | "yes" | "on")
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let s = Config::builder()
            .set_default("target.base_url", DEFAULT_BASE_URL)?
            .set_default("target.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("auth.admin_token", "")?
            .set_default("suite.run_authorized", false)?
            .set_default("suite.time_range", TimeRange::default().as_str())?
            .set_default("suite.recent_orders_limit", i64::from(DEFAULT_RECENT_ORDERS_LIMIT))?
            .set_default("suite.bypass_cache", false)?
            .set_default("suite.parallel", false)?
            .set_default("suite.repeat", 1)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .add_source(
                config::Environment::with_prefix("PROBE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "suite.run_authorized",
                env::var("PROBE__SUITE__RUN_AUTHORIZED")
                    .ok()
                    .map(|v| parse_bool(&v)),
            )?
            .set_override_option("auth.admin_token", env::var("PROBE__AUTH__ADMIN_TOKEN").ok())?
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Config pointed at `base_url` with every other value at its default.
    pub fn for_target(base_url: impl Into<String>) -> Self {
        Self {
            target: TargetConfig {
                base_url: base_url.into(),
                ..TargetConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn check(&self) -> Result<(), ConfigError> {
        if let Err(e) = self.validate() {
            return Err(ConfigError::Message(format!("Validation error: {}", e)));
        }

        if !matches!(self.log.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "Invalid log format '{}': expected 'pretty' or 'json'",
                self.log.format
            )));
        }

        Ok(())
    }

    /// Settings that load fine but will not do what the operator likely wants.
    /// Returned rather than logged so the caller can report them once logging is up.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.suite.run_authorized
            && AdminToken::configured(&self.auth.admin_token).is_placeholder()
        {
            warnings.push(
                "PROBE__SUITE__RUN_AUTHORIZED is set without a real PROBE__AUTH__ADMIN_TOKEN; authorized checks will be skipped"
                    .to_string(),
            );
        }
        warnings
    }
}
