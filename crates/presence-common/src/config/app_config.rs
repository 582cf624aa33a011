//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub presence: PresenceConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub http: HttpConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

/// HTTP server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Presence registry tuning
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// Seconds of inactivity after which a session is stale
    pub inactivity_threshold_secs: u64,
    /// Seconds between background purges
    pub sweep_interval_secs: u64,
    pub sweep_enabled: bool,
    /// Upper bound accepted for a per-request threshold override
    pub max_threshold_secs: u64,
}

impl PresenceConfig {
    #[must_use]
    pub fn inactivity_threshold(&self) -> chrono::Duration {
        secs_to_chrono(self.inactivity_threshold_secs)
    }

    #[must_use]
    pub fn max_threshold(&self) -> chrono::Duration {
        secs_to_chrono(self.max_threshold_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold_secs: default_inactivity_threshold(),
            sweep_interval_secs: default_sweep_interval(),
            sweep_enabled: true,
            max_threshold_secs: default_max_threshold(),
        }
    }
}

/// Largest accepted value for any duration setting (one year)
const MAX_DURATION_SECS: u64 = 365 * 86_400;

// Saturates instead of panicking for values `validate` would reject
fn secs_to_chrono(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

/// Largest accepted replenish rate; the limiter refills at nanosecond granularity
const MAX_REQUESTS_PER_SECOND: u32 = 1_000_000_000;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// HTTP request handling configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

impl HttpConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "presence-registry".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_threshold() -> u64 {
    300 // 5 minutes
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_threshold() -> u64 {
    86_400 // 1 day
}

fn default_true() -> bool {
    true
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            api: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            presence: PresenceConfig::default(),
            rate_limit: RateLimitConfig {
                requests_per_second: default_requests_per_second(),
                burst: default_burst(),
            },
            cors: CorsConfig::default(),
            http: HttpConfig {
                request_timeout_secs: default_request_timeout(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable or out-of-range value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let config = Self {
            app: AppSettings {
                name: vars.string("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parse("APP_ENV", default_env)?,
            },
            api: ServerConfig {
                host: vars.string("API_HOST").unwrap_or_else(default_host),
                port: vars.parse("API_PORT", default_port)?,
            },
            presence: PresenceConfig {
                inactivity_threshold_secs: vars
                    .parse("PRESENCE_INACTIVITY_THRESHOLD_SECS", default_inactivity_threshold)?,
                sweep_interval_secs: vars
                    .parse("PRESENCE_SWEEP_INTERVAL_SECS", default_sweep_interval)?,
                sweep_enabled: vars.parse("PRESENCE_SWEEP_ENABLED", default_true)?,
                max_threshold_secs: vars
                    .parse("PRESENCE_MAX_THRESHOLD_SECS", default_max_threshold)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .string("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            http: HttpConfig {
                request_timeout_secs: vars
                    .parse("REQUEST_TIMEOUT_SECS", default_request_timeout)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the registry misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presence.inactivity_threshold_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_INACTIVITY_THRESHOLD_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.presence.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_SWEEP_INTERVAL_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        for (name, secs) in [
            (
                "PRESENCE_INACTIVITY_THRESHOLD_SECS",
                self.presence.inactivity_threshold_secs,
            ),
            ("PRESENCE_MAX_THRESHOLD_SECS", self.presence.max_threshold_secs),
            ("PRESENCE_SWEEP_INTERVAL_SECS", self.presence.sweep_interval_secs),
            ("REQUEST_TIMEOUT_SECS", self.http.request_timeout_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(ConfigError::InvalidValue(
                    name,
                    format!("must be at most {MAX_DURATION_SECS} seconds"),
                ));
            }
        }
        if self.presence.max_threshold_secs < self.presence.inactivity_threshold_secs {
            return Err(ConfigError::InvalidValue(
                "PRESENCE_MAX_THRESHOLD_SECS",
                "must not be below the inactivity threshold".to_string(),
            ));
        }
        if self.rate_limit.requests_per_second == 0 || self.rate_limit.burst == 0 {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_REQUESTS_PER_SECOND",
                "rate and burst must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.requests_per_second > MAX_REQUESTS_PER_SECOND {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_REQUESTS_PER_SECOND",
                format!("must be at most {MAX_REQUESTS_PER_SECOND}"),
            ));
        }
        Ok(())
    }
}

/// Typed access to a variable source
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, name: &'static str, default: fn() -> T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        match self.string(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(name, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
