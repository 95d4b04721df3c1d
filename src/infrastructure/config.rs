//! Environment-driven configuration.
//!
//! Everything is read once at startup; the resulting `AppConfig` is passed down
//! explicitly and never re-read per request.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on any token lifetime: ten years, in seconds
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub phone_encryption_key: String,
    pub frontend_url: String,
    /// `None` disables SMTP delivery; reset emails are only logged
    pub smtp: Option<SmtpConfig>,
    pub admin_seed: Option<AdminSeedConfig>,
    pub cleanup: CleanupConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub statement_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds
    pub access_token_expiry: i64,
    /// Seconds
    pub refresh_token_expiry: i64,
    /// Seconds
    pub reset_token_expiry: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Hour of the day (UTC) at which the job fires
    pub hour_utc: u8,
    pub max_attempts: u32,
    pub base_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Comma-separated; empty or `*` allows any origin
    pub cors_allowed_origins: String,
    /// Per-IP request budget on the auth routes
    pub rate_limit_per_minute: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: String::new(),
            rate_limit_per_minute: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a fixed set of variables
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let smtp = match env.optional("SMTP_HOST") {
            Some(host) => {
                let username = env.string_or("SMTP_USER", "");
                Some(SmtpConfig {
                    host,
                    port: env.parse_or("SMTP_PORT", 587)?,
                    from: env.string_or("SMTP_FROM", &username),
                    username,
                    password: env.string_or("SMTP_PASS", ""),
                    timeout: Duration::from_secs(env.parse_or("SMTP_TIMEOUT_SECS", 5)?),
                })
            }
            None => None,
        };
        let admin_seed = match (
            env.optional("DEFAULT_ADMIN_EMAIL"),
            env.optional("DEFAULT_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminSeedConfig { email, password }),
            _ => None,
        };

        let hour_utc: u8 = env.parse_or("CLEANUP_HOUR_UTC", 3)?;
        if hour_utc > 23 {
            return Err(ConfigError::InvalidValue {
                key: "CLEANUP_HOUR_UTC",
                value: hour_utc.to_string(),
            });
        }

        Ok(Self {
            port: env.parse_or("APP_PORT", 3000)?,
            database: DatabaseConfig {
                url: env.required("DATABASE_URL")?,
                max_connections: env.parse_or("DB_MAX_CONNECTIONS", 20)?,
                min_connections: env.parse_or("DB_MIN_CONNECTIONS", 5)?,
                acquire_timeout: Duration::from_secs(env.parse_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
                idle_timeout: Duration::from_secs(env.parse_or("DB_IDLE_TIMEOUT_SECS", 600)?),
                statement_timeout: Duration::from_secs(
                    env.parse_or("DB_STATEMENT_TIMEOUT_SECS", 5)?,
                ),
            },
            jwt: JwtConfig {
                secret: env.required("JWT_SECRET")?,
                access_token_expiry: env.token_ttl("JWT_ACCESS_TOKEN_EXPIRY", 900)?,
                refresh_token_expiry: env.token_ttl("JWT_REFRESH_TOKEN_EXPIRY", 604_800)?,
                reset_token_expiry: env.token_ttl("PASSWORD_RESET_TOKEN_EXPIRY", 1800)?,
            },
            phone_encryption_key: env.required("PHONE_ENCRYPTION_KEY")?,
            frontend_url: env
                .string_or("FRONTEND_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
            smtp,
            admin_seed,
            cleanup: CleanupConfig {
                hour_utc,
                max_attempts: env.parse_or("CLEANUP_MAX_ATTEMPTS", 3)?,
                base_delay: Duration::from_secs(env.parse_or("CLEANUP_BASE_DELAY_SECS", 2)?),
            },
            http: HttpConfig {
                cors_allowed_origins: env.string_or("CORS_ALLOWED_ORIGINS", ""),
                rate_limit_per_minute: env.parse_or("RATE_LIMIT_PER_MINUTE", 60)?,
            },
        })
    }
}

struct Env<L> {
    lookup: L,
}

impl<L> Env<L>
where
    L: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value }),
            None => Ok(default),
        }
    }

    /// Token lifetime in seconds, within `1..=MAX_TOKEN_TTL_SECS`
    fn token_ttl(&self, key: &'static str, default: i64) -> Result<i64, ConfigError> {
        let ttl: i64 = self.parse_or(key, default)?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl) {
            return Err(ConfigError::InvalidValue {
                key,
                value: ttl.to_string(),
            });
        }
        Ok(ttl)
    }
}
