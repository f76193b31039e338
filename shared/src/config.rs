use std::{env, str::FromStr};

use anyhow::{bail, Context, Result};

pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub booking: BookingConfig,
    pub retention: RetentionConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            booking: BookingConfig::from_env()?,
            retention: RetentionConfig::from_env()?,
        })
    }
}

pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: var_or("SERVER_PORT", 8080)?,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: var("DATABASE_HOST")?,
            port: var("DATABASE_PORT")?.parse::<u16>()?,
            username: var("DATABASE_USERNAME")?,
            password: var("DATABASE_PASSWORD")?,
            database: var("DATABASE_NAME")?,
        })
    }
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl RedisConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: var("REDIS_HOST")?,
            port: var("REDIS_PORT")?.parse::<u16>()?,
        })
    }
}

pub struct AuthConfig {
    /// Access token lifetime in seconds.
    pub ttl: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ttl: var("AUTH_TOKEN_TTL")?
                .parse::<u64>()
                .context("invalid value for AUTH_TOKEN_TTL")?,
        })
    }
}

/// Admission policy knobs. Working hours are compared in `utc_offset_minutes`.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub gap_minutes: i64,
    pub max_duration_minutes: i32,
    pub max_active_per_space: usize,
    pub utc_offset_minutes: i32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            gap_minutes: 15,
            max_duration_minutes: 120,
            max_active_per_space: 2,
            utc_offset_minutes: 0,
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let cfg = Self {
            gap_minutes: var_or("BOOKING_GAP_MINUTES", d.gap_minutes)?,
            max_duration_minutes: var_or("BOOKING_MAX_DURATION_MINUTES", d.max_duration_minutes)?,
            max_active_per_space: var_or("BOOKING_MAX_ACTIVE_PER_SPACE", d.max_active_per_space)?,
            utc_offset_minutes: var_or("BOOKING_UTC_OFFSET_MINUTES", d.utc_offset_minutes)?,
        };
        if cfg.utc_offset_minutes.abs() >= 24 * 60 {
            bail!("BOOKING_UTC_OFFSET_MINUTES must be within +/- 1439");
        }
        if cfg.gap_minutes < 0 {
            bail!("BOOKING_GAP_MINUTES must not be negative");
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub struct RetentionConfig {
    pub days: i64,
    pub interval_secs: u64,
    pub sweep_after_create: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: 1,
            interval_secs: 3600,
            sweep_after_create: false,
        }
    }
}

impl RetentionConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let cfg = Self {
            days: var_or("RETENTION_DAYS", d.days)?,
            interval_secs: var_or("RETENTION_INTERVAL_SECS", d.interval_secs)?,
            sweep_after_create: var_or("RETENTION_SWEEP_AFTER_CREATE", d.sweep_after_create)?,
        };
        if cfg.days < 0 {
            bail!("RETENTION_DAYS must not be negative");
        }
        if cfg.interval_secs == 0 {
            bail!("RETENTION_INTERVAL_SECS must be positive");
        }
        Ok(cfg)
    }
}

fn var(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("environment variable {key} is not set"))
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {v}")),
        Err(_) => Ok(default),
    }
}
