// ============================
// educoach-backend-lib/src/config.rs
// ============================
//! Configuration management.
use crate::auth::password::PasswordRequirements;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Session token settings
    pub session: SessionSettings,
    /// Rate limit applied to login attempts, keyed by client IP
    pub login_rate_limit: RateLimitSettings,
    /// Coarse rate limit applied to all requests, keyed by client IP
    pub request_rate_limit: RateLimitSettings,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// HMAC signing secret. Required; an empty value refuses startup.
    pub secret: String,
    /// Token time to live in seconds
    pub ttl_secs: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Set the `Secure` attribute on the session cookie
    pub secure_cookies: bool,
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Maximum requests admitted per window
    pub max_requests: u32,
    /// Window size in seconds
    pub window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            session: SessionSettings::default(),
            login_rate_limit: RateLimitSettings {
                max_requests: 5,
                window_secs: 15 * 60,
            },
            request_rate_limit: RateLimitSettings {
                max_requests: 100,
                window_secs: 60,
            },
            password_requirements: PasswordRequirements::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: 60 * 60 * 24 * 7, // 7 days
            cookie_name: "educoach_session".to_string(),
            secure_cookies: false,
        }
    }
}

impl SessionSettings {
    /// Token time to live as a [`Duration`]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl RateLimitSettings {
    /// Window size as a [`Duration`]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Settings {
    /// Load settings from config files and environment
    pub fn load() -> Result<Self> {
        Self::figment().extract().map_err(Into::into)
    }

    /// Load settings with an explicit TOML file taking precedence
    pub fn load_from(path: &str) -> Result<Self> {
        Self::figment()
            .merge(Toml::file(path))
            .extract()
            .map_err(Into::into)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed("EDUCOACH_").split("__"))
    }
}
