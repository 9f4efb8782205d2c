//! Configuration management for Stagedoor.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::ratelimit::RegistryConfig;

/// Main configuration for the Stagedoor service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagedoorConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Admin authorization configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_http_addr")]
    pub http_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
        }
    }
}

fn default_http_addr() -> SocketAddr {
    "127.0.0.1:5001".parse().unwrap()
}

/// Rate limiting configuration.
///
/// All three durations default to one minute, matching the route limits
/// which are expressed in requests per minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// How often the registry sweeps for idle clients, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// How long a client may be idle before its bucket is evicted, in seconds
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_secs: u64,

    /// The window over which a bucket refills to full capacity, in seconds
    #[serde(default = "default_refill_period")]
    pub refill_period_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            idle_threshold_secs: default_idle_threshold(),
            refill_period_secs: default_refill_period(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_idle_threshold() -> u64 {
    60
}

fn default_refill_period() -> u64 {
    60
}

impl RateLimitConfig {
    /// Convert to the registry's own configuration type.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            idle_threshold: Duration::from_secs(self.idle_threshold_secs),
            refill_period: Duration::from_secs(self.refill_period_secs),
        }
    }
}

/// Admin authorization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static bearer secret accepted on admin routes. Empty disables it.
    #[serde(default)]
    pub bearer_token: String,

    /// Admin sign-in username
    #[serde(default)]
    pub admin_username: String,

    /// Bcrypt hash of the admin sign-in password
    #[serde(default)]
    pub admin_password_hash: String,

    /// Session token lifetime, in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bearer_token: String::new(),
            admin_username: String::new(),
            admin_password_hash: String::new(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    3600
}

impl AuthConfig {
    /// Whether `token` is the configured admin bearer secret.
    ///
    /// An empty configured secret never matches, so an unset config cannot
    /// be satisfied by an empty Authorization value.
    pub fn is_admin_token(&self, token: &str) -> bool {
        !self.bearer_token.is_empty() && token == self.bearer_token
    }

    /// Whether the given sign-in credentials match the configured admin.
    ///
    /// The stored password is a bcrypt hash; an unparseable or empty hash
    /// rejects every password.
    pub fn credentials_match(&self, username: &str, password: &str) -> bool {
        !self.admin_password_hash.is_empty()
            && username == self.admin_username
            && bcrypt::verify(password, &self.admin_password_hash).unwrap_or(false)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl StagedoorConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: StagedoorConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::StagedoorError::Config(e.to_string()))?;
        Ok(config)
    }
}
