//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use crate::gesture::DEFAULT_MIN_SWIPE_DISTANCE;

/// Paths the router always serves
const RESERVED_PATHS: [&str; 2] = ["/health", "/bootstrap"];

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Swipes at or below this distance (client pixels) are ignored
    pub min_swipe_distance: f64,
    /// Mount point when the board is served below a sub-path
    pub path_prefix: String,
    /// Live socket endpoint path
    pub live_endpoint: String,
    /// Delay before the client falls back to long polling
    pub long_poll_fallback_ms: u64,

    /// Allowed client origins for CORS (comma-separated)
    pub client_origin: String,
    /// Accept `force_win` / `force_lose` from clients
    pub enable_debug_commands: bool,
    /// Fixed seed for confetti generation
    pub confetti_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let min_swipe_distance = match lookup("MIN_SWIPE_DISTANCE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or(ConfigError::Invalid("MIN_SWIPE_DISTANCE"))?,
            None => DEFAULT_MIN_SWIPE_DISTANCE,
        };

        let long_poll_fallback_ms = match lookup("LONG_POLL_FALLBACK_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("LONG_POLL_FALLBACK_MS"))?,
            None => 2500,
        };

        let enable_debug_commands = match lookup("ENABLE_DEBUG_COMMANDS") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("ENABLE_DEBUG_COMMANDS"))?,
            None => true,
        };

        let path_prefix =
            normalize_path(lookup("PATH_PREFIX").unwrap_or_else(|| "/2048".to_string()));
        let live_endpoint =
            normalize_path(lookup("LIVE_ENDPOINT").unwrap_or_else(|| "/live".to_string()));

        // The live socket needs its own path next to the fixed HTTP routes
        if live_endpoint.is_empty() || RESERVED_PATHS.contains(&live_endpoint.as_str()) {
            return Err(ConfigError::Invalid("LIVE_ENDPOINT"));
        }
        if RESERVED_PATHS.contains(&path_prefix.as_str()) || path_prefix == live_endpoint {
            return Err(ConfigError::Invalid("PATH_PREFIX"));
        }

        let confetti_seed = lookup("CONFETTI_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("CONFETTI_SEED"))
            })
            .transpose()?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            min_swipe_distance,
            path_prefix,
            live_endpoint,
            long_poll_fallback_ms,

            client_origin: lookup("CLIENT_ORIGIN")
                .unwrap_or_else(|| "http://localhost:4000".to_string()),
            enable_debug_commands,
            confetti_seed,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Leading slash, no trailing slash; empty stays empty (served at root)
fn normalize_path(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
