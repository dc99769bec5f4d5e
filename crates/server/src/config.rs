// ABOUTME: Server configuration loaded from the environment, with .env support via dotenvy.
// ABOUTME: Spotify credentials are optional; without them the podcast route reports an upstream error.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fetch_timeout: Duration,
    pub skip_first_media: bool,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_market: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .context("PORT must be a valid number")?;
        let timeout_secs: u64 = non_empty("GLEANER_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("GLEANER_FETCH_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            host: non_empty("GLEANER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            fetch_timeout: Duration::from_secs(timeout_secs),
            skip_first_media: non_empty("GLEANER_SKIP_FIRST_MEDIA")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
            spotify_client_id: non_empty("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: non_empty("SPOTIFY_CLIENT_SECRET"),
            spotify_market: non_empty("SPOTIFY_MARKET").unwrap_or_else(|| "US".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Both Spotify credentials, when configured.
    pub fn spotify_credentials(&self) -> Option<(&str, &str)> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}
