// ABOUTME: Spotify Web API client behind the EpisodeSource seam.
// ABOUTME: Uses the client-credentials flow; each lookup requests its own bearer token.

use std::time::Duration;

use async_trait::async_trait;
use gleaner_core::ExtractError;
use serde::Deserialize;

use crate::episode::Episode;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_MARKET: &str = "US";

/// Looks up episode records by id.
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    async fn episode(&self, id: &str) -> Result<Episode, ExtractError>;
}

/// Credentials and endpoints for [`SpotifyClient`].
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub market: String,
    pub accounts_url: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl SpotifyConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: DEFAULT_MARKET.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }

    /// Points both the token and the API requests at `base`. Used against mock servers.
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.accounts_url = base.clone();
        self.api_url = base;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Episode lookups against the Spotify Web API.
///
/// Requests a fresh token for every lookup.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: reqwest::Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ExtractError::upstream(
                    "",
                    "BuildClient",
                    Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                )
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    async fn access_token(&self) -> Result<String, ExtractError> {
        let url = format!("{}/api/token", self.config.accounts_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| classify(&url, "SpotifyToken", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::upstream(
                &url,
                "SpotifyToken",
                Some(anyhow::anyhow!("token request returned HTTP status {}", status.as_u16())),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| classify(&url, "SpotifyToken", e))?;

        tracing::debug!(expires_in = token.expires_in, "obtained spotify access token");

        Ok(token.access_token)
    }
}

fn classify(url: &str, op: &str, e: reqwest::Error) -> ExtractError {
    if e.is_timeout() {
        ExtractError::timeout(url, op, Some(anyhow::anyhow!("request timed out: {}", e)))
    } else {
        ExtractError::upstream(url, op, Some(anyhow::anyhow!(e)))
    }
}

#[async_trait]
impl EpisodeSource for SpotifyClient {
    async fn episode(&self, id: &str) -> Result<Episode, ExtractError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/episodes/{}",
            self.config.api_url.trim_end_matches('/'),
            id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("market", self.config.market.as_str())])
            .send()
            .await
            .map_err(|e| classify(&url, "SpotifyEpisode", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "episode lookup failed");
            return Err(ExtractError::upstream(
                &url,
                "SpotifyEpisode",
                Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
            ));
        }

        response
            .json::<Episode>()
            .await
            .map_err(|e| classify(&url, "SpotifyEpisode", e))
    }
}
