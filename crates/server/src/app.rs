// ABOUTME: Application state and router construction for the gleaner HTTP server.
// ABOUTME: State is built once at startup and shared read-only by every request.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use gleaner_core::{LeadingMediaPolicy, Scraper};
use gleaner_podcast::{PodcastService, SpotifyClient, SpotifyConfig};

use crate::config::Config;
use crate::routes::{health_handler, podcast_handler, scrape_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<Scraper>,
    pub podcast: Option<Arc<PodcastService<SpotifyClient>>>,
}

impl AppState {
    pub fn new(scraper: Scraper, podcast: Option<PodcastService<SpotifyClient>>) -> Self {
        Self {
            scraper: Arc::new(scraper),
            podcast: podcast.map(Arc::new),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let policy = if config.skip_first_media {
            LeadingMediaPolicy::SkipFirst
        } else {
            LeadingMediaPolicy::Keep
        };
        let scraper = Scraper::builder()
            .timeout(config.fetch_timeout)
            .media_policy(policy)
            .build()
            .context("Failed to build note scraper")?;

        let podcast = match config.spotify_credentials() {
            Some((id, secret)) => {
                let spotify = SpotifyConfig::new(id, secret)
                    .market(config.spotify_market.clone())
                    .timeout(config.fetch_timeout);
                let client = SpotifyClient::new(spotify).context("Failed to build Spotify client")?;
                Some(PodcastService::new(client))
            }
            None => {
                tracing::warn!("SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET not set, /podcast is disabled");
                None
            }
        };

        Ok(Self::new(scraper, podcast))
    }
}

/// Builds the router with all routes attached to `state`.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape", get(scrape_handler))
        .route("/podcast", get(podcast_handler))
        .with_state(state)
}
