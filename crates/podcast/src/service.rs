// ABOUTME: The podcast episode pipeline: normalize share text, check the domain, look up and summarize.
// ABOUTME: Generic over EpisodeSource so the metadata API can be swapped out in tests.

use gleaner_core::{check_domain, extract_url, ExtractError};
use url::Url;

use crate::episode::EpisodeSummary;
use crate::spotify::{EpisodeSource, SpotifyClient};

pub const SPOTIFY_DOMAIN: &str = "spotify.com";

/// Returns the episode id: the last path segment of `url`, without the query.
pub fn episode_id(url: &Url) -> Result<String, ExtractError> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ExtractError::upstream(
                url.as_str(),
                "EpisodeId",
                Some(anyhow::anyhow!("missing episode id")),
            )
        })
}

/// Summarizes podcast episodes from share text or links.
pub struct PodcastService<S = SpotifyClient> {
    source: S,
    domains: Vec<String>,
}

impl<S: EpisodeSource> PodcastService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            domains: vec![SPOTIFY_DOMAIN.to_string()],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Looks up the episode referenced by `input` and builds its summary.
    ///
    /// The domain is checked before the episode source is consulted.
    #[tracing::instrument(name = "podcast", skip(self))]
    pub async fn summarize(&self, input: &str) -> Result<EpisodeSummary, ExtractError> {
        let candidate = extract_url(input);
        let url = check_domain(&candidate, &self.domains)?;
        let id = episode_id(&url)?;
        tracing::debug!(url = %url, id = %id, "resolved episode id");

        let episode = self.source.episode(&id).await.inspect_err(|e| {
            tracing::warn!(id = %id, error = %e, "episode lookup failed");
        })?;

        let summary = EpisodeSummary::from_episode(episode, candidate);
        tracing::info!(
            episode = %summary.episode_title,
            chapters = summary.timestamps.len(),
            "podcast summary complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::{Episode, ExternalUrls, Show, TRANSCRIPT_NOTICE};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubSource {
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EpisodeSource for StubSource {
        async fn episode(&self, id: &str) -> Result<Episode, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(id.to_string());
            Ok(Episode {
                id: id.to_string(),
                name: "On tea".to_string(),
                description: "01:30 - Intro\n12:45:10 - Deep dive".to_string(),
                release_date: "2024-05-05".to_string(),
                duration_ms: 45_000,
                images: Vec::new(),
                language: Some("zh".to_string()),
                explicit: false,
                show: Show {
                    name: "Leaf".to_string(),
                    publisher: None,
                    external_urls: ExternalUrls {
                        spotify: "https://open.spotify.com/show/leaf".to_string(),
                    },
                },
            })
        }
    }

    struct DownSource;

    #[async_trait]
    impl EpisodeSource for DownSource {
        async fn episode(&self, id: &str) -> Result<Episode, ExtractError> {
            Err(ExtractError::upstream(id, "SpotifyEpisode", None))
        }
    }

    #[test]
    fn test_episode_id_strips_query() {
        let url = Url::parse("https://open.spotify.com/episode/6kIWYhK6y34ua0YBaSm1ru?si=abc").unwrap();
        assert_eq!(episode_id(&url).unwrap(), "6kIWYhK6y34ua0YBaSm1ru");
    }

    #[test]
    fn test_episode_id_missing() {
        let url = Url::parse("https://open.spotify.com/").unwrap();
        let err = episode_id(&url).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("missing episode id"));
    }

    #[tokio::test]
    async fn test_summarize_share_text() {
        let service = PodcastService::new(StubSource::default());
        let summary = service
            .summarize("Listen: https://open.spotify.com/episode/ep42?si=x1 now")
            .await
            .unwrap();

        assert_eq!(*service.source().seen.lock().unwrap(), vec!["ep42".to_string()]);
        assert_eq!(summary.podcast_name, "Leaf");
        assert_eq!(summary.duration, "00:45");
        assert_eq!(summary.timestamps.len(), 2);
        assert_eq!(summary.timestamps[0].time, "01:30");
        assert_eq!(summary.timestamps[0].label, "Intro");
        assert_eq!(summary.timestamps[1].time, "12:45:10");
        assert_eq!(summary.timestamps[1].label, "Deep dive");
        assert_eq!(summary.content, TRANSCRIPT_NOTICE);
        assert_eq!(summary.url, "https://open.spotify.com/episode/ep42?si=x1");
        assert_eq!(summary.image, None);
    }

    #[tokio::test]
    async fn test_foreign_domain_skips_source() {
        let service = PodcastService::new(StubSource::default());
        let err = service
            .summarize("https://podcasts.example.com/episode/ep42")
            .await
            .unwrap_err();

        assert!(err.is_domain_mismatch());
        assert_eq!(service.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let service = PodcastService::new(DownSource);
        let err = service
            .summarize("https://open.spotify.com/episode/ep42")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
