// ABOUTME: Podcast episode summary library for gleaner.
// ABOUTME: Provides duration formatting, chapter marker extraction, the Spotify client and the summary pipeline.

pub mod duration;
pub mod episode;
pub mod service;
pub mod spotify;
pub mod timestamps;

pub use duration::format_duration;
pub use episode::{AdditionalInfo, Episode, EpisodeSummary, TRANSCRIPT_NOTICE};
pub use gleaner_core::ExtractError;
pub use service::{episode_id, PodcastService, SPOTIFY_DOMAIN};
pub use spotify::{EpisodeSource, SpotifyClient, SpotifyConfig};
pub use timestamps::{extract_timestamps, Timestamp};

/// Podcast failures share the note pipeline's error type; API problems carry `ErrorCode::Upstream`.
pub type PodcastError = ExtractError;
