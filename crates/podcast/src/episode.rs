// ABOUTME: Episode models: the upstream episode record and the summary returned to callers.
// ABOUTME: The summary derives display duration and chapter markers from the raw record.

use serde::{Deserialize, Serialize};

use crate::duration::format_duration;
use crate::timestamps::{extract_timestamps, Timestamp};

/// Notice placed in `content`; full transcripts are not available through the public API.
pub const TRANSCRIPT_NOTICE: &str =
    "A Spotify Premium subscription is required to access the full transcript";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub name: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// An episode record as returned by the metadata API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_date: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    pub show: Show,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub language: Option<String>,
    pub explicit: bool,
    pub show_url: String,
}

/// What the podcast pipeline hands back for one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub podcast_name: String,
    pub episode_title: String,
    pub description: String,
    pub upload_date: String,
    pub duration: String,
    pub timestamps: Vec<Timestamp>,
    pub content: String,
    pub url: String,
    pub image: Option<String>,
    pub additional_info: AdditionalInfo,
}

impl EpisodeSummary {
    /// Builds the summary for `episode`, recording `url` as the link the caller supplied.
    pub fn from_episode(episode: Episode, url: impl Into<String>) -> Self {
        let timestamps = extract_timestamps(&episode.description);
        let image = episode.images.into_iter().next().map(|img| img.url);

        Self {
            podcast_name: episode.show.name,
            episode_title: episode.name,
            upload_date: episode.release_date,
            duration: format_duration(episode.duration_ms),
            timestamps,
            description: episode.description,
            content: TRANSCRIPT_NOTICE.to_string(),
            url: url.into(),
            image,
            additional_info: AdditionalInfo {
                language: episode.language,
                explicit: episode.explicit,
                show_url: episode.show.external_urls.spotify,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPISODE_JSON: &str = r#"{
        "id": "6kIWYhK6y34ua0YBaSm1ru",
        "name": "Brewing at home",
        "description": "00:00 - Welcome\n14:20 - Grinders\n1:02:03 - Q&A",
        "release_date": "2024-03-01",
        "duration_ms": 3725000,
        "images": [
            {"url": "https://i.scdn.co/image/640", "height": 640, "width": 640},
            {"url": "https://i.scdn.co/image/300", "height": 300, "width": 300}
        ],
        "language": "en",
        "explicit": false,
        "show": {
            "name": "Coffee Talk",
            "publisher": "Beans Inc",
            "external_urls": {"spotify": "https://open.spotify.com/show/abc"}
        },
        "type": "episode"
    }"#;

    #[test]
    fn test_summary_from_episode() {
        let episode: Episode = serde_json::from_str(EPISODE_JSON).unwrap();
        let summary = EpisodeSummary::from_episode(
            episode,
            "https://open.spotify.com/episode/6kIWYhK6y34ua0YBaSm1ru",
        );

        assert_eq!(summary.podcast_name, "Coffee Talk");
        assert_eq!(summary.episode_title, "Brewing at home");
        assert_eq!(summary.upload_date, "2024-03-01");
        assert_eq!(summary.duration, "01:02:05");
        assert_eq!(summary.timestamps.len(), 3);
        assert_eq!(summary.timestamps[2].time, "1:02:03");
        assert_eq!(summary.timestamps[2].label, "Q&A");
        assert_eq!(summary.content, TRANSCRIPT_NOTICE);
        assert_eq!(summary.image.as_deref(), Some("https://i.scdn.co/image/640"));
        assert_eq!(summary.additional_info.language.as_deref(), Some("en"));
        assert!(!summary.additional_info.explicit);
        assert_eq!(
            summary.additional_info.show_url,
            "https://open.spotify.com/show/abc"
        );
    }

    #[test]
    fn test_missing_images_serialize_as_null() {
        let mut episode: Episode = serde_json::from_str(EPISODE_JSON).unwrap();
        episode.images.clear();
        let summary = EpisodeSummary::from_episode(episode, "u");
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["image"].is_null());
        assert_eq!(json["additional_info"]["show_url"], "https://open.spotify.com/show/abc");
    }
}
