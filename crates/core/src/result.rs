// ABOUTME: ExtractionResult, the immutable record a note scrape produces, and its assembler.
// ABOUTME: Includes markdown rendering for the CLI and a check for whether any media survived.

use serde::{Deserialize, Serialize};

/// The result of scraping one note.
///
/// Every field is always present: text fields carry their placeholder when no
/// strategy matched and `media` is empty when nothing survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    title: String,
    author: String,
    content: String,
    media: Vec<String>,
    #[serde(rename = "url")]
    source_url: String,
}

impl ExtractionResult {
    /// Merges the field outputs and the media list into one record.
    pub fn assemble(
        title: String,
        author: String,
        content: String,
        media: Vec<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title,
            author,
            content,
            media,
            source_url: source_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn media(&self) -> &[String] {
        &self.media
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }

    /// Format the result as a markdown document.
    pub fn format_markdown(&self) -> String {
        let mut parts = vec![
            format!("# {}", self.title),
            format!("By {}", self.author),
            format!("Source: {}", self.source_url),
            "---".to_string(),
            self.content.clone(),
        ];

        for (i, url) in self.media.iter().enumerate() {
            parts.push(format!("![Image {}]({})", i + 1, url));
        }

        parts.join("\n\n")
    }
}
