// ABOUTME: Site profiles bundling the accepted domain, field strategy chains and media collector for a platform.
// ABOUTME: Ships the Xiaohongshu note profile; profiles are built per call and hold no shared state.

use crate::media::{LeadingMediaPolicy, MediaCollector};
use crate::result::ExtractionResult;
use crate::strategy::{FieldSpec, Page, Strategy};

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const CONTENT_NOT_FOUND: &str = "Content not found";

/// Byline label scan over the raw page. Locale and markup specific, so it
/// only ever runs after every structural strategy has missed.
const AUTHOR_LABEL_PATTERN: &str = r#"(?i)(?:作者|author)\s*[：:]\s*([^\s<>"']+)"#;

/// Everything needed to turn one platform's page into an [`ExtractionResult`].
#[derive(Debug, Clone)]
pub struct SiteProfile {
    domains: Vec<String>,
    title: FieldSpec,
    author: FieldSpec,
    content: FieldSpec,
    media: MediaCollector,
}

impl SiteProfile {
    /// `domains` lists the hosts a request may target; the first is the canonical one.
    pub fn new(
        domains: &[&str],
        title: FieldSpec,
        author: FieldSpec,
        content: FieldSpec,
        media: MediaCollector,
    ) -> Self {
        Self {
            domains: domains.iter().map(|d| d.to_string()).collect(),
            title,
            author,
            content,
            media,
        }
    }

    /// Profile for Xiaohongshu (RED) note pages.
    pub fn xiaohongshu() -> Self {
        let title = FieldSpec::new("title", TITLE_NOT_FOUND)
            .then(Strategy::text("div#detail-title.title"))
            .then(Strategy::text("div.title"))
            .then(Strategy::attr("meta[property='og:title']", "content"))
            .then(Strategy::text("title"));

        let mut author = FieldSpec::new("author", UNKNOWN_AUTHOR)
            .then(Strategy::text("a.name span.username"))
            .then(Strategy::text("span.username"))
            .then(Strategy::attr("meta[name='author']", "content"));
        if let Ok(label) = Strategy::pattern(AUTHOR_LABEL_PATTERN) {
            author = author.then(label);
        }

        let content = FieldSpec::new("content", CONTENT_NOT_FOUND)
            .then(Strategy::text("#detail-desc .note-text"))
            .then(Strategy::text(".note-content"))
            .then(Strategy::text(".content"))
            .then(Strategy::text(".desc"))
            .then(Strategy::text("article"))
            .then(Strategy::attr("meta[name='description']", "content"))
            .then(Strategy::attr("meta[property='og:description']", "content"));

        let media = MediaCollector::new("https://www.xiaohongshu.com");

        // xhslink.com is the share-sheet short link that redirects onto the main site.
        Self::new(
            &["xiaohongshu.com", "xhslink.com"],
            title,
            author,
            content,
            media,
        )
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Replaces the accepted domains, keeping the extraction rules.
    pub fn with_domains(mut self, domains: &[&str]) -> Self {
        self.domains = domains.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn media_collector(&self) -> &MediaCollector {
        &self.media
    }

    /// Replaces the leading-media policy of this profile's collector.
    pub fn with_media_policy(mut self, policy: LeadingMediaPolicy) -> Self {
        self.media = self.media.policy(policy);
        self
    }

    /// Runs every field chain and the media collector over `page`.
    pub fn extract(&self, page: &Page) -> ExtractionResult {
        let title = self.title.extract(page);
        let author = self.author.extract(page);
        let content = self.content.extract(page);
        let media = self.media.collect_urls(page);

        ExtractionResult::assemble(title, author, content, media, page.url().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use url::Url;

    const NOTE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Ignored title - Xiaohongshu</title>
    <meta property="og:title" content="OG title">
    <meta name="description" content="meta description">
</head>
<body>
    <div id="detail-title" class="title">Weekend   in Hangzhou</div>
    <div class="author-wrapper">
        <a class="name" href="/user/profile/1"><span class="username">alice</span></a>
        <img class="avatar-item" src="https://sns-avatar-qc.xhscdn.com/avatar/1.jpg">
    </div>
    <div id="detail-desc" class="desc"><span class="note-text">West Lake at <b>dawn</b>.</span></div>
    <div class="swiper">
        <img src="//sns-webpic-qc.xhscdn.com/photo1.webp">
        <img data-src="https://sns-webpic-qc.xhscdn.com/photo2.jpg">
    </div>
</body>
</html>"#;

    fn page(html: &str) -> Page {
        Page::parse(
            html,
            Url::parse("https://www.xiaohongshu.com/explore/64f1").unwrap(),
        )
    }

    #[test]
    fn extracts_full_note() {
        let result = SiteProfile::xiaohongshu().extract(&page(NOTE_HTML));
        assert_eq!(result.title(), "Weekend in Hangzhou");
        assert_eq!(result.author(), "alice");
        assert_eq!(result.content(), "West Lake at dawn.");
        assert_eq!(
            result.media(),
            &[
                "https://sns-webpic-qc.xhscdn.com/photo1.webp".to_string(),
                "https://sns-webpic-qc.xhscdn.com/photo2.jpg".to_string(),
            ]
        );
        assert_eq!(result.source_url(), "https://www.xiaohongshu.com/explore/64f1");
    }

    #[test]
    fn falls_back_to_meta_and_label() {
        let html = r#"<html><head>
            <meta property="og:title" content="Only OG">
            <meta name="description" content="Described in meta">
        </head><body><p>作者：bob</p></body></html>"#;
        let result = SiteProfile::xiaohongshu().extract(&page(html));
        assert_eq!(result.title(), "Only OG");
        assert_eq!(result.author(), "bob");
        assert_eq!(result.content(), "Described in meta");
        assert!(result.media().is_empty());
    }

    #[test]
    fn empty_page_gets_placeholders() {
        let result = SiteProfile::xiaohongshu().extract(&page("<html><body></body></html>"));
        assert_eq!(result.title(), TITLE_NOT_FOUND);
        assert_eq!(result.author(), UNKNOWN_AUTHOR);
        assert_eq!(result.content(), CONTENT_NOT_FOUND);
        assert!(result.media().is_empty());
    }

    #[test]
    fn media_policy_is_configurable() {
        let profile = SiteProfile::xiaohongshu().with_media_policy(LeadingMediaPolicy::SkipFirst);
        let result = profile.extract(&page(NOTE_HTML));
        assert_eq!(
            result.media(),
            &["https://sns-webpic-qc.xhscdn.com/photo2.jpg".to_string()]
        );
    }
}
