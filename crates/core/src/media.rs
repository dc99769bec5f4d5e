// ABOUTME: Media URL collector that accumulates image candidates from several surfaces of a page.
// ABOUTME: Normalizes relative URLs, truncates CSS junk, filters avatar/icon/logo noise and dedups by exact string.

//! Media URL collection.
//!
//! No single surface of a note page reliably lists its images, so every
//! surface is scanned and the results accumulated:
//!
//! - `img` elements, checking direct and lazy-load attributes in order,
//! - a raw-text scan for URL-shaped tokens with an image extension,
//! - platform data attributes such as `data-xhs-img`,
//! - a recursive walk of embedded JSON blocks.
//!
//! A surface that finds nothing contributes nothing; it never fails the collection.

use aho_corasick::{AhoCorasick, BuildError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::strategy::Page;

/// URL-shaped token containing an image extension, with any trailing non-delimiter run.
static RAW_MEDIA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<>"']+?(?:jpg|jpeg|png|webp)[^\s<>"'\);]*"#).unwrap()
});

/// Shape a JSON string leaf must have to count as media.
static JSON_MEDIA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://.*?(?:jpg|jpeg|png|webp)").unwrap());

static DEFAULT_DENYLIST_MATCHER: Lazy<AhoCorasick> =
    Lazy::new(|| build_denylist(DEFAULT_DENYLIST).unwrap());

pub const DEFAULT_MEDIA_ATTRS: &[&str] = &["src", "data-src", "data-lazy", "data-original"];
pub const DEFAULT_DATA_ATTRS: &[&str] = &["data-xhs-img"];
pub const DEFAULT_DENYLIST: &[&str] = &["avatar", "icon", "logo"];
pub const DEFAULT_TERMINATORS: &[&str] = &[");background", ");", "&quot;"];

const JSON_SCRIPT_SELECTOR: &str =
    "script[type='application/json'], script[type='application/ld+json']";

/// Which surface of the page produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    Element,
    RawText,
    DataAttribute,
    StructuredData,
}

/// A normalized media URL and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaCandidate {
    pub url: String,
    pub source: MediaSource,
}

/// What to do with the first collected candidate.
///
/// Some page variants lead with a banner image that is not part of the post.
/// `SkipFirst` drops it; the default keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadingMediaPolicy {
    #[default]
    Keep,
    SkipFirst,
}

/// Per-platform media collection settings.
#[derive(Debug, Clone)]
pub struct MediaCollector {
    origin: String,
    base: Option<Url>,
    element_selector: String,
    media_attrs: Vec<String>,
    data_attrs: Vec<String>,
    terminators: Vec<String>,
    denylist: AhoCorasick,
    policy: LeadingMediaPolicy,
}

impl MediaCollector {
    /// A collector with the default attribute lists, denylist and terminators.
    ///
    /// `origin` is the platform's canonical origin, e.g. `https://www.xiaohongshu.com`,
    /// used to resolve relative paths. An unparseable origin drops relative candidates.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let base = Url::parse(&format!("{}/", origin)).ok();
        Self {
            origin,
            base,
            element_selector: "img".to_string(),
            media_attrs: to_owned(DEFAULT_MEDIA_ATTRS),
            data_attrs: to_owned(DEFAULT_DATA_ATTRS),
            terminators: to_owned(DEFAULT_TERMINATORS),
            denylist: DEFAULT_DENYLIST_MATCHER.clone(),
            policy: LeadingMediaPolicy::Keep,
        }
    }

    pub fn policy(mut self, policy: LeadingMediaPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the denylist. Needles match case-insensitively anywhere in the URL.
    pub fn denylist(mut self, needles: &[&str]) -> Result<Self, BuildError> {
        self.denylist = build_denylist(needles)?;
        Ok(self)
    }

    pub fn data_attrs(mut self, attrs: &[&str]) -> Self {
        self.data_attrs = to_owned(attrs);
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Scans every surface and returns the surviving candidates in discovery order.
    pub fn collect(&self, page: &Page) -> Vec<MediaCandidate> {
        let mut out: Vec<MediaCandidate> = Vec::new();

        let raw = self.from_elements(page);
        let found = raw.len();
        self.accept_all(&mut out, raw, MediaSource::Element);
        let raw = self.from_raw_text(page);
        let scanned = raw.len();
        self.accept_all(&mut out, raw, MediaSource::RawText);
        let raw = self.from_data_attrs(page);
        let tagged = raw.len();
        self.accept_all(&mut out, raw, MediaSource::DataAttribute);
        let raw = self.from_structured_data(page);
        let walked = raw.len();
        self.accept_all(&mut out, raw, MediaSource::StructuredData);

        tracing::debug!(
            elements = found,
            raw_text = scanned,
            data_attrs = tagged,
            structured = walked,
            kept = out.len(),
            "media surfaces scanned"
        );

        if self.policy == LeadingMediaPolicy::SkipFirst && !out.is_empty() {
            out.remove(0);
        }
        out
    }

    /// Convenience wrapper returning only the URLs.
    pub fn collect_urls(&self, page: &Page) -> Vec<String> {
        self.collect(page).into_iter().map(|c| c.url).collect()
    }

    /// Applies the normalization rules to one raw candidate.
    ///
    /// Returns `None` when the candidate is empty, does not resolve to an
    /// http(s) URL, or hits the denylist.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let url = self.resolve(raw)?;
        if self.denylist.is_match(&url) {
            return None;
        }
        Some(url)
    }

    /// Truncates CSS junk and resolves `raw` against the origin.
    ///
    /// `//host/x` takes `https:`, `/x` and bare relative paths join the origin.
    /// Only http and https survive, so `data:` and `javascript:` values are dropped.
    fn resolve(&self, raw: &str) -> Option<String> {
        let mut raw = raw.trim().to_string();
        if let Some(cut) = self
            .terminators
            .iter()
            .filter_map(|t| raw.find(t.as_str()))
            .min()
        {
            raw.truncate(cut);
        }
        let trimmed_len = raw.trim_end_matches([';', ')']).len();
        raw.truncate(trimmed_len);
        if raw.is_empty() {
            return None;
        }

        let url = match Url::parse(&raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base.as_ref()?.join(&raw).ok()?,
            Err(_) => return None,
        };
        match url.scheme() {
            "http" | "https" => Some(url.to_string()),
            _ => None,
        }
    }

    fn accept_all(&self, out: &mut Vec<MediaCandidate>, raw: Vec<String>, source: MediaSource) {
        for candidate in raw {
            let Some(url) = self.normalize(&candidate) else {
                continue;
            };
            if out.iter().any(|c| c.url == url) {
                continue;
            }
            out.push(MediaCandidate { url, source });
        }
    }

    fn from_elements(&self, page: &Page) -> Vec<String> {
        let Ok(sel) = Selector::parse(&self.element_selector) else {
            return Vec::new();
        };
        page.document()
            .select(&sel)
            .filter_map(|el| {
                self.media_attrs.iter().find_map(|attr| {
                    el.value()
                        .attr(attr)
                        .filter(|v| self.resolve(v).is_some())
                        .map(str::to_string)
                })
            })
            .collect()
    }

    fn from_raw_text(&self, page: &Page) -> Vec<String> {
        RAW_MEDIA_RE
            .find_iter(page.raw())
            .map(|m| m.as_str().to_string())
            .filter(|url| has_path(url))
            .collect()
    }

    fn from_data_attrs(&self, page: &Page) -> Vec<String> {
        let mut out = Vec::new();
        for attr in &self.data_attrs {
            let Ok(sel) = Selector::parse(&format!("[{}]", attr)) else {
                continue;
            };
            for el in page.document().select(&sel) {
                if let Some(v) = el.value().attr(attr) {
                    out.push(v.to_string());
                }
            }
        }
        out
    }

    fn from_structured_data(&self, page: &Page) -> Vec<String> {
        let Ok(sel) = Selector::parse(JSON_SCRIPT_SELECTOR) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for script in page.document().select(&sel) {
            let body = script.text().collect::<String>();
            match serde_json::from_str::<Value>(body.trim()) {
                Ok(value) => collect_json_media(&value, &mut out),
                Err(e) => tracing::warn!(error = %e, "skipping unparseable JSON block"),
            }
        }
        out
    }
}

/// Walks `value` depth-first, pushing every string leaf that looks like a media URL.
pub fn collect_json_media(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if JSON_MEDIA_RE.is_match(s) {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_json_media(item, out);
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                collect_json_media(v, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// True when the URL has something after `scheme://host/`.
fn has_path(url: &str) -> bool {
    url.split('/').count() > 3
}

fn build_denylist(needles: &[&str]) -> Result<AhoCorasick, BuildError> {
    AhoCorasick::builder().ascii_case_insensitive(true).build(needles)
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
