// ABOUTME: Document fetching: the DocumentFetcher seam and its reqwest-backed HttpFetcher.
// ABOUTME: Sends browser-like headers, enforces timeout and size limits, and decodes the body charset.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::ExtractError;
use crate::options::Options;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// A retrieved document.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedDocument {
    /// A document that was not fetched over HTTP, e.g. read from disk.
    pub fn from_html(url: &str, html: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: Bytes::from(html.into()),
        }
    }

    /// Decodes the body using the content-type charset, or detection when absent.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Retrieves a document for the scrape pipeline.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, ExtractError>;
}

/// Fetches documents with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
}

impl HttpFetcher {
    /// Builds a fetcher from the given options.
    pub fn new(opts: &Options) -> Result<Self, ExtractError> {
        let client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    ExtractError::fetch(
                        "",
                        "BuildClient",
                        Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                    )
                })?,
        };

        Ok(Self {
            client,
            headers: opts.headers.clone(),
        })
    }
}

fn classify(url: &str, what: &str, e: reqwest::Error) -> ExtractError {
    if e.is_timeout() {
        ExtractError::timeout(url, "Fetch", Some(anyhow::anyhow!("{}: {}", what, e)))
    } else {
        ExtractError::fetch(url, "Fetch", Some(anyhow::anyhow!("{}: {}", what, e)))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, ExtractError> {
        let url_str = url.as_str();

        let mut request = self.client.get(url.clone());
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify(url_str, "request failed", e))?;

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                return Err(ExtractError::fetch(
                    url_str,
                    "Fetch",
                    Some(anyhow::anyhow!("content too large")),
                ));
            }
        }

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        if !status.is_success() {
            tracing::warn!(url = url_str, status = status.as_u16(), "fetch returned error status");
            return Err(ExtractError::fetch(
                url_str,
                "Fetch",
                Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(url_str, "failed to read body", e))?;

        if body.len() > MAX_CONTENT_LENGTH {
            return Err(ExtractError::fetch(
                url_str,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }

        tracing::debug!(url = url_str, final_url = %final_url, bytes = body.len(), "fetched document");

        Ok(FetchedDocument {
            url: url_str.to_string(),
            final_url,
            content_type,
            body,
        })
    }
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.to_lowercase().split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}
