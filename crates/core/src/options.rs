// ABOUTME: Configuration options for the note scraper, and the ScraperBuilder fluent API.
// ABOUTME: Defaults mimic a desktop browser so the platform serves the full server-rendered page.

use std::time::Duration;

use crate::error::ExtractError;
use crate::fetch::HttpFetcher;
use crate::media::LeadingMediaPolicy;
use crate::profile::SiteProfile;
use crate::scraper::Scraper;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Browser-like request headers sent with every document fetch.
pub fn default_headers() -> Vec<(String, String)> {
    [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
        ("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8"),
        ("Cache-Control", "max-age=0"),
        ("Upgrade-Insecure-Requests", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Configuration options for the scraper.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    pub media_policy: LeadingMediaPolicy,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: default_headers(),
            media_policy: LeadingMediaPolicy::Keep,
            http_client: None,
        }
    }
}

/// Builder for constructing a [`Scraper`] over HTTP.
#[derive(Debug, Clone)]
pub struct ScraperBuilder {
    opts: Options,
    profile: Option<SiteProfile>,
}

impl ScraperBuilder {
    /// Create a new ScraperBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            profile: None,
        }
    }

    /// Set the fetch timeout. Expiry surfaces as a Timeout error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add or replace a request header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.opts.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.opts.headers.push((key, value.into()));
        self
    }

    pub fn media_policy(mut self, policy: LeadingMediaPolicy) -> Self {
        self.opts.media_policy = policy;
        self
    }

    /// Use a custom HTTP client. Timeout and user agent must then be set on that client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Use a site profile other than the default Xiaohongshu one.
    pub fn profile(mut self, profile: SiteProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Build the Scraper with the configured options.
    pub fn build(self) -> Result<Scraper<HttpFetcher>, ExtractError> {
        let fetcher = HttpFetcher::new(&self.opts)?;
        let profile = self
            .profile
            .unwrap_or_else(SiteProfile::xiaohongshu)
            .with_media_policy(self.opts.media_policy);
        Ok(Scraper::new(fetcher, profile))
    }
}

impl Default for ScraperBuilder {
    fn default() -> Self {
        Self::new()
    }
}
