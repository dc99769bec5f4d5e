// ABOUTME: The note Scraper: normalizes input, checks the domain, fetches, then runs the site profile.
// ABOUTME: Provides async scrape() for share text or URLs and scrape_html() for documents already in hand.

use url::Url;

use crate::error::ExtractError;
use crate::fetch::{DocumentFetcher, FetchedDocument, HttpFetcher};
use crate::normalize::ExtractionRequest;
use crate::options::ScraperBuilder;
use crate::profile::SiteProfile;
use crate::result::ExtractionResult;
use crate::strategy::Page;

/// Runs the extraction pipeline for one platform.
///
/// Holds no per-request state; one instance can serve concurrent scrapes.
pub struct Scraper<F = HttpFetcher> {
    fetcher: F,
    profile: SiteProfile,
}

impl Scraper<HttpFetcher> {
    /// Create a new ScraperBuilder for configuring an HTTP-backed scraper.
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }
}

impl<F: DocumentFetcher> Scraper<F> {
    pub fn new(fetcher: F, profile: SiteProfile) -> Self {
        Self { fetcher, profile }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Scrapes the note referenced by `input`, which may be a URL or share text containing one.
    ///
    /// The domain is checked before the fetcher is touched.
    #[tracing::instrument(name = "scrape", skip(self))]
    pub async fn scrape(&self, input: &str) -> Result<ExtractionResult, ExtractError> {
        let request = ExtractionRequest::parse(input, self.profile.domains())?;
        tracing::debug!(url = %request.url(), "normalized request");

        let doc = self.fetcher.fetch(request.url()).await.inspect_err(|e| {
            tracing::warn!(url = %request.url(), error = %e, "document fetch failed");
        })?;

        let result = self.extract_document(&doc, request.url());
        tracing::info!(
            url = result.source_url(),
            media = result.media().len(),
            "scrape complete"
        );
        Ok(result)
    }

    /// Runs extraction over `html` as though it had been fetched from `url`.
    pub fn scrape_html(&self, html: &str, url: &str) -> Result<ExtractionResult, ExtractError> {
        let request = ExtractionRequest::parse(url, self.profile.domains())?;
        let doc = FetchedDocument::from_html(request.url().as_str(), html);
        Ok(self.extract_document(&doc, request.url()))
    }

    fn extract_document(&self, doc: &FetchedDocument, requested: &Url) -> ExtractionResult {
        let url = Url::parse(&doc.final_url).unwrap_or_else(|_| requested.clone());
        let page = Page::parse(&doc.text(), url);
        self.profile.extract(&page)
    }
}
