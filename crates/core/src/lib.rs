// ABOUTME: Main library entry point for gleaner-core, the resilient note extraction pipeline.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, ExtractionResult, ExtractError, strategies and media collection.

//! gleaner-core - pulls structured fields out of hostile, inconsistently structured pages.
//!
//! Input text is normalized to a URL, checked against the platform's domains,
//! fetched, and then every field runs an ordered fallback chain while the
//! media collector sweeps several surfaces of the page for image URLs.
//!
//! # Example
//!
//! ```no_run
//! use gleaner_core::{ExtractError, Scraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExtractError> {
//!     let scraper = Scraper::builder().build()?;
//!     let result = scraper
//!         .scrape("see http://xhslink.com/a/AbCdEf and enjoy")
//!         .await?;
//!     println!("{}", result.format_markdown());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fetch;
pub mod media;
pub mod normalize;
pub mod options;
pub mod profile;
pub mod result;
pub mod scraper;
pub mod strategy;
pub mod text;

pub use crate::error::{ErrorCode, ExtractError};
pub use crate::fetch::{DocumentFetcher, FetchedDocument, HttpFetcher};
pub use crate::media::{LeadingMediaPolicy, MediaCandidate, MediaCollector, MediaSource};
pub use crate::normalize::{check_domain, extract_url, ExtractionRequest};
pub use crate::options::{Options, ScraperBuilder};
pub use crate::profile::SiteProfile;
pub use crate::result::ExtractionResult;
pub use crate::scraper::Scraper;
pub use crate::strategy::{FieldMatch, FieldSpec, Page, Strategy};
