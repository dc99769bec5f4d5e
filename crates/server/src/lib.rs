// ABOUTME: HTTP query surface for gleaner: note scraping and podcast episode summaries.
// ABOUTME: Exposes Config, AppState and build_app so the binary and tests share one router.

pub mod app;
pub mod config;
pub mod routes;

pub use app::{build_app, AppState};
pub use config::Config;
pub use routes::{ApiError, ErrorBody};
