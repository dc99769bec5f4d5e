// ABOUTME: Error types for the gleaner pipelines including the ErrorCode enum and ExtractError struct.
// ABOUTME: Field-level misses are not errors; only domain, fetch, timeout and upstream failures land here.

use std::fmt;

/// Error codes representing the categories of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The target URL's host is outside the expected domain. Raised before any fetch.
    DomainMismatch,
    /// Network or HTTP status failure while retrieving the document.
    Fetch,
    /// The fetch deadline expired. Retryable by the caller.
    Timeout,
    /// Third-party API failure, bad credentials or a malformed resource id.
    Upstream,
}

impl ErrorCode {
    /// Stable machine-readable name, used in JSON error bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DomainMismatch => "domain_mismatch",
            ErrorCode::Fetch => "fetch",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Upstream => "upstream",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::DomainMismatch => "domain mismatch",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Upstream => "upstream API error",
        };
        write!(f, "{}", s)
    }
}

/// The error type shared by the note and podcast pipelines.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gleaner: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a DomainMismatch error.
    pub fn domain_mismatch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::DomainMismatch, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create an Upstream error.
    pub fn upstream(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Upstream, url, op, source)
    }

    /// Returns true if this is a DomainMismatch error.
    pub fn is_domain_mismatch(&self) -> bool {
        self.code == ErrorCode::DomainMismatch
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an Upstream error.
    pub fn is_upstream(&self) -> bool {
        self.code == ErrorCode::Upstream
    }

    /// Returns true when the caller sent a bad request rather than the pipeline failing.
    pub fn is_client_error(&self) -> bool {
        self.is_domain_mismatch()
    }

    /// Human-readable detail without the `gleaner: op url` prefix.
    pub fn detail(&self) -> String {
        match self.source {
            Some(ref src) => format!("{}: {}", self.code, src),
            None => self.code.to_string(),
        }
    }
}
