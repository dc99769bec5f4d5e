// ABOUTME: URL normalizer that pulls the first URL-like token out of free-form share text.
// ABOUTME: Also validates the target host against an expected domain before anything is fetched.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::ExtractError;

/// Scheme-prefixed token, or a `www.` token, bounded by whitespace, quotes or angle brackets.
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap());

/// Returns the first URL-like substring of `text`, or `text` unchanged when there is none.
///
/// Share text from mobile apps usually wraps the link in prose, e.g.
/// `"Check this out http://xhslink.com/a/b copy and open"`.
pub fn extract_url(text: &str) -> String {
    match URL_RE.find(text) {
        Some(m) => m.as_str().to_string(),
        None => text.to_string(),
    }
}

/// Returns true if `host` is `domain` itself or one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Parses `candidate` and checks its host belongs to one of `domains`.
///
/// A bare `www.` token is given an `https://` scheme first. Anything that does not
/// parse, has no host, or sits on another domain is a `DomainMismatch`.
pub fn check_domain<S: AsRef<str>>(candidate: &str, domains: &[S]) -> Result<Url, ExtractError> {
    let domain = domains.first().map(|d| d.as_ref()).unwrap_or("");
    let with_scheme = if candidate.starts_with("www.") {
        format!("https://{}", candidate)
    } else {
        candidate.to_string()
    };

    let url = Url::parse(&with_scheme).map_err(|e| {
        ExtractError::domain_mismatch(
            candidate,
            "CheckDomain",
            Some(anyhow::anyhow!("not a {} link: {}", domain, e)),
        )
    })?;

    match url.host_str() {
        Some(host) if domains.iter().any(|d| host_matches(host, d.as_ref())) => Ok(url),
        _ => Err(ExtractError::domain_mismatch(
            candidate,
            "CheckDomain",
            Some(anyhow::anyhow!("not a {} link", domain)),
        )),
    }
}

/// A scrape request: the caller's raw text plus the validated target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    input: String,
    url: Url,
}

impl ExtractionRequest {
    /// Normalizes `input` and validates it against the accepted `domains`.
    pub fn parse<S: AsRef<str>>(input: &str, domains: &[S]) -> Result<Self, ExtractError> {
        let candidate = extract_url(input);
        let url = check_domain(&candidate, domains)?;
        Ok(Self {
            input: input.to_string(),
            url,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_embedded_url_span() {
        let text = "Look at this note https://www.xiaohongshu.com/explore/64f1?xsec=abc and share";
        assert_eq!(
            extract_url(text),
            "https://www.xiaohongshu.com/explore/64f1?xsec=abc"
        );
    }

    #[test]
    fn stops_at_quote_and_angle_bracket() {
        assert_eq!(
            extract_url(r#"<a href="http://xhslink.com/a/b">link</a>"#),
            "http://xhslink.com/a/b"
        );
        assert_eq!(extract_url("<https://a.example/x>"), "https://a.example/x");
    }

    #[test]
    fn picks_first_of_several() {
        assert_eq!(
            extract_url("one http://a.example/1 two https://b.example/2"),
            "http://a.example/1"
        );
    }

    #[test]
    fn www_prefixed_token_is_found() {
        assert_eq!(
            extract_url("visit www.xiaohongshu.com/explore/1 now"),
            "www.xiaohongshu.com/explore/1"
        );
    }

    #[test]
    fn returns_input_when_no_url() {
        assert_eq!(extract_url("no links here"), "no links here");
        assert_eq!(extract_url(""), "");
    }

    #[test]
    fn host_matching_includes_subdomains_only() {
        assert!(host_matches("xiaohongshu.com", "xiaohongshu.com"));
        assert!(host_matches("www.XiaoHongShu.com", "xiaohongshu.com"));
        assert!(!host_matches("notxiaohongshu.com", "xiaohongshu.com"));
        assert!(!host_matches("xiaohongshu.com.evil.io", "xiaohongshu.com"));
    }

    #[test]
    fn check_domain_accepts_www_token() {
        let url = check_domain("www.xiaohongshu.com/explore/1", &["xiaohongshu.com"]).unwrap();
        assert_eq!(url.as_str(), "https://www.xiaohongshu.com/explore/1");
    }

    #[test]
    fn check_domain_rejects_other_hosts_and_garbage() {
        let err = check_domain("https://example.com/x", &["xiaohongshu.com"]).unwrap_err();
        assert!(err.is_domain_mismatch());

        let err = check_domain("just some words", &["xiaohongshu.com"]).unwrap_err();
        assert!(err.is_domain_mismatch());
    }

    #[test]
    fn check_domain_accepts_any_listed_domain() {
        let domains = ["xiaohongshu.com", "xhslink.com"];
        let url = check_domain("http://xhslink.com/a/Bc1", &domains).unwrap();
        assert_eq!(url.host_str(), Some("xhslink.com"));
        assert!(check_domain("https://example.com", &domains).is_err());
        assert!(check_domain("https://example.com", &[] as &[&str]).is_err());
    }

    #[test]
    fn request_keeps_input_and_url() {
        let req = ExtractionRequest::parse(
            "shared: https://www.xiaohongshu.com/explore/9 !",
            &["xiaohongshu.com"],
        )
        .unwrap();
        assert_eq!(req.input(), "shared: https://www.xiaohongshu.com/explore/9 !");
        assert_eq!(req.url().as_str(), "https://www.xiaohongshu.com/explore/9");
    }
}
