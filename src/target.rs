//! Scan target normalization

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Allowed URL schemes
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Scheme prepended when the input has none
const DEFAULT_SCHEME: &str = "https://";

/// A normalized website under scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    input: String,
    url: Url,
    host: String,
}

impl ScanTarget {
    /// Normalize user input into a scan target
    ///
    /// Inputs without a scheme get `https://`. Only http and https are
    /// accepted and the URL must carry a host.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidUrl("empty input".to_string()));
        }

        let url = Url::parse(&with_scheme(trimmed)).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            return Err(Error::InvalidUrl(format!(
                "scheme '{}' not allowed (use http or https)",
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidUrl("missing host".to_string()))?
            .to_string();

        Ok(Self {
            input: input.to_string(),
            url,
            host,
        })
    }

    /// The string this target was parsed from
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Absolute URL with a scheme
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Bare hostname, used as cache and report key
    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL as sent to the grading and blacklist services
    ///
    /// The root path's trailing slash is dropped so `client.com` is
    /// submitted as `https://client.com`.
    pub fn url_str(&self) -> &str {
        let s = self.url.as_str();
        if self.url.path() == "/" && self.url.query().is_none() && self.url.fragment().is_none() {
            s.strip_suffix('/').unwrap_or(s)
        } else {
            s
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_str())
    }
}

/// Split a newline-separated URL list, skipping blanks and `#` comments
pub fn parse_target_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn with_scheme(input: &str) -> String {
    if input.contains("://") {
        input.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_https_scheme() {
        let target = ScanTarget::parse("client.com").unwrap();
        assert_eq!(target.url().scheme(), "https");
        assert_eq!(target.url_str(), "https://client.com");
        assert_eq!(target.host(), "client.com");
        assert_eq!(target.input(), "client.com");
    }

    #[test]
    fn keeps_existing_scheme() {
        let target = ScanTarget::parse("http://client.com/blog").unwrap();
        assert_eq!(target.url_str(), "http://client.com/blog");
        assert_eq!(target.host(), "client.com");
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["client.com", "www.client.com/shop", "https://client.com", "http://a.b.c/x?y=1"] {
            let once = ScanTarget::parse(input).unwrap();
            let twice = ScanTarget::parse(once.url_str()).unwrap();
            assert_eq!(once.url(), twice.url(), "input {input}");
            assert_eq!(once.host(), twice.host());
            assert!(!twice.url_str().starts_with("https://https://"));
        }
    }

    #[test]
    fn host_strips_path_and_port() {
        let target = ScanTarget::parse("https://Client.com:8443/wp-admin/").unwrap();
        assert_eq!(target.host(), "client.com");
    }

    #[test]
    fn trims_whitespace() {
        let target = ScanTarget::parse("  client.com \n").unwrap();
        assert_eq!(target.host(), "client.com");
    }

    #[test]
    fn target_list_skips_blanks_and_comments() {
        let list = "client.com\n\n# prospects\n  https://other.org/  \r\nthird.net";
        assert_eq!(
            parse_target_list(list),
            vec!["client.com", "https://other.org/", "third.net"]
        );
    }

    #[test]
    fn reject_empty() {
        assert!(ScanTarget::parse("   ").is_err());
    }

    #[test]
    fn reject_invalid() {
        assert!(ScanTarget::parse("not a url").is_err());
    }

    #[test]
    fn reject_ftp_scheme() {
        let result = ScanTarget::parse("ftp://example.com");
        assert!(result.unwrap_err().to_string().contains("scheme"));
    }
}
