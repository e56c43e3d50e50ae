//! Scanner configuration

use crate::http::DEFAULT_TIMEOUT_SECS;
use std::fmt;
use std::time::Duration;

/// WPScan API base URL
pub const WPSCAN_BASE: &str = "https://wpscan.com";

/// Security headers grading site
pub const SECURITY_HEADERS_BASE: &str = "https://securityheaders.com";

/// Sucuri SiteCheck base URL
pub const SITECHECK_BASE: &str = "https://sitecheck.sucuri.net";

/// How long a cached extraction stays valid
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Token values shipped in sample configs that never authenticate
const PLACEHOLDER_TOKENS: &[&str] = &[
    "YOUR_WPSCAN_KEY",
    "YOUR_API_KEY",
    "your-wpscan-key",
    "changeme",
    "xxx",
];

/// Base URLs of the three external services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub wpscan: String,
    pub security_headers: String,
    pub sitecheck: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            wpscan: WPSCAN_BASE.to_string(),
            security_headers: SECURITY_HEADERS_BASE.to_string(),
            sitecheck: SITECHECK_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one base URL (used against mock servers)
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            wpscan: base.clone(),
            security_headers: base.clone(),
            sitecheck: base,
        }
    }
}

/// WPScan API token; never printed in full
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap a token, rejecting blanks and well-known placeholders
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        let placeholder = PLACEHOLDER_TOKENS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&token));
        if token.is_empty() || placeholder {
            None
        } else {
            Some(Self(token))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Everything a [`Scanner`](crate::Scanner) needs at construction time
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// WPScan token; `None` degrades the WordPress field to "Add key"
    pub wpscan_token: Option<ApiToken>,
    /// Service base URLs
    pub endpoints: Endpoints,
    /// Per-request timeout
    pub timeout: Duration,
    /// Cache window; `None` disables memoization
    pub cache_window: Option<Duration>,
    /// Pause between targets of a batch
    pub delay: Duration,
    /// Targets scanned at once in batch mode
    pub concurrency: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            wpscan_token: None,
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_window: Some(DEFAULT_CACHE_WINDOW),
            delay: Duration::ZERO,
            concurrency: 1,
        }
    }
}
