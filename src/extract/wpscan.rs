//! WordPress version and known vulnerabilities from the WPScan API

use super::{Extraction, Extractor};
use crate::config::ApiToken;
use crate::error::ExtractError;
use crate::http::HttpClient;
use crate::target::ScanTarget;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Path of the WordPress lookup endpoint
const WORDPRESSES_PATH: &str = "/api/v3/wordpresses";

/// Version reported when WPScan detects WordPress without one
pub const UNKNOWN_VERSION: &str = "Unknown";

/// A single vulnerability record as returned by WPScan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityFinding {
    /// Vulnerability title
    pub title: Option<String>,
    /// First version containing the fix
    pub fixed_in: Option<String>,
    /// Remaining fields passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VulnerabilityFinding {
    /// Title or a generic placeholder
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown vulnerability")
    }

    /// Fixed-in version or a generic placeholder
    pub fn fix_or_default(&self) -> &str {
        self.fixed_in.as_deref().unwrap_or("Update required")
    }
}

/// What WPScan knows about a site
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WordPressInfo {
    /// No WordPress installation detected
    NotWordPress,
    /// WordPress detected
    Detected {
        version: String,
        vulnerabilities: Vec<VulnerabilityFinding>,
    },
}

impl WordPressInfo {
    /// Version string or the "Not WordPress" sentinel
    pub fn version(&self) -> &str {
        match self {
            Self::NotWordPress => "Not WordPress",
            Self::Detected { version, .. } => version,
        }
    }

    /// Known vulnerabilities (empty when not WordPress)
    pub fn vulnerabilities(&self) -> &[VulnerabilityFinding] {
        match self {
            Self::NotWordPress => &[],
            Self::Detected {
                vulnerabilities, ..
            } => vulnerabilities,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WpScanResponse {
    wordpress: Option<WpScanWordPress>,
}

#[derive(Debug, Deserialize)]
struct WpScanWordPress {
    version: Option<String>,
    vulnerabilities: Option<Vec<VulnerabilityFinding>>,
}

impl From<WpScanResponse> for WordPressInfo {
    fn from(response: WpScanResponse) -> Self {
        match response.wordpress {
            None => Self::NotWordPress,
            Some(wp) => Self::Detected {
                version: wp.version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
                vulnerabilities: wp.vulnerabilities.unwrap_or_default(),
            },
        }
    }
}

/// Queries WPScan for the target's bare host
#[derive(Debug, Clone)]
pub struct WpScanExtractor {
    http: HttpClient,
    base: String,
    token: Option<ApiToken>,
}

impl WpScanExtractor {
    /// Create an extractor; a `None` token yields `MissingCredential` without network calls
    pub fn new(http: HttpClient, base: impl Into<String>, token: Option<ApiToken>) -> Self {
        Self {
            http,
            base: base.into(),
            token,
        }
    }

    fn auth_headers(token: &ApiToken) -> Extraction<HeaderMap> {
        let value = HeaderValue::from_str(&format!("Token token={}", token.expose()))
            .map_err(|_| ExtractError::MissingCredential)?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

#[async_trait]
impl Extractor for WpScanExtractor {
    type Output = WordPressInfo;

    fn name(&self) -> &'static str {
        "wpscan"
    }

    async fn extract(&self, target: &ScanTarget) -> Extraction<WordPressInfo> {
        let Some(token) = &self.token else {
            debug!(host = target.host(), "No WPScan token, skipping lookup.");
            return Err(ExtractError::MissingCredential);
        };

        let url = format!("{}{}", self.base, WORDPRESSES_PATH);
        let response: WpScanResponse = self
            .http
            .get_json(&url, &[("url", target.host())], Self::auth_headers(token)?)
            .await?;

        let info = WordPressInfo::from(response);
        info!(
            host = target.host(),
            version = info.version(),
            vulnerabilities = info.vulnerabilities().len(),
            "WPScan lookup finished."
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DETECTED: &str = r#"{
        "wordpress": {
            "version": "6.2",
            "vulnerabilities": [
                {"title": "WP < 6.2.1 - Shortcode Execution", "fixed_in": "6.2.1", "cvss": {"score": "6.4"}},
                {"title": "WP < 6.2.1 - Directory Traversal", "fixed_in": "6.2.1"}
            ]
        }
    }"#;

    fn parse(json: &str) -> WordPressInfo {
        serde_json::from_str::<WpScanResponse>(json).unwrap().into()
    }

    fn extractor(base: &str, token: Option<&str>) -> WpScanExtractor {
        WpScanExtractor::new(
            HttpClient::new(Duration::from_secs(5)).unwrap(),
            base,
            token.and_then(ApiToken::new),
        )
    }

    #[test]
    fn detected_with_vulnerabilities() {
        let info = parse(DETECTED);
        assert_eq!(info.version(), "6.2");
        assert_eq!(info.vulnerabilities().len(), 2);
        assert_eq!(info.vulnerabilities()[0].fix_or_default(), "6.2.1");
        assert!(info.vulnerabilities()[0].extra.contains_key("cvss"));
    }

    #[test]
    fn missing_wordpress_key() {
        let info = parse(r#"{"error": "not found"}"#);
        assert_eq!(info, WordPressInfo::NotWordPress);
        assert_eq!(info.version(), "Not WordPress");
        assert!(info.vulnerabilities().is_empty());
    }

    #[test]
    fn defaults_for_missing_fields() {
        let info = parse(r#"{"wordpress": {}}"#);
        assert_eq!(info.version(), UNKNOWN_VERSION);
        assert!(info.vulnerabilities().is_empty());
    }

    #[test]
    fn null_vulnerabilities() {
        let info = parse(r#"{"wordpress": {"version": "5.0", "vulnerabilities": null}}"#);
        assert!(info.vulnerabilities().is_empty());
    }

    #[test]
    fn finding_placeholders() {
        let finding: VulnerabilityFinding = serde_json::from_str("{}").unwrap();
        assert_eq!(finding.title_or_default(), "Unknown vulnerability");
        assert_eq!(finding.fix_or_default(), "Update required");
    }

    #[tokio::test]
    async fn queries_bare_host_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/wordpresses"))
            .and(query_param("url", "client.com"))
            .and(header("authorization", "Token token=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETECTED))
            .expect(1)
            .mount(&server)
            .await;

        let target = ScanTarget::parse("https://client.com/about").unwrap();
        let info = extractor(&server.uri(), Some("abc123"))
            .extract(&target)
            .await
            .unwrap();
        assert_eq!(info.version(), "6.2");
        assert_eq!(info.vulnerabilities().len(), 2);
    }

    #[tokio::test]
    async fn missing_token_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETECTED))
            .expect(0)
            .mount(&server)
            .await;

        let target = ScanTarget::parse("client.com").unwrap();
        let result = extractor(&server.uri(), Some("YOUR_WPSCAN_KEY"))
            .extract(&target)
            .await;
        assert_eq!(result.unwrap_err(), ExtractError::MissingCredential);
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let target = ScanTarget::parse("client.com").unwrap();
        let err = extractor(&server.uri(), Some("abc123"))
            .extract(&target)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)));
        assert_eq!(err.sentinel(), "Error");
    }
}
