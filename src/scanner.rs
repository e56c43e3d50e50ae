//! Scan aggregation
//!
//! Runs the three extractors for a target and assembles a [`ScanResult`].
//! Extractor failures are stored in the result, never propagated.

use crate::cache::Cached;
use crate::config::{ApiToken, Endpoints, ScannerConfig};
use crate::error::Result;
use crate::extract::{
    BlacklistStatus, Extraction, Extractor, HeaderGrade, HeaderGradeExtractor, SiteCheckExtractor,
    VulnerabilityFinding, WordPressInfo, WpScanExtractor,
};
use crate::http::HttpClient;
use crate::target::ScanTarget;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shared extractor strategy producing `T`
pub type DynExtractor<T> = Arc<dyn Extractor<Output = T>>;

/// Outcome of scanning one target
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Target that was scanned
    pub target: ScanTarget,
    /// WPScan lookup
    pub wordpress: Extraction<WordPressInfo>,
    /// Security headers grade
    pub headers: Extraction<HeaderGrade>,
    /// Blacklist status
    pub blacklist: Extraction<BlacklistStatus>,
}

impl ScanResult {
    /// WordPress version, "Not WordPress", or the failure sentinel
    pub fn version(&self) -> &str {
        match &self.wordpress {
            Ok(info) => info.version(),
            Err(e) => e.sentinel(),
        }
    }

    /// Known vulnerabilities; empty when the lookup failed
    pub fn vulnerabilities(&self) -> &[VulnerabilityFinding] {
        match &self.wordpress {
            Ok(info) => info.vulnerabilities(),
            Err(_) => &[],
        }
    }

    /// Number of known vulnerabilities
    pub fn vulnerability_count(&self) -> usize {
        self.vulnerabilities().len()
    }

    /// Header grade letter or the failure sentinel
    pub fn grade_label(&self) -> String {
        match &self.headers {
            Ok(grade) => grade.to_string(),
            Err(e) => e.sentinel().to_string(),
        }
    }

    /// Blacklist status or the failure sentinel
    pub fn blacklist_label(&self) -> String {
        match &self.blacklist {
            Ok(status) => status.to_string(),
            Err(e) => e.sentinel().to_string(),
        }
    }

    /// True when no extractor failed
    pub fn is_complete(&self) -> bool {
        self.wordpress.is_ok() && self.headers.is_ok() && self.blacklist.is_ok()
    }
}

/// Runs the extractors for one or more targets
pub struct Scanner {
    wordpress: DynExtractor<WordPressInfo>,
    headers: DynExtractor<HeaderGrade>,
    blacklist: DynExtractor<BlacklistStatus>,
    delay: Duration,
    concurrency: usize,
}

/// Builder for configuring a Scanner with options
#[derive(Debug, Default)]
pub struct ScannerBuilder {
    config: ScannerConfig,
}

impl ScannerBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// WPScan token; without one the WordPress field degrades to "Add key"
    pub fn wpscan_token(mut self, token: Option<ApiToken>) -> Self {
        self.config.wpscan_token = token;
        self
    }

    /// Override service base URLs
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Memoization window; `None` disables caching
    pub fn cache_window(mut self, window: Option<Duration>) -> Self {
        self.config.cache_window = window;
        self
    }

    /// Politeness delay between batch targets
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Targets scanned at once in batch mode (minimum 1)
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Build the Scanner with the configured options
    pub fn build(self) -> Result<Scanner> {
        let ScannerConfig {
            wpscan_token,
            endpoints,
            timeout,
            cache_window,
            delay,
            concurrency,
        } = self.config;

        let http = HttpClient::new(timeout)?;
        let wpscan = WpScanExtractor::new(http.clone(), endpoints.wpscan, wpscan_token);
        let headers = HeaderGradeExtractor::new(http.clone(), endpoints.security_headers);
        let sitecheck = SiteCheckExtractor::new(http, endpoints.sitecheck);

        let scanner = match cache_window {
            Some(window) => Scanner::with_extractors(
                Arc::new(Cached::new(wpscan, window)),
                Arc::new(Cached::new(headers, window)),
                Arc::new(Cached::new(sitecheck, window)),
            ),
            None => Scanner::with_extractors(Arc::new(wpscan), Arc::new(headers), Arc::new(sitecheck)),
        };

        Ok(Scanner {
            delay,
            concurrency: concurrency.max(1),
            ..scanner
        })
    }
}

impl Scanner {
    /// Create a scanner with default endpoints, caching on, and the given token
    pub fn new(wpscan_token: Option<ApiToken>) -> Result<Self> {
        Self::builder().wpscan_token(wpscan_token).build()
    }

    /// Create a builder for configuring scanner options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_guard::{ApiToken, Scanner};
    /// use std::time::Duration;
    ///
    /// let scanner = Scanner::builder()
    ///     .wpscan_token(ApiToken::new("my-token"))
    ///     .timeout(Duration::from_secs(15))
    ///     .build()?;
    /// # Ok::<(), site_guard::Error>(())
    /// ```
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    /// Assemble a scanner from arbitrary extractor strategies
    pub fn with_extractors(
        wordpress: DynExtractor<WordPressInfo>,
        headers: DynExtractor<HeaderGrade>,
        blacklist: DynExtractor<BlacklistStatus>,
    ) -> Self {
        Self {
            wordpress,
            headers,
            blacklist,
            delay: Duration::ZERO,
            concurrency: 1,
        }
    }

    /// Normalize `input` and scan it
    ///
    /// Only an invalid URL is an error; service failures end up in the result.
    pub async fn scan(&self, input: &str) -> Result<ScanResult> {
        let target = ScanTarget::parse(input)?;
        Ok(self.scan_target(target).await)
    }

    /// Scan an already normalized target
    pub async fn scan_target(&self, target: ScanTarget) -> ScanResult {
        info!(host = target.host(), "Starting scan.");

        let (wordpress, headers, blacklist) = tokio::join!(
            self.wordpress.extract(&target),
            self.headers.extract(&target),
            self.blacklist.extract(&target),
        );

        let result = ScanResult {
            target,
            wordpress,
            headers,
            blacklist,
        };

        if result.is_complete() {
            info!(host = result.target.host(), "Scan finished.");
        } else {
            warn!(
                host = result.target.host(),
                wordpress = result.version(),
                headers = %result.grade_label(),
                blacklist = %result.blacklist_label(),
                "Scan finished with degraded fields."
            );
        }
        result
    }

    /// Scan many inputs, each in isolation
    ///
    /// Results keep input order. A bad URL or failing service for one input
    /// never affects the others. Every target after the first waits for the
    /// delay, and waits are taken one at a time, so target starts stay at
    /// least `delay` apart at any concurrency.
    pub async fn scan_batch<S: AsRef<str>>(&self, inputs: &[S]) -> Vec<Result<ScanResult>> {
        info!(targets = inputs.len(), concurrency = self.concurrency, "Starting batch.");
        let pacer = &tokio::sync::Mutex::new(());

        stream::iter(inputs.iter().enumerate())
            .map(|(index, input)| async move {
                if index > 0 && !self.delay.is_zero() {
                    let _turn = pacer.lock().await;
                    tokio::time::sleep(self.delay).await;
                }
                let result = self.scan(input.as_ref()).await;
                if let Err(e) = &result {
                    warn!(input = input.as_ref(), error = %e, "Skipping target.");
                }
                result
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
