//! Malware and blacklist status from Sucuri SiteCheck

use super::{Extraction, Extractor};
use crate::http::HttpClient;
use crate::target::ScanTarget;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Any of these in the results page marks the site as infected
const INFECTED_KEYWORDS: &[&str] = &["malware", "blacklist", "suspicious", "spam", "blacklisted"];

/// Checked only when no infected keyword matched
const CLEAN_KEYWORDS: &[&str] = &["clean", "no issues"];

/// Blacklist classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlacklistStatus {
    Clean,
    Infected,
    Unknown,
}

impl fmt::Display for BlacklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "Clean"),
            Self::Infected => write!(f, "INFECTED / BLACKLISTED"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Classify a results page by keyword search (case-insensitive)
pub fn classify(body: &str) -> BlacklistStatus {
    let text = body.to_lowercase();
    if INFECTED_KEYWORDS.iter().any(|k| text.contains(k)) {
        BlacklistStatus::Infected
    } else if CLEAN_KEYWORDS.iter().any(|k| text.contains(k)) {
        BlacklistStatus::Clean
    } else {
        BlacklistStatus::Unknown
    }
}

/// Fetches the SiteCheck results page for a target
#[derive(Debug, Clone)]
pub struct SiteCheckExtractor {
    http: HttpClient,
    base: String,
}

impl SiteCheckExtractor {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }
}

#[async_trait]
impl Extractor for SiteCheckExtractor {
    type Output = BlacklistStatus;

    fn name(&self) -> &'static str {
        "sitecheck"
    }

    async fn extract(&self, target: &ScanTarget) -> Extraction<BlacklistStatus> {
        let url = format!("{}/results/{}", self.base, target.url_str());
        let body = self.http.get_text(&url, &[], HeaderMap::new()).await?;

        let status = classify(&body);
        info!(host = target.host(), %status, "Blacklist check finished.");
        Ok(status)
    }
}
