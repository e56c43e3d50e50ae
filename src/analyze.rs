//! Display values derived from scan results

use crate::scanner::ScanResult;
use serde::Serialize;
use std::fmt;

/// Findings listed per target on the terminal
pub const DISPLAY_FINDINGS_CAP: usize = 15;

/// Derived risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Risk {
    /// No known vulnerabilities and grade A or B
    Low,
    /// Vulnerabilities present or grade C, D or F
    Critical,
}

impl Risk {
    /// CRITICAL when any vulnerability is known or the header grade is poor
    pub fn of(result: &ScanResult) -> Self {
        let poor_grade = result.headers.as_ref().is_ok_and(|g| g.is_poor());
        if result.vulnerability_count() > 0 || poor_grade {
            Self::Critical
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One finding, flattened for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingSummary {
    pub title: String,
    pub fixed_in: String,
}

/// Flat, serializable view of one scan
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Input as given
    pub input: String,
    /// Normalized URL
    pub url: String,
    /// Bare hostname
    pub host: String,
    /// WordPress version or sentinel
    pub wordpress_version: String,
    /// Number of known vulnerabilities
    pub vulnerability_count: usize,
    /// Up to [`DISPLAY_FINDINGS_CAP`] findings
    pub vulnerabilities: Vec<FindingSummary>,
    /// Header grade or sentinel
    pub headers_grade: String,
    /// Blacklist status or sentinel
    pub blacklist_status: String,
    /// Derived risk
    pub risk: Risk,
    /// Per-field failure messages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Summary {
    /// Build the display view of a result
    pub fn new(result: &ScanResult) -> Self {
        let errors = [
            ("wpscan", result.wordpress.as_ref().err()),
            ("security_headers", result.headers.as_ref().err()),
            ("sitecheck", result.blacklist.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| format!("{}: {}", name, e)))
        .collect();

        Self {
            input: result.target.input().to_string(),
            url: result.target.url_str().to_string(),
            host: result.target.host().to_string(),
            wordpress_version: result.version().to_string(),
            vulnerability_count: result.vulnerability_count(),
            vulnerabilities: result
                .vulnerabilities()
                .iter()
                .take(DISPLAY_FINDINGS_CAP)
                .map(|v| FindingSummary {
                    title: v.title_or_default().to_string(),
                    fixed_in: v.fix_or_default().to_string(),
                })
                .collect(),
            headers_grade: result.grade_label(),
            blacklist_status: result.blacklist_label(),
            risk: Risk::of(result),
            errors,
        }
    }
}
