//! Downloadable sales report
//!
//! Rendering is pure: the same target, result and date always produce the
//! same bytes. Writing the file is left to the caller.

use crate::scanner::ScanResult;
use chrono::NaiveDate;

/// Findings listed in the report
pub const REPORT_FINDINGS_CAP: usize = 20;

/// Width of the rule lines
const RULE_WIDTH: usize = 60;

const TITLE: &str = "HFB Technologies – Detailed Security Report";

const PITCH_HEADING: &str = "RECOMMENDED ACTION";

const PITCH: &[&str] = &[
    "One-Time Full Fix + Clean Report: $3,500",
    "Monthly Unlimited Protection: $299/mo or $249/mo annual",
    "",
    "Contact HFB Technologies today",
];

/// A rendered report artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    file_name: String,
    body: Vec<u8>,
}

impl Report {
    /// MIME type of [`Report::bytes`]
    pub const CONTENT_TYPE: &'static str = "text/plain; charset=utf-8";

    /// Suggested download name, e.g. `HFB_Detailed_Report_client.com.txt`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// UTF-8 report body
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

/// Render the report for one scan
pub fn render(result: &ScanResult, date: NaiveDate) -> Report {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let vulns = result.vulnerabilities();

    let mut lines = vec![
        TITLE.to_string(),
        heavy.clone(),
        format!("Site: {}", result.target),
        format!("Date: {}", date.format("%B %d, %Y")),
        String::new(),
        format!("WordPress Version: {}", result.version()),
        format!("Security Headers Grade: {}", result.grade_label()),
        format!("Malware Status: {}", result.blacklist_label()),
        String::new(),
        format!("KNOWN VULNERABILITIES ({} found)", vulns.len()),
        light.clone(),
    ];

    for finding in vulns.iter().take(REPORT_FINDINGS_CAP) {
        lines.push(format!("• {}", finding.title_or_default()));
        lines.push(format!(
            "  Fix: Update to version {} or higher",
            finding.fix_or_default()
        ));
        lines.push(String::new());
    }
    if vulns.len() > REPORT_FINDINGS_CAP {
        lines.push(format!(
            "... and {} more not listed",
            vulns.len() - REPORT_FINDINGS_CAP
        ));
        lines.push(String::new());
    }

    lines.push(PITCH_HEADING.to_string());
    lines.push(light);
    lines.extend(PITCH.iter().map(|s| s.to_string()));
    lines.push(heavy);

    Report {
        file_name: format!("HFB_Detailed_Report_{}.txt", result.target.host()),
        body: lines.join("\n").into_bytes(),
    }
}
