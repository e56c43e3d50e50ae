//! Security headers letter grade from securityheaders.com
//!
//! The grading page is third-party markup, so extraction is a best-effort
//! heuristic checked against frozen snapshots.

use super::{Extraction, Extractor};
use crate::http::HttpClient;
use crate::target::ScanTarget;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Element holding the grade on the results page
const SCORE_SELECTOR: &str = "div.score span";

/// Letter grade A (best) to F (worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum HeaderGrade {
    A,
    B,
    C,
    D,
    F,
}

impl HeaderGrade {
    /// Parse a grade token such as "B" or "A+"
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().chars().next()?.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    /// Map a 0-100 score to a letter
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    /// C, D and F count as a risk in summaries
    pub fn is_poor(self) -> bool {
        matches!(self, Self::C | Self::D | Self::F)
    }
}

impl fmt::Display for HeaderGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Grade a results page; falls back to F when nothing matches
pub fn grade_from_markup(html: &str) -> HeaderGrade {
    grade_from_score_element(html)
        .or_else(|| grade_from_class_marker(html))
        .or_else(|| grade_from_label(html))
        .or_else(|| grade_from_numeric_score(html))
        .unwrap_or(HeaderGrade::F)
}

/// `<div class="score"><span>A</span></div>`
fn grade_from_score_element(html: &str) -> Option<HeaderGrade> {
    let selector = Selector::parse(SCORE_SELECTOR).ok()?;
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .filter(|text| text.trim().len() <= 2)
        .find_map(|text| HeaderGrade::from_token(&text))
}

/// CSS-class-like marker, e.g. `grade-B`
fn grade_from_class_marker(html: &str) -> Option<HeaderGrade> {
    let re = Regex::new(r"\bgrade-([A-F])\b").ok()?;
    HeaderGrade::from_token(re.captures(html)?.get(1)?.as_str())
}

/// Labelled field, e.g. `Grade: C` or `"grade":"C"`
fn grade_from_label(html: &str) -> Option<HeaderGrade> {
    let re = Regex::new(r#"(?i)\bgrade"?\s*[:=]\s*["']?([A-F])\b"#).ok()?;
    HeaderGrade::from_token(re.captures(html)?.get(1)?.as_str())
}

/// Numeric score near a "score" label, e.g. `Score: 85`
fn grade_from_numeric_score(html: &str) -> Option<HeaderGrade> {
    let re = Regex::new(r"(?i)\bscore\b\D{0,20}?(\d{1,3})\b").ok()?;
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .find(|score| *score <= 100)
        .map(HeaderGrade::from_score)
}

/// Fetches and grades the target's security headers report
#[derive(Debug, Clone)]
pub struct HeaderGradeExtractor {
    http: HttpClient,
    base: String,
}

impl HeaderGradeExtractor {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }
}

#[async_trait]
impl Extractor for HeaderGradeExtractor {
    type Output = HeaderGrade;

    fn name(&self) -> &'static str {
        "security_headers"
    }

    async fn extract(&self, target: &ScanTarget) -> Extraction<HeaderGrade> {
        let url = format!("{}/", self.base);
        let query = [("q", target.url_str()), ("followRedirects", "on")];
        let html = self.http.get_text(&url, &query, HeaderMap::new()).await?;

        debug!(host = target.host(), bytes = html.len(), "Grading headers report.");
        let grade = grade_from_markup(&html);
        info!(host = target.host(), %grade, "Security headers graded.");
        Ok(grade)
    }
}
