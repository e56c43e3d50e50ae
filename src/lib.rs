//! Site Guard - client website security scan
//!
//! Queries WPScan, securityheaders.com and Sucuri SiteCheck for a website,
//! aggregates the answers and renders a plain-text sales report.
//!
//! # Example
//!
//! ```no_run
//! use site_guard::{ApiToken, Scanner, report};
//!
//! #[tokio::main]
//! async fn main() -> site_guard::Result<()> {
//!     let scanner = Scanner::new(ApiToken::new("my-wpscan-token"))?;
//!     let result = scanner.scan("client.com").await?;
//!     println!("Headers grade: {}", result.grade_label());
//!     let report = report::render(&result, chrono::Local::now().date_naive());
//!     std::fs::write(report.file_name(), report.bytes()).ok();
//!     Ok(())
//! }
//! ```

pub mod analyze;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;
pub mod output;
pub mod report;
pub mod scanner;
pub mod target;

pub use analyze::{Risk, Summary};
pub use cache::Cached;
pub use config::{ApiToken, Endpoints, ScannerConfig};
pub use error::{Error, ExtractError, Result};
pub use extract::{
    BlacklistStatus, Extraction, Extractor, HeaderGrade, VulnerabilityFinding, WordPressInfo,
};
pub use output::{OutputConfig, OutputFormat, OutputSort, output_summaries};
pub use report::Report;
pub use scanner::{ScanResult, Scanner, ScannerBuilder};
pub use target::{ScanTarget, parse_target_list};
