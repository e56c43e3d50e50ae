//! Extractors reduce one external service response to a small typed field

pub mod headers;
pub mod sitecheck;
pub mod wpscan;

use crate::error::ExtractError;
use crate::target::ScanTarget;
use async_trait::async_trait;

pub use headers::{HeaderGrade, HeaderGradeExtractor};
pub use sitecheck::{BlacklistStatus, SiteCheckExtractor};
pub use wpscan::{VulnerabilityFinding, WordPressInfo, WpScanExtractor};

/// Outcome of one extractor for one target
pub type Extraction<T> = std::result::Result<T, ExtractError>;

/// Queries one external service for a target
///
/// Implementations must not propagate failures; they return them as
/// [`ExtractError`] so the aggregator can always build a full result.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Field value produced on success
    type Output: Clone + Send + Sync + 'static;

    /// Stable name, also used as the cache namespace
    fn name(&self) -> &'static str;

    /// Query the service for `target`
    async fn extract(&self, target: &ScanTarget) -> Extraction<Self::Output>;
}
