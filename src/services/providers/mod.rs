/// Upstream data providers
///
/// Each third-party API sits behind a small trait so the services that poll
/// them can be exercised without network access.
use crate::{error::AppResult, models::PexelsPhoto};

pub mod pexels;
pub mod skyscanner;

pub use pexels::PexelsClient;
pub use skyscanner::SkyscannerClient;

/// Keyword image search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageSearch: Send + Sync {
    /// Search photos matching `query`, returning at most `per_page` results
    async fn search(&self, query: &str, per_page: u32) -> AppResult<Vec<PexelsPhoto>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Flight geography hierarchy
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GeoSource: Send + Sync {
    /// Fetch every place in the hierarchy, in upstream order
    async fn fetch_places(&self) -> AppResult<Vec<serde_json::Value>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
