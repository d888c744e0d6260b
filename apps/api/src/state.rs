use std::sync::Arc;

use crate::portfolio::cache::CacheStamp;
use crate::portfolio::import::ResumeParser;
use crate::portfolio::store::PortfolioStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway. `Arc<dyn ...>` so tests swap in the in-memory double.
    pub store: Arc<dyn PortfolioStore>,
    /// Upstream resume parser (LLM-backed in production).
    pub parser: Arc<dyn ResumeParser>,
    /// Process-wide public-page invalidation stamp; the page renderer subscribes.
    pub cache: CacheStamp,
}
