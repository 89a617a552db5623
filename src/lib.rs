pub mod api;
pub mod config;
pub mod error;
pub mod scraper;

use std::sync::Arc;
use config::Config;
use crate::scraper::PageFetcher;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: PageFetcher,
}
