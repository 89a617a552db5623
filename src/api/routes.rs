use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::AppState;
use crate::api::models::{CategoryFeed, NewsDigest};
use crate::scraper::extract_articles;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/news/all", get(all_news_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

/// Scrape every configured category and serve the aggregated result.
///
/// Always answers 200: a category that could not be fetched or parsed is
/// reported through its sentinel feed, never through the status code.
async fn all_news_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut digest = NewsDigest::default();

    for (category, url) in &state.config.categories {
        let articles = match state.fetcher.fetch_page(url).await {
            Ok(html) => extract_articles(&html),
            // Already logged by the fetcher
            Err(_) => Vec::new(),
        };
        debug!(%category, count = articles.len(), "Scraped category");

        let feed = if articles.is_empty() {
            CategoryFeed::unavailable()
        } else {
            CategoryFeed::Articles(articles)
        };
        digest.insert(category.clone(), feed);
    }

    Json(digest)
}
