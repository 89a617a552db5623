use reqwest::{Client, ClientBuilder, StatusCode};
use scraper::{Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::api::models::Article;
use crate::config::{BROWSER_USER_AGENT, Config};
use crate::error::{AppError, Result};

/// Fallbacks for article blocks missing an optional element.
pub const NO_SUMMARY: &str = "No Summary";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300";
pub const PLACEHOLDER_LINK: &str = "#";

/// A section index lists dozens of stories; only the newest are served.
const MAX_ARTICLES_PER_CATEGORY: usize = 5;

// Create static selectors to avoid recompiling them each time
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article").expect("Failed to parse article selector")
});
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to parse anchor selector")
});
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});
static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to parse image selector")
});

/// Pooled HTTP client that downloads category index pages.
///
/// Built once at startup and shared through [`crate::AppState`] so every
/// request reuses its connections and carries the same identity header.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(BROWSER_USER_AGENT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .danger_accept_invalid_hostnames(config.accept_invalid_certs)
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(PageFetcher { client })
    }

    /// Download one category page and return its raw HTML.
    ///
    /// Any transport failure or non-200 status becomes a `FetchError` after
    /// logging the URL and cause; the caller degrades to the sentinel feed
    /// instead of surfacing the error.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(%url, error = %e, "Failed to fetch category page");
            AppError::FetchError(e.to_string())
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, %status, "Failed to fetch category page");
            return Err(AppError::FetchError(format!(
                "Unexpected status {} for {}",
                status, url
            )));
        }

        let html = response.text().await?;
        Ok(html)
    }
}

/// Extract up to five article summaries from a category page.
///
/// Parsing is best effort: malformed markup never fails, a block without a
/// title link is skipped, and missing optional elements fall back to fixed
/// placeholders.
pub fn extract_articles(html: &str) -> Vec<Article> {
    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for block in document.select(&ARTICLE_SELECTOR) {
        // The first anchor carries both the headline and the story link;
        // without it there is nothing worth emitting.
        let Some(title_link) = block.select(&ANCHOR_SELECTOR).next() else {
            continue;
        };

        let title = title_link.text().collect::<String>().trim().to_string();
        let url = match title_link.value().attr("href") {
            Some(href) if !href.is_empty() => href.to_string(),
            _ => PLACEHOLDER_LINK.to_string(),
        };

        let summary = block
            .select(&PARAGRAPH_SELECTOR)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| NO_SUMMARY.to_string());

        let image = block
            .select(&IMAGE_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        articles.push(Article {
            title,
            summary,
            image,
            url,
        });

        if articles.len() == MAX_ARTICLES_PER_CATEGORY {
            break;
        }
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, href: &str, summary: &str, src: &str) -> String {
        format!(
            "<article><a href=\"{href}\">{title}</a><p>{summary}</p><img src=\"{src}\"></article>"
        )
    }

    #[test]
    fn extracts_all_fields_from_a_complete_block() {
        let html = block("Big story", "https://example.com/big", "It happened", "https://example.com/big.jpg");
        let articles = extract_articles(&html);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Big story");
        assert_eq!(articles[0].url, "https://example.com/big");
        assert_eq!(articles[0].summary, "It happened");
        assert_eq!(articles[0].image, "https://example.com/big.jpg");
    }

    #[test]
    fn keeps_only_the_first_five_blocks_in_document_order() {
        let html: String = (1..=7)
            .map(|n| block(&format!("Story {n}"), &format!("/s{n}"), "s", "/i.jpg"))
            .collect();
        let articles = extract_articles(&html);

        assert_eq!(articles.len(), 5);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Story 1", "Story 2", "Story 3", "Story 4", "Story 5"]);
    }

    #[test]
    fn skips_blocks_without_a_title_anchor() {
        let html = format!(
            "<article><p>just a teaser</p></article>{}",
            block("Kept", "/kept", "s", "/i.jpg")
        );
        let articles = extract_articles(&html);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
    }

    #[test]
    fn missing_paragraph_falls_back_to_no_summary() {
        let html = "<article><a href=\"/a\">Title</a><img src=\"/i.jpg\"></article>";
        let articles = extract_articles(html);

        assert_eq!(articles[0].summary, NO_SUMMARY);
    }

    #[test]
    fn missing_image_falls_back_to_placeholder() {
        let html = "<article><a href=\"/a\">Title</a><p>s</p></article>";
        let articles = extract_articles(html);

        assert_eq!(articles[0].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn image_without_src_falls_back_to_placeholder() {
        let html = "<article><a href=\"/a\">Title</a><p>s</p><img alt=\"no src\"></article>";
        let articles = extract_articles(html);

        assert_eq!(articles[0].image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn absent_and_empty_href_both_fall_back_to_hash() {
        let html = "<article><a>Unlinked</a></article><article><a href=\"\">Empty</a></article>";
        let articles = extract_articles(html);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, PLACEHOLDER_LINK);
        assert_eq!(articles[1].url, PLACEHOLDER_LINK);
    }

    #[test]
    fn trims_whitespace_around_title_and_summary() {
        let html = "<article><a href=\"/a\">\n  Padded title \n</a><p>  padded summary\t</p></article>";
        let articles = extract_articles(html);

        assert_eq!(articles[0].title, "Padded title");
        assert_eq!(articles[0].summary, "padded summary");
    }

    #[test]
    fn tolerates_malformed_markup() {
        // Stray close tags, an unclosed paragraph and an unclosed article
        let html = "<article><a href=\"/a\">Headline</div></a><p>still extracted";
        let articles = extract_articles(html);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Headline");
        assert_eq!(articles[0].summary, "still extracted");
    }

    #[test]
    fn page_without_articles_yields_nothing() {
        assert!(extract_articles("<html><body><div>nothing here</div></body></html>").is_empty());
        assert!(extract_articles("").is_empty());
    }
}
