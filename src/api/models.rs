use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Message served in place of a category that produced no articles.
pub const NO_NEWS_AVAILABLE: &str = "No news available";

/// One news item extracted from a category index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedError {
    pub error: String,
}

/// What a single category maps to in the response: the extracted articles,
/// or a one-element sentinel array when scraping yielded nothing.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryFeed {
    Articles(Vec<Article>),
    Unavailable(Vec<FeedError>),
}

impl CategoryFeed {
    pub fn unavailable() -> Self {
        CategoryFeed::Unavailable(vec![FeedError {
            error: NO_NEWS_AVAILABLE.to_string(),
        }])
    }
}

/// Category label to feed mapping, serialized as a JSON object whose keys
/// keep the order categories were inserted in.
#[derive(Debug, Default)]
pub struct NewsDigest {
    entries: Vec<(String, CategoryFeed)>,
}

impl NewsDigest {
    pub fn insert(&mut self, category: String, feed: CategoryFeed) {
        self.entries.push((category, feed));
    }
}

impl Serialize for NewsDigest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, feed) in &self.entries {
            map.serialize_entry(category, feed)?;
        }
        map.end()
    }
}
