//! Domain types and aggregation.
//!
//! This module defines [`Feed`], the common [`Article`] type, and the pure
//! [`aggregate`] function that turns the whole feed set into the single
//! sorted, filtered sequence the UI renders.

mod article;

// Re-export the public API of this module so callers can write
// `use crate::feed::{aggregate, Article, Feed, Filter};`
pub use article::{format_when, Article, PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR};

/// Label of the always-present filter control that lifts the source
/// constraint. It is a fixed label, never derived from any feed.
pub const ALL_SOURCES: &str = "All Sources";

/// A subscribed source, keyed by its URL.
#[derive(Debug, Clone)]
pub struct Feed {
    /// Source URL; the unique key within the store.
    pub url: String,
    /// Display title. Equals the URL until the first successful fetch.
    pub title: String,
    /// Replaced wholesale on every successful refetch.
    pub articles: Vec<Article>,
}

impl Feed {
    /// A feed restored from the persisted URL list before any fetch.
    pub fn placeholder(url: impl Into<String>) -> Self {
        let url = url.into();
        Feed {
            title: url.clone(),
            url,
            articles: Vec::new(),
        }
    }
}

/// The source constraint applied before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Keep every article.
    #[default]
    All,
    /// Keep only articles whose source equals this feed title.
    Source(String),
}

impl Filter {
    /// The single place where the source match lives.
    ///
    /// Matching is by feed *title*, not URL: feeds that share a title (or
    /// get retitled by a refetch) filter together. Correcting that means
    /// changing only this function.
    pub fn matches(&self, article: &Article) -> bool {
        match self {
            Filter::All => true,
            Filter::Source(title) => article.source == *title,
        }
    }

    /// Label of the filter-bar control this filter corresponds to.
    pub fn label(&self) -> &str {
        match self {
            Filter::All => ALL_SOURCES,
            Filter::Source(title) => title,
        }
    }
}

/// Flatten every feed's articles, keep those matching `filter`, and sort
/// newest first.
///
/// Pure: feeds are not touched, and the result is recomputed on every state
/// change rather than maintained incrementally. The sort is stable, so
/// articles with equal timestamps keep their store order.
pub fn aggregate(feeds: &[Feed], filter: &Filter) -> Vec<Article> {
    let mut articles: Vec<Article> = feeds
        .iter()
        .flat_map(|feed| feed.articles.iter())
        .filter(|article| filter.matches(article))
        .cloned()
        .collect();
    articles.sort();
    articles
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_article(title: &str, source: &str, hour: u32) -> Article {
        Article {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            published: Some(Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()),
            author: UNKNOWN_AUTHOR.to_string(),
            thumbnail: PLACEHOLDER_IMAGE.to_string(),
            source: source.to_string(),
            content: String::new(),
        }
    }

    fn make_feed(url: &str, title: &str, articles: Vec<Article>) -> Feed {
        Feed {
            url: url.to_string(),
            title: title.to_string(),
            articles,
        }
    }

    #[test]
    fn placeholder_uses_url_as_title() {
        let feed = Feed::placeholder("https://example.com/rss");
        assert_eq!(feed.title, "https://example.com/rss");
        assert!(feed.articles.is_empty());
    }

    #[test]
    fn aggregate_all_is_a_sorted_permutation() {
        let feeds = vec![
            make_feed(
                "https://a.example/rss",
                "Feed A",
                vec![make_article("a1", "Feed A", 3), make_article("a2", "Feed A", 9)],
            ),
            make_feed(
                "https://b.example/rss",
                "Feed B",
                vec![make_article("b1", "Feed B", 6)],
            ),
        ];

        let articles = aggregate(&feeds, &Filter::All);

        assert_eq!(articles.len(), 3);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a2", "b1", "a1"], "descending by timestamp");
    }

    #[test]
    fn aggregate_is_stable_on_equal_timestamps() {
        let feeds = vec![
            make_feed(
                "https://a.example/rss",
                "Feed A",
                vec![make_article("first", "Feed A", 12)],
            ),
            make_feed(
                "https://b.example/rss",
                "Feed B",
                vec![make_article("second", "Feed B", 12)],
            ),
        ];

        let articles = aggregate(&feeds, &Filter::All);

        assert_eq!(articles[0].title, "first", "ties keep store order");
        assert_eq!(articles[1].title, "second");
    }

    #[test]
    fn aggregate_filters_by_source_title() {
        let feeds = vec![
            make_feed(
                "https://a.example/rss",
                "Feed A",
                vec![make_article("a1", "Feed A", 3), make_article("a2", "Feed A", 9)],
            ),
            make_feed(
                "https://b.example/rss",
                "Feed B",
                vec![make_article("b1", "Feed B", 6)],
            ),
        ];

        let articles = aggregate(&feeds, &Filter::Source("Feed A".to_string()));

        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.source == "Feed A"));
        assert_eq!(articles[0].title, "a2", "still newest first");
    }

    #[test]
    fn aggregate_with_unknown_title_is_empty() {
        let feeds = vec![make_feed(
            "https://a.example/rss",
            "Feed A",
            vec![make_article("a1", "Feed A", 3)],
        )];

        let articles = aggregate(&feeds, &Filter::Source("Gone".to_string()));
        assert!(articles.is_empty());
    }

    #[test]
    fn filter_labels() {
        assert_eq!(Filter::All.label(), ALL_SOURCES);
        assert_eq!(Filter::Source("Feed A".to_string()).label(), "Feed A");
    }
}
