//! Client for the feed-to-JSON conversion endpoint.
//!
//! Feed parsing is delegated to an external service that converts RSS/Atom
//! into JSON. This module builds the request, decodes the response, and
//! normalises items into [`Article`]s. Decoding is a pure function
//! ([`decode_feed`]) so tests can exercise it without a network.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::feed::{Article, Feed, PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR};

/// Default conversion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.rss2json.com/v1/api.json";

const STATUS_OK: &str = "ok";

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    status: String,
    #[serde(default)]
    feed: ChannelInfo,
    #[serde(default)]
    items: Vec<ItemInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Default, Deserialize)]
struct ItemInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default, rename = "pubDate")]
    pub_date: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    content: String,
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// HTTP client for the conversion endpoint.
///
/// Cheap to clone; clones share the underlying connection pool, so the
/// worker can hand one to each concurrent fetch task.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the fetcher at a different conversion endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch one feed through the conversion endpoint.
    ///
    /// Returns a value for the caller to store; no shared state is touched
    /// and nothing is retried. Transport failures become
    /// [`Error::Network`], malformed bodies [`Error::Decode`], and a
    /// non-"ok" status field [`Error::InvalidFeed`].
    pub async fn fetch(&self, url: &str) -> Result<Feed> {
        // Cache-busting timestamp plus no-store at the transport level, so
        // every refresh sees current items.
        let stamp = Utc::now().timestamp_millis().to_string();
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("rss_url", url), ("t", stamp.as_str())])
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?
            .text()
            .await?;
        decode_feed(url, &body)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Decoding and normalisation
// ---------------------------------------------------------------------------

/// Decode a conversion-endpoint response body into a [`Feed`].
pub fn decode_feed(url: &str, body: &str) -> Result<Feed> {
    let response: ConvertResponse = serde_json::from_str(body)?;
    if response.status != STATUS_OK {
        return Err(Error::InvalidFeed {
            url: url.to_string(),
            status: response.status,
        });
    }

    // A blank channel title would make the feed unselectable in the filter
    // bar; fall back to the URL, same as an unfetched placeholder.
    let title = if response.feed.title.trim().is_empty() {
        url.to_string()
    } else {
        response.feed.title.clone()
    };

    let articles = response
        .items
        .iter()
        .map(|item| Article {
            title: item.title.clone(),
            link: item.link.clone(),
            published: parse_pub_date(&item.pub_date),
            author: if item.author.trim().is_empty() {
                UNKNOWN_AUTHOR.to_string()
            } else {
                item.author.clone()
            },
            thumbnail: resolve_thumbnail(&item.thumbnail, &response.feed.image, &item.link),
            source: title.clone(),
            content: item.content.clone(),
        })
        .collect();

    Ok(Feed {
        url: url.to_string(),
        title,
        articles,
    })
}

/// Publish dates arrive in whatever shape the upstream feed used; try the
/// common formats and degrade to undated.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.trim().is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        })
}

/// Thumbnail fallback chain: item image, then channel image, then a favicon
/// derived from the article link's host, then the embedded placeholder.
fn resolve_thumbnail(item_thumbnail: &str, channel_image: &str, link: &str) -> String {
    if !item_thumbnail.trim().is_empty() {
        return item_thumbnail.to_string();
    }
    if !channel_image.trim().is_empty() {
        return channel_image.to_string();
    }
    favicon_url(link).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

fn favicon_url(link: &str) -> Option<String> {
    let host = Url::parse(link).ok()?.host_str()?.to_string();
    Some(format!(
        "https://www.google.com/s2/favicons?domain={host}&sz=128"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const FEED_URL: &str = "https://example.com/rss";

    #[test]
    fn decode_maps_items_to_articles() {
        let body = r#"{
            "status": "ok",
            "feed": { "title": "Example Feed", "image": "" },
            "items": [
                {
                    "title": "First Post",
                    "link": "https://example.com/1",
                    "pubDate": "2025-06-01 08:30:00",
                    "author": "Ada",
                    "thumbnail": "https://example.com/1.jpg",
                    "content": "<p>Hello world</p>"
                },
                {
                    "title": "Second Post",
                    "link": "https://example.com/2",
                    "pubDate": "Mon, 02 Jun 2025 12:00:00 +0000",
                    "author": "",
                    "thumbnail": "",
                    "content": ""
                }
            ]
        }"#;

        let feed = decode_feed(FEED_URL, body).unwrap();

        assert_eq!(feed.url, FEED_URL);
        assert_eq!(feed.title, "Example Feed");
        assert_eq!(feed.articles.len(), 2);

        let first = &feed.articles[0];
        assert_eq!(first.title, "First Post");
        assert_eq!(first.author, "Ada");
        assert_eq!(first.thumbnail, "https://example.com/1.jpg");
        assert_eq!(first.source, "Example Feed", "source is the feed title");
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap())
        );

        let second = &feed.articles[1];
        assert_eq!(second.author, UNKNOWN_AUTHOR, "blank author falls back");
        assert_eq!(
            second.published,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn non_ok_status_is_an_invalid_feed() {
        let body = r#"{ "status": "error", "feed": {}, "items": [] }"#;
        match decode_feed(FEED_URL, body) {
            Err(Error::InvalidFeed { url, status }) => {
                assert_eq!(url, FEED_URL);
                assert_eq!(status, "error");
            }
            other => panic!("expected InvalidFeed, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        match decode_feed(FEED_URL, "not json at all") {
            Err(Error::Decode(_)) => {}
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn item_without_any_image_gets_the_favicon_fallback() {
        let body = r#"{
            "status": "ok",
            "feed": { "title": "Example Feed" },
            "items": [ { "title": "Hello", "link": "https://example.com/hello" } ]
        }"#;

        let feed = decode_feed(FEED_URL, body).unwrap();
        let article = &feed.articles[0];

        assert_eq!(article.title, "Hello");
        assert_eq!(article.author, UNKNOWN_AUTHOR);
        assert_eq!(article.source, "Example Feed");
        assert_eq!(
            article.thumbnail,
            "https://www.google.com/s2/favicons?domain=example.com&sz=128"
        );
    }

    #[test]
    fn blank_feed_title_falls_back_to_url() {
        let body = r#"{ "status": "ok", "feed": { "title": "  " }, "items": [] }"#;
        let feed = decode_feed(FEED_URL, body).unwrap();
        assert_eq!(feed.title, FEED_URL);
    }

    // -- thumbnail fallback chain -------------------------------------------

    #[test]
    fn thumbnail_prefers_item_image() {
        let got = resolve_thumbnail("https://img.example/i.jpg", "https://img.example/f.jpg", "https://example.com/a");
        assert_eq!(got, "https://img.example/i.jpg");
    }

    #[test]
    fn thumbnail_falls_back_to_channel_image() {
        let got = resolve_thumbnail("", "https://img.example/f.jpg", "https://example.com/a");
        assert_eq!(got, "https://img.example/f.jpg");
    }

    #[test]
    fn thumbnail_falls_back_to_link_host_favicon() {
        let got = resolve_thumbnail("", "", "https://news.example.org/story/42");
        assert_eq!(
            got,
            "https://www.google.com/s2/favicons?domain=news.example.org&sz=128"
        );
    }

    #[test]
    fn unparseable_link_falls_back_to_placeholder() {
        let got = resolve_thumbnail("", "", "not a url");
        assert_eq!(got, PLACEHOLDER_IMAGE);
    }

    // -- date parsing --------------------------------------------------------

    #[test]
    fn parses_rfc3339_dates() {
        let got = parse_pub_date("2025-06-01T08:30:00Z");
        assert_eq!(got, Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap()));
    }

    #[test]
    fn unparseable_date_is_none() {
        assert_eq!(parse_pub_date("not-a-real-date"), None);
        assert_eq!(parse_pub_date(""), None);
    }
}
