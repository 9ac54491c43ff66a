//! The core article type shared across the application.
//!
//! Every feed's items are normalised into [`Article`] values by the fetch
//! layer, so aggregation, filtering, and rendering never see the wire
//! format.

use chrono::{DateTime, Local, Utc};
use std::cmp::Ordering;

/// Sentinel author used when a feed item carries no author at all.
///
/// The renderer omits the author line when it sees this value.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Embedded placeholder image, used when no usable image URL can be derived
/// for an article (last step of the thumbnail fallback chain).
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjIwMCIgdmlld0JveD0iMCAwIDIwMCAyMDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+PHJlY3Qgd2lkdGg9IjIwMCIgaGVpZ2h0PSIyMDAiIGZpbGw9IiNFNUU3RUIiLz48cGF0aCBkPSJNODAgOTBINzBWMTEwSDgwVjkwWk0xMzAgOTBIMTIwVjExMEgxMzBWOTBaTTExMCA4MEgxMDBWMTIwSDExMFY4MFoiIGZpbGw9IiM5QUEwQTYiLz48L3N2Zz4=";

/// A single feed item, normalised from the conversion endpoint.
///
/// Articles are immutable once constructed; a refetch replaces the owning
/// feed's whole article list rather than patching entries.
///
/// ## Sorting
///
/// `Article` implements [`Ord`] for **reverse-chronological** ordering:
/// newer articles sort before older ones, and articles without a publish
/// date sort last.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Article {
    /// Headline.
    pub title: String,

    /// URL of the full article.
    pub link: String,

    /// Publication timestamp, used for sorting.
    ///
    /// `None` means the feed gave no parseable date; such articles sort
    /// after all dated ones.
    pub published: Option<DateTime<Utc>>,

    /// Author name, or [`UNKNOWN_AUTHOR`] when the feed had none.
    pub author: String,

    /// Image URL after the fallback chain: item image, channel image,
    /// favicon of the link's host, embedded placeholder.
    pub thumbnail: String,

    /// Title of the owning feed, denormalised so filtering and rendering
    /// need only the article itself.
    pub source: String,

    /// Raw item content (HTML). Only used for word-count estimation.
    pub content: String,
}

impl Article {
    /// Rough word count of the raw content, with markup stripped.
    pub fn word_count(&self) -> usize {
        strip_html(&self.content).split_whitespace().count()
    }
}

// ---------------------------------------------------------------------------
// Ordering: reverse chronological (newest first)
// ---------------------------------------------------------------------------

impl Ord for Article {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that `Some(newer) > Some(older)` gives us newest-first.
        // `None` is less than `Some(_)` in the standard library, so undated
        // articles naturally sink to the bottom.
        other.published.cmp(&self.published)
    }
}

impl PartialOrd for Article {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Timestamp display
// ---------------------------------------------------------------------------

/// Humanise a publish timestamp relative to `now`.
///
/// Recent articles get a relative label, older ones an absolute local-time
/// one:
///
/// * under a minute: `just now`
/// * 1 to 59 minutes: `{m}m ago`
/// * 1 to 23 hours: `{h}h ago`
/// * 1 to 6 days: `{d}d ago`
/// * 7 days and older: `3:45 PM Jun 10` (local time)
pub fn format_when(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        published
            .with_timezone(&Local)
            .format("%-I:%M %p %b %-d")
            .to_string()
    }
}

/// Strip tags and the common entities from an HTML fragment, collapsing
/// whitespace.
fn strip_html(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
