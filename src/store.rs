//! Subscribed-feed bookkeeping and persistence.
//!
//! The store is an insertion-ordered list of [`Feed`]s keyed by URL. Only
//! the URL list is durable: it is written as a JSON array, and titles and
//! articles are refetched on every run. All access happens on the UI
//! thread, so there is no locking.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::feed::Feed;

pub struct FeedStore {
    feeds: Vec<Feed>,
    path: PathBuf,
}

impl FeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            feeds: Vec::new(),
            path: path.into(),
        }
    }

    /// Read the persisted URL list and seed one placeholder feed per URL.
    ///
    /// A missing file is an empty subscription list, not an error. No
    /// content is fetched here.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let urls: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        self.feeds = urls.into_iter().map(Feed::placeholder).collect();
        Ok(())
    }

    /// Write the current URL list, always overwriting any prior value.
    pub fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let raw = serde_json::to_string(&self.urls())?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    /// Replace the feed with the same URL, or append a new entry.
    pub fn upsert(&mut self, feed: Feed) {
        match self.feeds.iter_mut().find(|f| f.url == feed.url) {
            Some(slot) => *slot = feed,
            None => self.feeds.push(feed),
        }
    }

    /// Remove the feed at `url`. Unknown URLs are a no-op. The caller is
    /// responsible for calling [`persist`](Self::persist) afterwards.
    pub fn remove(&mut self, url: &str) {
        self.feeds.retain(|f| f.url != url);
    }

    /// Feeds in insertion order.
    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    /// The URL key list, in insertion order.
    pub fn urls(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
