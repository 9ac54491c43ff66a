//! Background feed fetching.
//!
//! Runs on a dedicated thread that owns a tokio runtime, taking fetch
//! commands from the UI thread and sending results back over [`mpsc`]
//! channels. The main loop drains the result channel on every tick, so all
//! application state still mutates on a single thread.

use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use tokio::runtime::Runtime;

use crate::feed::Feed;
use crate::fetch::Fetcher;

/// Fetch work requested by the UI thread.
pub enum Command {
    /// Re-fetch every subscribed feed.
    Refresh(Vec<String>),
    /// Fetch one feed ahead of subscribing to it.
    Add(String),
}

/// Results sent back to the UI thread.
pub enum FetchMsg {
    /// Every feed in the refresh fetched successfully, in request order.
    Refreshed(Vec<Feed>),
    /// At least one fetch failed; no feed from this refresh is applied.
    RefreshFailed(String),
    /// A single-feed add succeeded.
    Added(Feed),
    /// A single-feed add failed.
    AddFailed { url: String, error: String },
}

/// Spawn the worker thread.
///
/// Returns the command sender and the result receiver. The thread exits
/// when the command sender is dropped.
pub fn spawn(fetcher: Fetcher) -> Result<(mpsc::Sender<Command>, mpsc::Receiver<FetchMsg>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    let (msg_tx, msg_rx) = mpsc::channel::<FetchMsg>();
    let runtime = Runtime::new()?;

    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let msg = match cmd {
                Command::Refresh(urls) => runtime.block_on(refresh_all(&fetcher, urls)),
                Command::Add(url) => runtime.block_on(add_one(&fetcher, url)),
            };
            // A closed receiver means the UI is gone; stop working.
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
    });

    Ok((cmd_tx, msg_rx))
}

/// Fetch every URL concurrently and join on all of them.
///
/// The join is all-or-nothing: one failure discards the whole batch, so a
/// partial refresh never reaches the store.
async fn refresh_all(fetcher: &Fetcher, urls: Vec<String>) -> FetchMsg {
    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let fetcher = fetcher.clone();
            tokio::spawn(async move {
                let result = fetcher.fetch(&url).await;
                (url, result)
            })
        })
        .collect();

    let mut feeds = Vec::with_capacity(handles.len());
    let mut failure: Option<String> = None;
    for handle in handles {
        match handle.await {
            Ok((_, Ok(feed))) => feeds.push(feed),
            Ok((url, Err(e))) => {
                failure.get_or_insert(format!("{url}: {e}"));
            }
            Err(e) => {
                failure.get_or_insert(format!("fetch task failed: {e}"));
            }
        }
    }

    match failure {
        None => FetchMsg::Refreshed(feeds),
        Some(error) => FetchMsg::RefreshFailed(error),
    }
}

async fn add_one(fetcher: &Fetcher, url: String) -> FetchMsg {
    match fetcher.fetch(&url).await {
        Ok(feed) => FetchMsg::Added(feed),
        Err(e) => FetchMsg::AddFailed {
            url,
            error: e.to_string(),
        },
    }
}
