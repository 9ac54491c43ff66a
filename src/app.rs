//! Application state and the action dispatcher.
//!
//! `App` owns everything the UI reads: the feed store, the active filter,
//! edit mode, the URL input line, the article list selection, and the
//! status and alert text. Key handling produces [`Action`]s (see
//! [`crate::input`]); [`App::dispatch`] is the single place they take
//! effect, and [`App::handle_msg`] applies results coming back from the
//! fetch worker.

use std::sync::mpsc::Sender;

use ratatui::widgets::ListState;

use crate::feed::{aggregate, Article, Filter};
use crate::store::FeedStore;
use crate::worker::{Command, FetchMsg};

/// Which way the filter-bar cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Everything a key press can ask the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Subscribe to the URL currently in the input line.
    AddFeed,
    /// Show or hide the per-feed delete affordances in the filter bar.
    ToggleEdit,
    /// Move the filter-bar cursor and activate the control under it.
    SelectFilter(Direction),
    /// Delete the feed under the filter-bar cursor (edit mode only).
    DeleteFeed,
    /// Re-fetch every subscribed feed.
    Refresh,
    Quit,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    OpenInput,
    CancelInput,
    InputChar(char),
    DeleteChar,
    DismissAlert,
}

pub struct App {
    pub store: FeedStore,
    /// Source constraint applied before rendering.
    pub filter: Filter,
    /// Whether the filter bar shows per-feed delete affordances.
    pub edit_mode: bool,
    /// Filter-bar cursor: 0 is the "All Sources" control, then one slot
    /// per feed in store order.
    pub cursor: usize,
    /// Aggregated view of the store under the current filter.
    pub articles: Vec<Article>,
    /// Article list selection state for scrolling.
    pub list_state: ListState,
    /// URL input line buffer. Cleared only after a successful add, so a
    /// failed URL stays available for correction.
    pub input: String,
    /// Whether the input line is open and capturing keys.
    pub input_active: bool,
    /// Blocking failure notification; any key dismisses it.
    pub alert: Option<String>,
    /// Last status message.
    pub status: String,
    /// A bulk refresh is in flight.
    pub refreshing: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    commands: Sender<Command>,
}

impl App {
    pub fn new(store: FeedStore, commands: Sender<Command>) -> Self {
        Self {
            store,
            filter: Filter::All,
            edit_mode: false,
            cursor: 0,
            articles: Vec::new(),
            list_state: ListState::default(),
            input: String::new(),
            input_active: false,
            alert: None,
            status: "Press a to add a feed".into(),
            refreshing: false,
            quit: false,
            commands,
        }
    }

    // -- dispatch ------------------------------------------------------------

    /// Apply one user action. Every mutation triggered by a key press goes
    /// through here.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::AddFeed => self.add_feed(),
            Action::ToggleEdit => self.edit_mode = !self.edit_mode,
            Action::SelectFilter(direction) => self.select_filter(direction),
            Action::DeleteFeed => self.delete_feed(),
            Action::Refresh => self.refresh(),
            Action::Quit => self.quit = true,
            Action::SelectNext => self.select_next(),
            Action::SelectPrevious => self.select_previous(),
            Action::SelectFirst => self.select_first(),
            Action::SelectLast => self.select_last(),
            Action::OpenInput => self.input_active = true,
            Action::CancelInput => self.input_active = false,
            Action::InputChar(c) => self.input.push(c),
            Action::DeleteChar => {
                self.input.pop();
            }
            Action::DismissAlert => self.alert = None,
        }
    }

    /// Apply a worker result. Called from the main loop while draining the
    /// message channel.
    pub fn handle_msg(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::Refreshed(feeds) => {
                let count = feeds.len();
                for feed in feeds {
                    self.store.upsert(feed);
                }
                self.refreshing = false;
                self.status = format!("Refreshed {count} feeds");
                self.refresh_articles();
            }
            FetchMsg::RefreshFailed(error) => {
                // The batch was discarded; log it and leave the view alone.
                log::error!("feed refresh failed: {error}");
                self.refreshing = false;
                self.status = "Ready".into();
            }
            FetchMsg::Added(feed) => {
                log::info!("subscribed to {}", feed.url);
                self.store.upsert(feed);
                self.persist();
                self.input.clear();
                self.status = format!("{} feeds", self.store.len());
                self.refresh_articles();
            }
            FetchMsg::AddFailed { url, error } => {
                log::warn!("adding feed {url}: {error}");
                self.alert =
                    Some("Could not add that feed. Check the URL and try again.".into());
            }
        }
    }

    /// Recompute the aggregated article view and clamp the list selection.
    pub fn refresh_articles(&mut self) {
        self.articles = aggregate(self.store.feeds(), &self.filter);
        let selected = match self.list_state.selected() {
            _ if self.articles.is_empty() => None,
            Some(i) => Some(i.min(self.articles.len() - 1)),
            None => None,
        };
        self.list_state.select(selected);
    }

    // -- feed management -----------------------------------------------------

    fn add_feed(&mut self) {
        let url = self.input.trim().to_string();
        self.input_active = false;
        if url.is_empty() {
            return;
        }
        self.status = format!("Adding {url}…");
        self.send(Command::Add(url));
    }

    fn refresh(&mut self) {
        if self.store.is_empty() || self.refreshing {
            return;
        }
        self.refreshing = true;
        self.status = "Refreshing…".into();
        self.send(Command::Refresh(self.store.urls()));
    }

    fn delete_feed(&mut self) {
        if !self.edit_mode || self.cursor == 0 {
            return;
        }
        let Some(feed) = self.store.feeds().get(self.cursor - 1) else {
            return;
        };
        let url = feed.url.clone();
        self.store.remove(&url);
        self.persist();
        self.cursor = self.cursor.min(self.store.len());
        // The filter is deliberately left alone even when it named the
        // removed feed; the article list then simply comes up empty.
        self.refresh_articles();
        self.status = format!("Removed {url}");
    }

    fn persist(&self) {
        if let Err(e) = self.store.persist() {
            log::error!("persisting feed list: {e:#}");
        }
    }

    fn send(&self, command: Command) {
        // The worker outlives the UI loop; a send can only fail during
        // shutdown, when the result no longer matters.
        let _ = self.commands.send(command);
    }

    // -- filter bar ----------------------------------------------------------

    fn select_filter(&mut self, direction: Direction) {
        let last = self.store.len();
        self.cursor = match direction {
            Direction::Left => self.cursor.saturating_sub(1),
            Direction::Right => (self.cursor + 1).min(last),
        };
        self.filter = self.filter_at(self.cursor);
        self.refresh_articles();
    }

    /// Filter activated by the control at `index` (0 is "All Sources").
    fn filter_at(&self, index: usize) -> Filter {
        match index.checked_sub(1).and_then(|i| self.store.feeds().get(i)) {
            Some(feed) => Filter::Source(feed.title.clone()),
            None => Filter::All,
        }
    }

    // -- article list navigation ---------------------------------------------

    fn select_next(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.articles.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        if self.articles.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if !self.articles.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.articles.is_empty() {
            self.list_state.select(Some(self.articles.len() - 1));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
