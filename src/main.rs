//! newsdeck: a terminal feed aggregator.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐  FetchMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ worker.rs │ ──────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread)  │ ◄────────── │ (state)  │          │ (render) │
//! └───────────┘   Command   └──────────┘          └──────────┘
//!                                ▲
//!                                │ Action
//!                           ┌──────────┐
//!                           │ input.rs │
//!                           └──────────┘
//! ```
//!
//! * **`feed/`** — domain types (`Feed`, `Article`, `Filter`) and the pure
//!   aggregation that produces the rendered article sequence.
//! * **`store`** — the subscribed-feed list and its on-disk persistence.
//! * **`fetch`** — client for the feed-to-JSON conversion endpoint.
//! * **`worker`** — background thread running fetches on a tokio runtime.
//! * **`app`** — owns all application state and dispatches actions.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to actions.
//! * **`main`** — wires everything together: set up logging and the
//!   terminal, spawn the worker, and run the event loop.

mod app;
mod error;
mod feed;
mod fetch;
mod input;
mod logger;
mod store;
mod ui;
mod worker;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::{Action, App};
use fetch::Fetcher;
use store::FeedStore;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen. When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal. This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message. Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Where the subscribed URL list lives by default.
fn default_data_file() -> PathBuf {
    match ProjectDirs::from("", "", "newsdeck") {
        Some(dirs) => dirs.data_dir().join("rss_feeds.json"),
        None => PathBuf::from("rss_feeds.json"),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();

    // -- storage location (optional path argument overrides) -----------------
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_data_file);

    // The terminal is the UI; logs go to a file next to the feed list.
    let log_path = path.with_file_name("newsdeck.log");
    if let Err(e) = logger::init(&log_path) {
        eprintln!("warning: file logging disabled: {e}");
    }

    // -- persisted subscriptions ---------------------------------------------
    let mut store = FeedStore::new(&path);
    if let Err(e) = store.load() {
        log::warn!("could not load the feed list: {e:#}");
    }

    // -- background fetch worker ---------------------------------------------
    let (commands, results) = worker::spawn(Fetcher::new())?;

    let mut app = App::new(store, commands);
    // Kick off the initial refresh of everything restored from disk.
    app.dispatch(Action::Refresh);

    // -- terminal setup (RAII: Drop restores on exit or panic) ---------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop ------------------------------------------------------
    // Runs at ~10 fps (100 ms tick). Each iteration:
    //   1. Drain results from the fetch worker.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = results.try_recv() {
            app.handle_msg(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = input::map_key(&app, key) {
                    app.dispatch(action);
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
