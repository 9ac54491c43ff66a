//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state
//! ([`App`]) and input handling ([`crate::input`]). Rendering is pure: it
//! reads `App` state and draws widgets, nothing else.
//!
//! The layout is four rows: the filter bar, the scrollable article list,
//! the URL input line (only while open), and a one-line status bar that
//! doubles as the alert banner.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::error::{Error, Result};
use crate::feed::{format_when, Article, ALL_SOURCES, UNKNOWN_AUTHOR};

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop. Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let input_height = if app.input_active { 3 } else { 0 };
    let [filter_area, main_area, input_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(input_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_filter_bar(app, frame, filter_area);
    draw_articles(app, frame, main_area);
    if app.input_active {
        draw_input(app, frame, input_area);
    }
    draw_status_bar(app, frame, status_area);
}

// ---------------------------------------------------------------------------
// Filter bar
// ---------------------------------------------------------------------------

/// One control per feed plus the always-present "All Sources" control.
///
/// The control whose label matches the current filter is highlighted (so
/// feeds sharing a title highlight together), the control under the cursor
/// is underlined, and edit mode appends a delete affordance to every feed
/// control.
fn draw_filter_bar(app: &App, frame: &mut Frame, area: Rect) {
    let active = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::Cyan);

    let mut labels: Vec<String> = vec![ALL_SOURCES.to_string()];
    labels.extend(app.store.feeds().iter().map(|f| f.title.clone()));

    let mut spans = Vec::with_capacity(labels.len() * 2);
    for (index, label) in labels.iter().enumerate() {
        let text = if app.edit_mode && index > 0 {
            format!(" {label} ✕ ")
        } else {
            format!(" {label} ")
        };
        let mut style = if label == app.filter.label() {
            active
        } else {
            inactive
        };
        if index == app.cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Article list
// ---------------------------------------------------------------------------

/// Render the aggregated article list as cards.
///
/// A card that cannot be built is logged and skipped; the rest of the list
/// still renders.
fn draw_articles(app: &mut App, frame: &mut Frame, area: Rect) {
    let now = Utc::now();
    let items: Vec<ListItem> = app
        .articles
        .iter()
        .filter_map(|article| match article_card(article, now) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("skipping article from {}: {e}", article.source);
                None
            }
        })
        .collect();

    let title = format!(" {} ({}) ", app.filter.label(), items.len());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Build one article card: bold title, a meta line (source, author unless
/// unknown, humanised date, word count), and a dimmed link line.
fn article_card(article: &Article, now: DateTime<Utc>) -> Result<ListItem<'static>> {
    if article.title.trim().is_empty() {
        return Err(Error::Render { field: "title" });
    }
    if article.link.trim().is_empty() {
        return Err(Error::Render { field: "link" });
    }

    let when = match article.published {
        Some(published) => format_when(published, now),
        None => "no date".to_string(),
    };

    let mut meta = vec![
        Span::styled(article.source.clone(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
    ];
    if article.author != UNKNOWN_AUTHOR {
        meta.push(Span::styled(
            format!("by {}", article.author),
            Style::default().fg(Color::Gray),
        ));
        meta.push(Span::raw("  "));
    }
    meta.push(Span::styled(when, Style::default().fg(Color::DarkGray)));
    let words = article.word_count();
    if words > 0 {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            format!("{words} words"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(
            article.link.clone(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )),
    ];

    Ok(ListItem::new(lines))
}

// ---------------------------------------------------------------------------
// Input line and status bar
// ---------------------------------------------------------------------------

fn draw_input(app: &App, frame: &mut Frame, area: Rect) {
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .title(" Add feed URL (Enter to add, Esc to cancel) ")
            .borders(Borders::ALL),
    );
    frame.render_widget(input, area);
    frame.set_cursor_position((area.x + app.input.len() as u16 + 1, area.y + 1));
}

/// Render the bottom status bar, or the alert banner when one is open.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(alert) = &app.alert {
        let line = Line::from(vec![
            Span::styled(
                format!(" {alert} "),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" press any key"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.articles.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  a: add  e: edit  d: delete  r: refresh  ←/→: filter  ↑/↓: scroll  q: quit"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Feed, PLACEHOLDER_IMAGE};
    use crate::store::FeedStore;
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::mpsc::channel;

    fn make_article(title: &str, link: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            published: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            author: "Ada".to_string(),
            thumbnail: PLACEHOLDER_IMAGE.to_string(),
            source: "Example Feed".to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn card_requires_a_title() {
        let article = make_article("", "https://example.com/1");
        match article_card(&article, Utc::now()) {
            Err(Error::Render { field }) => assert_eq!(field, "title"),
            _ => panic!("expected a render error"),
        }
    }

    #[test]
    fn card_requires_a_link() {
        let article = make_article("Hello", "  ");
        match article_card(&article, Utc::now()) {
            Err(Error::Render { field }) => assert_eq!(field, "link"),
            _ => panic!("expected a render error"),
        }
    }

    #[test]
    fn card_builds_for_a_complete_article() {
        let article = make_article("Hello", "https://example.com/1");
        assert!(article_card(&article, Utc::now()).is_ok());
    }

    /// Render one card into a scratch terminal and return its text.
    fn render_card_text(article: &Article) -> String {
        let card = article_card(article, Utc::now()).unwrap();
        let backend = TestBackend::new(80, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(List::new(vec![card]), f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn authored_articles_show_an_author_line() {
        let text = render_card_text(&make_article("Hello", "https://example.com/1"));
        assert!(text.contains("by Ada"));
        assert!(text.contains("Example Feed"));
    }

    #[test]
    fn unknown_author_is_omitted_from_the_meta_line() {
        let mut article = make_article("Hello", "https://example.com/1");
        article.author = UNKNOWN_AUTHOR.to_string();
        let text = render_card_text(&article);
        assert!(!text.contains("by "), "author line is omitted");
        assert!(text.contains("Example Feed"), "source still shown");
    }

    #[test]
    fn draw_renders_without_panicking() {
        let (tx, _rx) = channel();
        let mut app = App::new(FeedStore::new("unused.json"), tx);
        let mut feed = Feed::placeholder("https://example.com/rss");
        feed.title = "Example Feed".to_string();
        feed.articles = vec![
            make_article("Hello", "https://example.com/1"),
            make_article("", "https://example.com/broken"),
        ];
        app.store.upsert(feed);
        app.refresh_articles();
        app.edit_mode = true;

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        app.alert = Some("Could not add that feed.".to_string());
        app.input_active = true;
        terminal.draw(|f| draw(&mut app, f)).unwrap();
    }
}
