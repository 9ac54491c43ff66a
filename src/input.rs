//! Keyboard input handling.
//!
//! Maps terminal key events to [`Action`]s. Nothing here mutates state:
//! [`crate::app::App::dispatch`] is the only place actions take effect,
//! which keeps key bindings and behaviour decoupled and testable. Adding a
//! new keybinding is a single match arm in [`map_key`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{Action, App, Direction};

/// Translate one key event into an action, if any.
///
/// Only key-press events are considered (ignoring release and repeat) so
/// each physical keypress triggers exactly one action. An open alert
/// captures every key; an active input line captures everything except its
/// own control keys.
pub fn map_key(app: &App, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if app.alert.is_some() {
        return Some(Action::DismissAlert);
    }

    if app.input_active {
        return match key.code {
            KeyCode::Enter => Some(Action::AddFeed),
            KeyCode::Esc => Some(Action::CancelInput),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::InputChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('a') | KeyCode::Char('i') => Some(Action::OpenInput),
        KeyCode::Char('e') => Some(Action::ToggleEdit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectFirst),
        KeyCode::End | KeyCode::Char('G') => Some(Action::SelectLast),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectFilter(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectFilter(Direction::Right)),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteFeed),
        _ => None,
    }
}
