//! Keyboard input handling for the dashboard.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Tab | KeyCode::Char('s') => app.next_sensor(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.alpha_up(),
        KeyCode::Char('-') | KeyCode::Left => app.alpha_down(),
        KeyCode::Char('r') => app.resimulate(),
        _ => {}
    }
}
