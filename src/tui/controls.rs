//! Keyboard input handling for the TUI.

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
        KeyCode::Char(' ') => app.toggle_running(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('e') => app.export(),
        KeyCode::Up => app.nudge_voltage(1),
        KeyCode::Down => app.nudge_voltage(-1),
        KeyCode::Right => app.nudge_resistance(1),
        KeyCode::Left => app.nudge_resistance(-1),
        KeyCode::Tab => app.move_cursor(1),
        KeyCode::BackTab => app.move_cursor(-1),
        KeyCode::Enter => app.toggle_selected_pin(),
        _ => {}
    }
}
