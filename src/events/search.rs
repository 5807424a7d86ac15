use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::{AppState, Focus};

/// Byte offset of the `ci`-th character of `s` (or `s.len()` past the end).
fn byte_index(s: &str, ci: usize) -> usize {
    s.char_indices().nth(ci).map(|(i, _)| i).unwrap_or(s.len())
}

/// What: Handle key events while the search box is focused.
///
/// Inputs:
/// - `ke`: Key event
/// - `app`: Mutable application state
///
/// Output:
/// - Always `false`; the search box never requests exit.
///
/// Details:
/// - Text edits re-run the query immediately.
/// - `Enter` opens the highlighted result; `Down`/`Tab` move focus to the results.
/// - `Esc` clears the input.
pub(super) fn handle_search_key(ke: KeyEvent, app: &mut AppState) -> bool {
    let len = app.input.chars().count();
    app.search_caret = app.search_caret.min(len);
    match ke.code {
        KeyCode::Char(c)
            if !ke
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let at = byte_index(&app.input, app.search_caret);
            app.input.insert(at, c);
            app.search_caret += 1;
            app.apply_query();
        }
        KeyCode::Backspace => {
            if app.search_caret > 0 {
                let at = byte_index(&app.input, app.search_caret - 1);
                app.input.remove(at);
                app.search_caret -= 1;
                app.apply_query();
            }
        }
        KeyCode::Delete => {
            if app.search_caret < len {
                let at = byte_index(&app.input, app.search_caret);
                app.input.remove(at);
                app.apply_query();
            }
        }
        KeyCode::Left => app.search_caret = app.search_caret.saturating_sub(1),
        KeyCode::Right => app.search_caret = (app.search_caret + 1).min(len),
        KeyCode::Home => app.search_caret = 0,
        KeyCode::End => app.search_caret = len,
        KeyCode::Esc => {
            if !app.input.is_empty() {
                app.input.clear();
                app.search_caret = 0;
                app.apply_query();
            }
        }
        KeyCode::Enter => super::open_highlighted(app),
        KeyCode::Down | KeyCode::Tab => {
            if app.browser.displayed_len() > 0 {
                app.focus = Focus::Results;
            }
        }
        _ => {}
    }
    false
}
