use crossterm::event::{KeyCode, KeyEvent};

use crate::state::{AppState, Focus};

const PAGE: isize = 10;

/// What: Handle key events while the results list is focused.
///
/// Inputs:
/// - `ke`: Key event
/// - `app`: Mutable application state
///
/// Output:
/// - `true` when the user asked to quit (`q` or `Esc`).
///
/// Details:
/// - `Space`, `Left`, and `Right` toggle the description row of the highlighted result.
/// - `/` and `Tab` return focus to the search box; `Up` on the first row does too.
pub(super) fn handle_results_key(ke: KeyEvent, app: &mut AppState) -> bool {
    match ke.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up | KeyCode::Char('k') => {
            if app.browser.cursor() == 0 {
                app.focus = Focus::Search;
            } else {
                app.browser.move_cursor(-1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.browser.move_cursor(1),
        KeyCode::PageUp => app.browser.move_cursor(-PAGE),
        KeyCode::PageDown => app.browser.move_cursor(PAGE),
        KeyCode::Home | KeyCode::Char('g') => app.browser.move_cursor(isize::MIN),
        KeyCode::End | KeyCode::Char('G') => app.browser.move_cursor(isize::MAX),
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
            let at = app.browser.cursor();
            app.browser.toggle_expansion(at);
        }
        KeyCode::Enter => super::open_highlighted(app),
        KeyCode::Char('/') | KeyCode::Tab => app.focus = Focus::Search,
        _ => {}
    }
    app.sync_list_state();
    false
}
