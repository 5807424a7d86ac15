use crossterm::event::{KeyCode, KeyEvent};

use crate::state::{AppState, Modal};

/// What: Handle keys while a modal overlay is open.
///
/// Inputs:
/// - `ke`: Key event
/// - `app`: Mutable application state
///
/// Output:
/// - `true` when a modal was open and consumed the key.
///
/// Details:
/// - Closing the detail screen also clears the browser selection.
/// - Alerts close on `Esc`, `Enter`, or `q`; every other key is swallowed.
pub(super) fn handle_modal_key(ke: KeyEvent, app: &mut AppState) -> bool {
    match app.detail.modal {
        Modal::None => false,
        Modal::Detail { .. } => {
            match ke.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                    app.detail.dismiss();
                    app.browser.clear_selection();
                }
                KeyCode::Up | KeyCode::Char('k') => app.detail.scroll(-1),
                KeyCode::Down | KeyCode::Char('j') => app.detail.scroll(1),
                KeyCode::PageUp => app.detail.scroll(-10),
                KeyCode::PageDown => app.detail.scroll(10),
                _ => {}
            }
            true
        }
        Modal::Alert { .. } => {
            if matches!(ke.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.detail.dismiss();
            }
            true
        }
    }
}
