//! Event handling layer for the terminal UI.
//!
//! `handle_event` routes a key press to the open modal, the in-flight fetch,
//! or the focused pane; pane-specific logic lives in submodules.

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::{AppState, Focus, StrategyKind};

mod modals;
mod results;
mod search;

/// What: Dispatch a single terminal event and mutate the [`AppState`].
///
/// Inputs:
/// - `ev`: Terminal event
/// - `app`: Mutable application state
///
/// Output:
/// - `true` to signal the application should exit; otherwise `false`.
///
/// Details:
/// - `Ctrl+C` always exits.
/// - Open modals consume keys first, then an in-flight fetch (only `Esc`
///   cancels it), then global shortcuts, then the focused pane.
pub fn handle_event(ev: CEvent, app: &mut AppState) -> bool {
    let CEvent::Key(ke) = ev else {
        return false;
    };
    if ke.kind != KeyEventKind::Press {
        return false;
    }
    if ke.code == KeyCode::Char('c') && ke.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if modals::handle_modal_key(ke, app) {
        return false;
    }

    if app.browser.phase().is_in_flight() {
        if ke.code == KeyCode::Esc && app.browser.cancel_fetch() {
            tracing::info!("download cancelled by user");
            app.sync_list_state();
        }
        return false;
    }

    if handle_global_key(ke, app) {
        return false;
    }

    match app.focus {
        Focus::Search => search::handle_search_key(ke, app),
        Focus::Results => results::handle_results_key(ke, app),
    }
}

/// What: Shortcuts available from either pane.
///
/// Output:
/// - `true` when the key was consumed.
///
/// Details:
/// - `Ctrl+F` toggles between substring and fuzzy matching.
/// - `Ctrl+D` toggles description lines on every row.
fn handle_global_key(ke: KeyEvent, app: &mut AppState) -> bool {
    if !ke.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    match ke.code {
        KeyCode::Char('f') => {
            let next = match app.browser.strategy_kind() {
                StrategyKind::Substring => StrategyKind::Fuzzy,
                StrategyKind::Fuzzy => StrategyKind::Substring,
            };
            app.browser.set_strategy(next);
            app.sync_list_state();
            app.toast(format!("Search mode: {}", next.as_config_key()));
            true
        }
        KeyCode::Char('d') => {
            app.show_descriptions = !app.show_descriptions;
            true
        }
        _ => false,
    }
}

/// Select the highlighted sample, presenting it or starting its fetch.
fn open_highlighted(app: &mut AppState) {
    if app.browser.displayed_len() == 0 {
        return;
    }
    let index = app.browser.cursor();
    app.browser.select_sample(index, &mut app.detail);
    app.sync_list_state();
}
