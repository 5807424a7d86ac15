//! Central `AppState` container owned by the UI loop.

use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::logic::SampleBrowser;
use crate::state::detail::DetailView;
use crate::state::types::Focus;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Application state shared by the event, fetch, and UI layers.
///
/// Mutated only on the UI loop: key handling, fetch events, and ticks.
#[derive(Debug)]
pub struct AppState {
    /// Current search input text.
    pub input: String,
    /// Caret position (in characters) within `input`.
    pub search_caret: usize,
    /// Filtering, selection, and the active resource request.
    pub browser: SampleBrowser,
    /// Presenter for ready samples and failure alerts.
    pub detail: DetailView,
    /// Which area receives key presses.
    pub focus: Focus,
    /// ratatui selection state for the results list; kept in sync with the cursor.
    pub list_state: ListState,
    /// Whether every row shows its description, not just expanded ones.
    pub show_descriptions: bool,
    /// Optional short-lived info message rendered at the bottom-right corner.
    pub toast_message: Option<String>,
    /// Deadline after which the toast is hidden.
    pub toast_expires_at: Option<Instant>,
}

impl AppState {
    pub fn new(browser: SampleBrowser, detail: DetailView) -> Self {
        let mut list_state = ListState::default();
        if browser.displayed_len() > 0 {
            list_state.select(Some(0));
        }
        Self {
            input: String::new(),
            search_caret: 0,
            browser,
            detail,
            focus: Focus::Search,
            list_state,
            show_descriptions: false,
            toast_message: None,
            toast_expires_at: None,
        }
    }

    /// Push the current input text into the browser and resync the list cursor.
    pub fn apply_query(&mut self) {
        self.browser.set_query(&self.input);
        self.sync_list_state();
    }

    /// Mirror the browser cursor into the ratatui `ListState`.
    pub fn sync_list_state(&mut self) {
        if self.browser.displayed_len() == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.browser.cursor()));
        }
    }

    /// Show `message` as a toast for a few seconds.
    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expires_at = Some(Instant::now() + TOAST_TTL);
    }

    /// What: Hide the toast once its deadline has passed.
    ///
    /// Inputs:
    /// - `now`: Current instant (passed in so ticks are testable).
    pub fn expire_toast(&mut self, now: Instant) {
        if let Some(deadline) = self.toast_expires_at
            && now >= deadline
        {
            self.toast_message = None;
            self.toast_expires_at = None;
        }
    }
}
