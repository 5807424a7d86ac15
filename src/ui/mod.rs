//! Rendering of the search box, results list, and overlays with ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::state::AppState;

mod modals;
mod results;

/// What: Draw one full frame.
///
/// Inputs:
/// - `f`: Frame to render into
/// - `app`: Application state (mutable for the list selection state)
///
/// Details:
/// - Layout is search box, results list, and a one-line footer; overlays
///   (progress, detail, alert) are drawn last, centred over the list.
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let [search_area, results_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    results::render_search(f, app, search_area);
    results::render_results(f, app, results_area);
    results::render_footer(f, app, footer_area);

    if let Some(progress) = app.browser.phase().progress() {
        modals::render_progress(f, app, progress, results_area);
    }
    modals::render_modal(f, app, results_area);
}

/// Rectangle of `pct_x`% by `height` rows centred in `area`.
pub(crate) fn centered_rect(pct_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(pct_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::SampleBrowser;
    use crate::state::{DetailView, Modal};
    use crate::test_utils::{Availability, Outcome, ScriptedProvider, sample};
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn render(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app() -> AppState {
        let provider = Arc::new(ScriptedProvider::new(Availability::Present, Outcome::Succeed));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut geocode = sample("Offline geocode", &["locator"]);
        geocode.category = Some("Search".into());
        let browser = SampleBrowser::new(vec![sample("Display map", &[]), geocode], provider, tx);
        AppState::new(browser, DetailView::default())
    }

    #[test]
    /// What: Results, expansion text, and the empty-results hint are drawn.
    ///
    /// Inputs:
    /// - Two-sample catalog; one row expanded; then a query with no matches.
    ///
    /// Output:
    /// - Rendered buffer contains names, the expanded description, and "No results found".
    fn renders_results_expansion_and_empty_hint() {
        let mut app = app();
        app.browser.toggle_expansion(1);
        let screen = render(&mut app);
        assert!(screen.contains("Display map"));
        assert!(screen.contains("Offline geocode"));
        assert!(screen.contains("Offline geocode description"));
        assert!(!screen.contains("Display map description"));

        app.input = "zzz".into();
        app.apply_query();
        let screen = render(&mut app);
        assert!(screen.contains("No results found"));
    }

    #[test]
    fn renders_detail_and_alert_overlays() {
        let mut app = app();
        app.detail.modal = Modal::Detail {
            sample_id: "display-map".into(),
            title: "Display map".into(),
            body: "Pan and zoom around.".into(),
            scroll: 0,
        };
        assert!(render(&mut app).contains("Pan and zoom around."));
        app.detail.modal = Modal::Alert {
            message: "Download failed: boom".into(),
        };
        assert!(render(&mut app).contains("Download failed: boom"));
    }

    #[test]
    /// What: A search input longer than `u16::MAX` characters renders without overflow.
    ///
    /// Inputs:
    /// - 70 000-character input with the caret at the end.
    ///
    /// Output:
    /// - Drawing succeeds and the caret column stays inside the search box.
    fn huge_input_keeps_caret_inside_box() {
        let mut app = app();
        app.input = "x".repeat(70_000);
        app.search_caret = 70_000;
        let _ = render(&mut app);

        let area = Rect::new(0, 0, 70, 3);
        assert_eq!(results::caret_x(area, 70_000), 68);
        assert_eq!(results::caret_x(area, 3), 4);
        assert_eq!(results::caret_x(Rect::new(u16::MAX - 5, 0, 5, 3), usize::MAX), u16::MAX - 2);
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(2, 3, 40, 10);
        let r = centered_rect(50, 20, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 10);
        assert_eq!(r.x, 12);
        assert_eq!(r.y, 3);
    }
}
