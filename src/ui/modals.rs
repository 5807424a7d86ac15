use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use super::centered_rect;
use crate::state::{AppState, FetchPhase, Modal};

/// What: Draw the fetch progress box for the selected sample.
///
/// Inputs:
/// - `progress`: Fraction to show (`0.0..=1.0`).
/// - `area`: Region to centre the box in.
pub(super) fn render_progress(f: &mut Frame, app: &AppState, progress: f64, area: Rect) {
    let name = app
        .browser
        .selected()
        .map(|s| s.name.as_str())
        .unwrap_or_default();
    let label = match app.browser.phase() {
        FetchPhase::Checking => "Checking resources…".to_string(),
        FetchPhase::AlreadyAvailable => "Resources available".to_string(),
        _ => format!("Downloading {:.0}%", progress * 100.0),
    };
    let rect = centered_rect(60, 3, area);
    f.render_widget(Clear, rect);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {name} · Esc to cancel ")),
        )
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, rect);
}

/// Draw the detail screen or alert overlay, if one is open.
pub(super) fn render_modal(f: &mut Frame, app: &AppState, area: Rect) {
    match &app.detail.modal {
        Modal::None => {}
        Modal::Detail {
            title,
            body,
            scroll,
            ..
        } => {
            let rect = centered_rect(90, area.height, area);
            f.render_widget(Clear, rect);
            let p = Paragraph::new(body.as_str())
                .wrap(Wrap { trim: false })
                .scroll((*scroll, 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {title} "))
                        .title_bottom(" ↑↓ scroll · Esc close ")
                        .border_style(Style::default().fg(Color::Cyan)),
                );
            f.render_widget(p, rect);
        }
        Modal::Alert { message } => {
            let rect = centered_rect(70, 5, area);
            f.render_widget(Clear, rect);
            let p = Paragraph::new(message.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Error ")
                        .title_bottom(" Enter to dismiss ")
                        .border_style(Style::default().fg(Color::Red)),
                );
            f.render_widget(p, rect);
        }
    }
}
