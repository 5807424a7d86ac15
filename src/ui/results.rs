use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::state::{AppState, Focus};
use crate::util::ellipsize;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// What: Render the search input with its caret.
///
/// Details:
/// - The title shows the active match strategy; the terminal cursor is placed
///   at the caret only while the box is focused.
pub(super) fn render_search(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == Focus::Search;
    let title = format!(" Search ({}) ", app.browser.strategy_kind().as_config_key());
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(focused)),
    );
    f.render_widget(input, area);
    if focused && !app.detail.is_showing_detail() {
        let caret = app.search_caret.min(app.input.chars().count());
        f.set_cursor_position((caret_x(area, caret), area.y.saturating_add(1)));
    }
}

/// Terminal column of the caret inside the bordered input, clamped to the box.
pub(super) fn caret_x(area: Rect, caret: usize) -> u16 {
    let caret = u16::try_from(caret).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(caret)
        .min(area.right().saturating_sub(2))
}

/// What: Render the filtered results list.
///
/// Details:
/// - Expanded rows (or every row when descriptions are enabled) get an indented
///   description line.
/// - Samples with dependency tags carry a `⇣` marker.
pub(super) fn render_results(f: &mut Frame, app: &mut AppState, area: Rect) {
    let focused = app.focus == Focus::Results;
    let title = format!(
        " Samples {}/{} ",
        app.browser.displayed_len(),
        app.browser.samples().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(focused));

    if app.browser.displayed_len() == 0 {
        let hint = Paragraph::new("No results found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let desc_width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app
        .browser
        .displayed()
        .enumerate()
        .map(|(i, s)| {
            let mut head = vec![Span::styled(
                s.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(cat) = &s.category {
                head.push(Span::styled(
                    format!("  [{cat}]"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if s.has_dependencies() {
                head.push(Span::styled(" ⇣", Style::default().fg(Color::Yellow)));
            }
            let mut lines = vec![Line::from(head)];
            if (app.show_descriptions || app.browser.is_expanded(i)) && !s.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", ellipsize(&s.description, desc_width)),
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    app.sync_list_state();
    f.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render key hints on the left and the toast, if any, on the right.
pub(super) fn render_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = match app.focus {
        Focus::Search => "type to filter · Enter open · ↓ results · ^F mode · ^C quit",
        Focus::Results => "↑↓ move · Space expand · Enter open · / search · q quit",
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        area,
    );
    if let Some(msg) = &app.toast_message {
        let width = (msg.chars().count() as u16 + 2).min(area.width);
        let toast_area = Rect {
            x: area.right().saturating_sub(width),
            y: area.y,
            width,
            height: 1,
        };
        f.render_widget(
            Paragraph::new(msg.as_str())
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::Green)),
            toast_area,
        );
    }
}
