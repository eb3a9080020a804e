use ratatui::Frame;
use ratatui::layout::{Constraint, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, HighlightSpacing, Padding, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::{HostTableView, StatusMessage};

const PLACEHOLDER: &str = "Search...";

fn block(theme: &Theme) -> Block<'static> {
    Block::bordered()
        .border_type(theme.border_type)
        .border_style(theme.border)
}

pub fn render_search_bar(frame: &mut Frame, area: Rect, theme: &Theme, query: &str) {
    let text = if query.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, theme.placeholder))
    } else {
        Line::from(query)
    };
    let search = Paragraph::new(text).block(block(theme).padding(Padding::horizontal(1)));
    frame.render_widget(search, area);

    // Border + padding on the left.
    let offset = u16::try_from(query.width()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(2)
        .saturating_add(offset)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position(Position::new(x, area.y + 1));
}

/// Width of the widest cell in each column, header included.
fn column_widths(view: &HostTableView<'_>) -> [u16; 4] {
    let mut widths = view.header.map(|title| title.width());
    for row in view.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.width());
        }
    }
    widths.map(|w| u16::try_from(w).unwrap_or(u16::MAX))
}

pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    view: &HostTableView<'_>,
    state: &mut TableState,
) {
    let title = Line::from(format!(" {} hosts ", view.rows.len()));
    let block = block(theme).title(title);

    if view.rows.is_empty() {
        let empty_msg = Paragraph::new(" No matches. Try a different search.")
            .style(theme.muted)
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let header = Row::new([
        Cell::from(view.header[0]),
        Cell::from(view.header[1]),
        Cell::from(view.header[2]),
        Cell::from(Line::from(view.header[3]).right_aligned()),
    ])
    .style(theme.header);

    let rows = view.rows.iter().map(|row| {
        let [name, user, target, port] = row.cells();
        Row::new([
            Cell::from(name),
            Cell::from(user),
            Cell::from(target),
            Cell::from(Line::from(port).right_aligned()),
        ])
    });

    let [name_w, user_w, target_w, port_w] = column_widths(view);
    let widths = [
        Constraint::Length(name_w),
        Constraint::Length(user_w),
        Constraint::Min(target_w),
        Constraint::Length(port_w),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(theme.selected)
        .highlight_symbol(" ")
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(table, area, state);
}

pub fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, theme.key),
            Span::styled(label, theme.muted),
        ]
    };
    let spans: Vec<Span> = [
        hint(" Enter", " connect  "),
        hint("\u{2191}\u{2193}", " move  "),
        hint("Ctrl-U", " clear  "),
        hint("Esc", " quit"),
    ]
    .into_iter()
    .flatten()
    .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_status(frame: &mut Frame, area: Rect, theme: &Theme, status: &StatusMessage) {
    let line = if status.is_error {
        Line::from(vec![
            Span::styled(" ! ", theme.error),
            Span::styled(status.text.as_str(), theme.error),
        ])
    } else {
        Line::from(Span::styled(format!(" {}", status.text), theme.success))
    };
    frame.render_widget(Paragraph::new(line), area);
}
