mod host_table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Paragraph, TableState};

use crate::app::HostTableView;
pub use theme::Theme;

const MIN_WIDTH: u16 = 30;
const MIN_HEIGHT: u16 = 7;

/// Draws the picker. Owns the immutable theme and the table's scroll
/// offset; never touches selection or filter state.
pub struct Renderer {
    theme: Theme,
    table_state: TableState,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            table_state: TableState::default(),
        }
    }

    /// Top-level render: search bar, host table, footer.
    pub fn render(&mut self, frame: &mut Frame, view: &HostTableView<'_>) {
        let area = frame.area();

        // Terminal too small guard
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let msg = Paragraph::new("Terminal too small.").style(self.theme.error);
            frame.render_widget(msg, area);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(3), // Search bar
            Constraint::Min(3),    // Host table
            Constraint::Length(1), // Footer or status message
        ])
        .split(area);

        host_table::render_search_bar(frame, chunks[0], &self.theme, view.query);

        self.table_state.select(view.selected);
        host_table::render_table(frame, chunks[1], &self.theme, view, &mut self.table_state);

        match view.status {
            Some(status) => host_table::render_status(frame, chunks[2], &self.theme, status),
            None => host_table::render_footer(frame, chunks[2], &self.theme),
        }
    }
}
