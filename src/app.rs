use std::path::PathBuf;

use crate::connection::SessionHooks;
use crate::filter::{self, HEADER, VisibleRow};
use crate::selection::Selection;
use crate::ssh_config::model::Host;

/// Session settings, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Absolute path of the SSH config, passed to the connection command.
    pub config_path: PathBuf,
    /// Initial search text.
    pub search_filter: String,
    /// Show full ProxyCommand instead of a placeholder.
    pub display_full_proxy: bool,
    /// Quit after the first SSH session ends, with its exit code.
    pub exit_after_session: bool,
    /// Connection command template. Empty means plain `ssh`.
    pub command_template: String,
    /// Command run before each session. Empty means none.
    pub on_session_start_template: String,
    /// Command run after each session. Empty means none.
    pub on_session_end_template: String,
}

impl AppConfig {
    pub fn session_hooks(&self) -> SessionHooks<'_> {
        SessionHooks {
            on_start: &self.on_session_start_template,
            on_end: &self.on_session_end_template,
        }
    }
}

/// Status message displayed at the bottom.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub tick_count: u32,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct HostTableView<'a> {
    pub header: [&'static str; 4],
    pub rows: &'a [VisibleRow],
    pub selected: Option<usize>,
    pub query: &'a str,
    pub status: Option<&'a StatusMessage>,
}

/// Main application state.
pub struct App {
    pub config: AppConfig,
    pub running: bool,
    hosts: Vec<Host>,
    query: String,
    rows: Vec<VisibleRow>,
    selection: Selection,

    // Status bar
    pub status: Option<StatusMessage>,

    // Index into `hosts` of a connection waiting to be launched
    pub pending_connect: Option<usize>,
}

impl App {
    pub fn new(hosts: Vec<Host>, config: AppConfig) -> Self {
        let query = config.search_filter.clone();
        let rows = filter::visible(&hosts, &query, config.display_full_proxy);
        let selection = Selection::new(rows.len());
        Self {
            config,
            running: true,
            hosts,
            query,
            rows,
            selection,
            status: None,
            pending_connect: None,
        }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the search text and recompute the visible rows, keeping the
    /// cursor on the same row when it is still shown.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        let rows = filter::visible(&self.hosts, &self.query, self.config.display_full_proxy);
        self.selection.refilter(&self.rows, &rows);
        self.rows = rows;
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.query.clone();
        query.pop();
        self.set_query(query);
    }

    pub fn clear_query(&mut self) {
        self.set_query(String::new());
    }

    pub fn select_next(&mut self) {
        self.selection.navigate(1);
    }

    pub fn select_prev(&mut self) {
        self.selection.navigate(-1);
    }

    pub fn select_first(&mut self) {
        self.selection.first();
    }

    pub fn select_last(&mut self) {
        self.selection.last();
    }

    /// The row under the cursor.
    pub fn selected_row(&self) -> Option<&VisibleRow> {
        self.selection.index().and_then(|i| self.rows.get(i))
    }

    /// The host under the cursor.
    pub fn selected_host(&self) -> Option<&Host> {
        self.selected_row().and_then(|row| self.hosts.get(row.host_index))
    }

    /// Take the host queued for connection, if any.
    pub fn take_pending_connect(&mut self) -> Option<Host> {
        self.pending_connect
            .take()
            .and_then(|index| self.hosts.get(index).cloned())
    }

    pub fn view(&self) -> HostTableView<'_> {
        HostTableView {
            header: HEADER,
            rows: &self.rows,
            selected: self.selection.index(),
            query: &self.query,
            status: self.status.as_ref(),
        }
    }

    /// Set a status message.
    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            tick_count: 0,
        });
    }

    /// Tick the status message timer. Errors show for 5s, success for 3s.
    pub fn tick_status(&mut self) {
        if let Some(ref mut status) = self.status {
            status.tick_count += 1;
            let timeout = if status.is_error { 20 } else { 12 };
            if status.tick_count > timeout {
                self.status = None;
            }
        }
    }
}
