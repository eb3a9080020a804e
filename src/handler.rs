use crate::app::App;
use crate::event::Action;

/// Apply one action to the application state.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => {
            app.running = false;
        }
        Action::NavigateDown => app.select_next(),
        Action::NavigateUp => app.select_prev(),
        Action::NavigateFirst => app.select_first(),
        Action::NavigateLast => app.select_last(),
        Action::AppendChar(c) => app.push_char(c),
        Action::Backspace => app.pop_char(),
        Action::ClearQuery => app.clear_query(),
        Action::Confirm => {
            if let Some(index) = app.selected_row().map(|row| row.host_index) {
                app.pending_connect = Some(index);
            }
        }
        // Layout only; the next draw picks up the new size.
        Action::Resize => {}
    }
}
