use std::io::{Stdout, stdout};
use std::sync::Once;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::debug;

use crate::app::HostTableView;
use crate::ui::Renderer;

static PANIC_HOOK: Once = Once::new();

/// Owns the terminal while the picker is on screen.
///
/// `active` is true between [`Tui::enter`] and [`Tui::exit`]; the terminal
/// is released at most once per entry.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        Ok(Self {
            terminal,
            active: false,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode plus alternate screen. The panic hook that undoes both is
    /// installed on first entry.
    pub fn enter(&mut self) -> Result<()> {
        PANIC_HOOK.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = release_terminal();
                previous(info);
            }));
        });

        if self.active {
            return Ok(());
        }
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            disable_raw_mode()?;
            return Err(e.into());
        }
        self.active = true;

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Give the terminal back to the shell. Does nothing when not entered.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        release_terminal()?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Hand the terminal to `f`, e.g. for a child process. The terminal is
    /// released first and, when `restore` is set, taken back afterwards no
    /// matter what `f` returned.
    pub fn suspend<T>(&mut self, restore: bool, f: impl FnOnce() -> T) -> Result<T> {
        debug!("Releasing terminal");
        self.exit()?;
        let out = f();
        if restore {
            debug!("Restoring terminal");
            self.enter()?;
        }
        Ok(out)
    }

    pub fn draw(&mut self, renderer: &mut Renderer, view: &HostTableView<'_>) -> Result<()> {
        self.terminal.draw(|frame| renderer.render(frame, view))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn release_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_without_entering_is_a_no_op() {
        let Ok(mut tui) = Tui::new() else {
            return;
        };
        assert!(!tui.is_active());
        tui.exit().unwrap();
        tui.exit().unwrap();
        assert!(!tui.is_active());
    }

    #[test]
    fn released_suspend_stays_inactive() {
        let Ok(mut tui) = Tui::new() else {
            return;
        };
        let out = tui.suspend(false, || 7).unwrap();
        assert_eq!(out, 7);
        assert!(!tui.is_active());
    }
}
