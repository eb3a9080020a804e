use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};

/// Everything a key press or terminal event can do to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NavigateUp,
    NavigateDown,
    NavigateFirst,
    NavigateLast,
    Backspace,
    ClearQuery,
    Confirm,
    AppendChar(char),
    Resize,
    Quit,
}

impl Action {
    /// Map a key press to an action. Keys without a binding return `None`.
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                KeyCode::Char('k') | KeyCode::Char('p') => Some(Action::NavigateUp),
                KeyCode::Char('j') | KeyCode::Char('n') => Some(Action::NavigateDown),
                KeyCode::Char('u') => Some(Action::ClearQuery),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Home => Some(Action::NavigateFirst),
            KeyCode::End => Some(Action::NavigateLast),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Char(c) if !alt && !c.is_control() => Some(Action::AppendChar(c)),
            _ => None,
        }
    }
}

/// Application events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Action(Action),
    Tick,
}

/// Reads terminal events on the calling thread, producing a `Tick` whenever
/// the tick rate passes without input.
pub struct EventHandler {
    tick_rate: Duration,
    last_tick: Instant,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            last_tick: Instant::now(),
        }
    }

    /// Block until the next bound key, resize or tick.
    pub fn next(&mut self) -> Result<AppEvent> {
        loop {
            let timeout = self
                .tick_rate
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = Action::from_key(key) {
                            return Ok(AppEvent::Action(action));
                        }
                    }
                    CrosstermEvent::Resize(_, _) => return Ok(AppEvent::Action(Action::Resize)),
                    _ => {}
                }
            }

            if self.last_tick.elapsed() >= self.tick_rate {
                self.last_tick = Instant::now();
                return Ok(AppEvent::Tick);
            }
        }
    }

    /// Restart the tick clock, e.g. after the terminal was handed to a child.
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}
