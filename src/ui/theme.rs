use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Terminal color capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// `NO_COLOR` is set: modifiers only.
    None,
    Ansi16,
    TrueColor,
}

impl ColorMode {
    /// Detect from `NO_COLOR` and `COLORTERM`.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let colorterm = std::env::var("COLORTERM").ok();
        Self::from_env(no_color, colorterm.as_deref())
    }

    fn from_env(no_color: bool, colorterm: Option<&str>) -> Self {
        if no_color {
            ColorMode::None
        } else if matches!(colorterm, Some("truecolor" | "24bit")) {
            ColorMode::TrueColor
        } else {
            ColorMode::Ansi16
        }
    }
}

/// Styles and border glyphs for the picker. Built once and handed to the
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub border_type: BorderType,
    /// Borders of the search bar, table and footer.
    pub border: Style,
    /// Column titles.
    pub header: Style,
    /// The selected row.
    pub selected: Style,
    /// "Search..." shown while the query is empty.
    pub placeholder: Style,
    /// Keys in the footer.
    pub key: Style,
    /// Secondary text.
    pub muted: Style,
    pub error: Style,
    pub success: Style,
}

impl Theme {
    pub fn detect() -> Self {
        Self::for_mode(ColorMode::detect())
    }

    pub fn for_mode(mode: ColorMode) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let muted = Style::default().add_modifier(Modifier::DIM);
        match mode {
            ColorMode::None => Theme {
                border_type: BorderType::Rounded,
                border: muted,
                header: bold,
                selected: Style::default().add_modifier(Modifier::REVERSED),
                placeholder: muted,
                key: bold,
                muted,
                error: bold,
                success: bold,
            },
            ColorMode::Ansi16 => Theme {
                border_type: BorderType::Rounded,
                border: Style::default().fg(Color::Magenta),
                header: bold.fg(Color::Blue),
                selected: Style::default().fg(Color::Black).bg(Color::White),
                placeholder: Style::default().fg(Color::Yellow),
                key: bold,
                muted,
                error: bold.fg(Color::Red),
                success: bold.fg(Color::Green),
            },
            ColorMode::TrueColor => Theme {
                border_type: BorderType::Rounded,
                border: Style::default().fg(Color::Rgb(147, 51, 234)),
                header: bold.fg(Color::Rgb(96, 165, 250)),
                selected: Style::default()
                    .fg(Color::Rgb(15, 23, 42))
                    .bg(Color::Rgb(226, 232, 240)),
                placeholder: Style::default().fg(Color::Rgb(250, 204, 21)),
                key: bold,
                muted,
                error: bold.fg(Color::Rgb(248, 113, 113)),
                success: bold.fg(Color::Rgb(74, 222, 128)),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ColorMode::Ansi16)
    }
}
