use folio_core::{ThemeConfig, ThemeMode};
use ratatui::style::{Color, Modifier, Style};

fn parse_theme_color(name: &str) -> Color {
    match name.trim().to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        hex if hex.starts_with('#') && hex.len() == 7 && hex.is_ascii() => {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            match (channel(1..3), channel(3..5), channel(5..7)) {
                (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
                _ => Color::Cyan,
            }
        }
        _ => Color::Cyan,
    }
}

/// Resolved colours for one theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub error: Color,
    pub text: Color,
    pub muted: Color,
    pub background: Color,
    pub success: Color,
}

impl Palette {
    pub fn new(cfg: &ThemeConfig, mode: ThemeMode) -> Self {
        let (text, muted, background) = match mode {
            ThemeMode::Dark => (Color::White, Color::DarkGray, Color::Black),
            ThemeMode::Light => (Color::Black, Color::Gray, Color::White),
        };
        Self {
            primary: parse_theme_color(&cfg.primary),
            secondary: parse_theme_color(&cfg.secondary),
            error: parse_theme_color(&cfg.error),
            text,
            muted,
            background,
            success: Color::Green,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
