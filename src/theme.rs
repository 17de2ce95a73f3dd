use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Errors that can occur when loading a theme
#[derive(thiserror::Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse theme: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid color '{0}'")]
    InvalidColor(String),
}

/// Visual configuration of a die.
///
/// Entirely opaque to the roll logic; the values pass straight through to the
/// drawing layer. Dimensions are terminal cells, so the default width is
/// roughly double the height to come out square on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiceTheme {
    /// Interior width of the die in columns
    pub width: u16,
    /// Interior height of the die in rows
    pub height: u16,
    /// Blank columns between dice
    pub gap: u16,
    /// Glyph for a pip
    pub pip_glyph: char,
    /// Glyph for the trailing tail pip drawn during slides
    pub tail_glyph: char,
    /// Pip color, a named color or `#rrggbb`
    pub pip_color: String,
    /// Border color, a named color or `#rrggbb`
    pub border_color: String,
}

impl Default for DiceTheme {
    fn default() -> Self {
        Self {
            width: 15,
            height: 7,
            gap: 3,
            pip_glyph: '●',
            tail_glyph: '•',
            pip_color: "white".to_string(),
            border_color: "grey".to_string(),
        }
    }
}

impl DiceTheme {
    /// Load a theme from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let contents = fs::read_to_string(path)?;
        let theme: Self = serde_yaml::from_str(&contents)?;
        // Fail early on bad colors rather than mid-animation.
        theme.pip_color()?;
        theme.border_color()?;
        Ok(theme)
    }

    pub fn pip_color(&self) -> Result<Color, ThemeError> {
        parse_color(&self.pip_color)
    }

    pub fn border_color(&self) -> Result<Color, ThemeError> {
        parse_color(&self.border_color)
    }
}

fn parse_color(name: &str) -> Result<Color, ThemeError> {
    let lower = name.trim().to_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        // Byte slicing below requires ASCII; anything else is invalid anyway.
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |range| u8::from_str_radix(&hex[range], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0..2), channel(2..4), channel(4..6)) {
                return Ok(Color::Rgb { r, g, b });
            }
        }
        return Err(ThemeError::InvalidColor(name.to_string()));
    }

    let color = match lower.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        "darkred" => Color::DarkRed,
        "darkgreen" => Color::DarkGreen,
        "darkyellow" => Color::DarkYellow,
        "darkblue" => Color::DarkBlue,
        "darkmagenta" => Color::DarkMagenta,
        "darkcyan" => Color::DarkCyan,
        _ => return Err(ThemeError::InvalidColor(name.to_string())),
    };
    Ok(color)
}
