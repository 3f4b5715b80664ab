//! Fixed color palette exposed to `:set background` / `:set searchcolor`.

use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteColor {
    #[default]
    Default,
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl PaletteColor {
    /// Parse a palette name; `normal` is accepted as an alias for `default`.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "default" | "normal" => PaletteColor::Default,
            "black" => PaletteColor::Black,
            "white" => PaletteColor::White,
            "red" => PaletteColor::Red,
            "green" => PaletteColor::Green,
            "blue" => PaletteColor::Blue,
            "yellow" => PaletteColor::Yellow,
            "magenta" => PaletteColor::Magenta,
            "cyan" => PaletteColor::Cyan,
            _ => return None,
        };
        Some(color)
    }

    pub fn to_crossterm(self) -> Color {
        match self {
            PaletteColor::Default => Color::Reset,
            PaletteColor::Black => Color::Black,
            PaletteColor::White => Color::White,
            PaletteColor::Red => Color::DarkRed,
            PaletteColor::Green => Color::DarkGreen,
            PaletteColor::Blue => Color::DarkBlue,
            PaletteColor::Yellow => Color::DarkYellow,
            PaletteColor::Magenta => Color::DarkMagenta,
            PaletteColor::Cyan => Color::DarkCyan,
        }
    }
}
