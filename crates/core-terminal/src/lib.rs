//! Terminal backend abstraction and crossterm implementation.
//!
//! The editor core draws through the [`Terminal`] trait and assumes nothing
//! about the host beyond it. Draw calls are best effort (a failed write to a
//! torn-down terminal is not an editing error); entering and leaving raw mode
//! are fallible, and `Drop` restores the screen on every exit path.

use std::io::{stdout, Write};

use anyhow::Result;
use crossterm::{
    cursor::{MoveTo, Show},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

pub mod headless;
mod palette;

pub use headless::HeadlessTerminal;
pub use palette::PaletteColor;

/// Drawing surface the editor renders into.
pub trait Terminal {
    /// Current size as (rows, cols).
    fn size(&self) -> (u16, u16);
    fn clear(&mut self);
    fn draw_text(&mut self, row: u16, col: u16, text: &str);
    /// Draw `text` with the byte span `[hl_start, hl_start + hl_len)` in the
    /// search-highlight style.
    fn draw_highlighted(&mut self, row: u16, col: u16, text: &str, hl_start: usize, hl_len: usize);
    fn draw_colored(&mut self, row: u16, col: u16, text: &str, color: PaletteColor);
    fn clear_to_eol(&mut self, row: u16, col: u16);
    fn move_cursor(&mut self, row: u16, col: u16);
    fn refresh(&mut self);
    fn set_background(&mut self, color: PaletteColor);
    fn set_search_highlight(&mut self, color: PaletteColor);
}

/// Crossterm-backed terminal writing to stdout.
pub struct CrosstermTerminal {
    entered: bool,
    background: PaletteColor,
    search_highlight: PaletteColor,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            entered: false,
            background: PaletteColor::Default,
            search_highlight: PaletteColor::Default,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Show)?;
            self.entered = true;
        }
        Ok(())
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), ResetColor, LeaveAlternateScreen)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn background_color(&self) -> Option<Color> {
        match self.background {
            PaletteColor::Default => None,
            other => Some(other.to_crossterm()),
        }
    }

    fn queue_at(&self, row: u16, col: u16) {
        let _ = queue!(stdout(), MoveTo(col, row));
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> (u16, u16) {
        match crossterm::terminal::size() {
            Ok((cols, rows)) => (rows, cols),
            Err(_) => (24, 80),
        }
    }

    fn clear(&mut self) {
        let mut out = stdout();
        if let Some(bg) = self.background_color() {
            let _ = queue!(out, SetBackgroundColor(bg));
        }
        let _ = queue!(out, Clear(ClearType::All));
    }

    fn draw_text(&mut self, row: u16, col: u16, text: &str) {
        self.queue_at(row, col);
        let _ = queue!(stdout(), Print(text));
    }

    fn draw_highlighted(&mut self, row: u16, col: u16, text: &str, hl_start: usize, hl_len: usize) {
        let hl_start = hl_start.min(text.len());
        let hl_end = (hl_start + hl_len).min(text.len());
        let (prefix, rest) = text.split_at(hl_start);
        let (mid, suffix) = rest.split_at(hl_end - hl_start);
        self.queue_at(row, col);
        let mut out = stdout();
        let _ = queue!(out, Print(prefix));
        match self.search_highlight {
            PaletteColor::Default => {
                let _ = queue!(out, SetAttribute(Attribute::Reverse), Print(mid));
            }
            color => {
                let _ = queue!(out, SetBackgroundColor(color.to_crossterm()), Print(mid));
            }
        }
        let _ = queue!(out, SetAttribute(Attribute::Reset), ResetColor);
        if let Some(bg) = self.background_color() {
            let _ = queue!(out, SetBackgroundColor(bg));
        }
        let _ = queue!(out, Print(suffix));
    }

    fn draw_colored(&mut self, row: u16, col: u16, text: &str, color: PaletteColor) {
        self.queue_at(row, col);
        let mut out = stdout();
        let _ = queue!(out, SetForegroundColor(color.to_crossterm()), Print(text), ResetColor);
        if let Some(bg) = self.background_color() {
            let _ = queue!(out, SetBackgroundColor(bg));
        }
    }

    fn clear_to_eol(&mut self, row: u16, col: u16) {
        self.queue_at(row, col);
        let _ = queue!(stdout(), Clear(ClearType::UntilNewLine));
    }

    fn move_cursor(&mut self, row: u16, col: u16) {
        let _ = queue!(stdout(), MoveTo(col, row));
    }

    fn refresh(&mut self) {
        let _ = stdout().flush();
    }

    fn set_background(&mut self, color: PaletteColor) {
        self.background = color;
    }

    fn set_search_highlight(&mut self, color: PaletteColor) {
        self.search_highlight = color;
    }
}
