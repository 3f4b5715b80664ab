//! The editor coordinator.
//!
//! [`Editor`] owns the workspace, routes keys by mode, exposes the colon
//! command surface, and mediates every edit through the document's undo log.
//! Edit primitives follow one pattern end to end:
//!
//! ```text
//! begin_group -> store mutation -> push op(s) -> mark dirty -> clear_redo -> commit_group
//! ```
//!
//! Composite actions (paste, visual delete, indent, dot-repeat) wrap their
//! primitives in a single group so they undo as a unit. Key handlers never
//! fail: user-level problems surface as a one-line status message and the
//! mode falls back to Normal.

use std::path::PathBuf;

use core_input::{Decoder, Key, Operator};
use core_model::{Pane, Rect, Workspace};
use core_state::{Mode, Options, Register};
use core_terminal::PaletteColor;
use core_text::{Backend, Position};
use tracing::debug;

pub mod command;
pub mod edit;
pub mod insert;
pub mod io_ops;
pub mod motion;
pub mod panes;
pub mod repeat;
pub mod search;
pub mod visual;

pub use search::SearchHit;

/// Mouse gestures the runtime forwards after decoding terminal events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseGesture {
    LeftClick,
    WheelUp,
    WheelDown,
}

pub struct Editor {
    pub ws: Workspace,
    pub mode: Mode,
    pub options: Options,
    pub register: Register,
    pub decoder: Decoder,
    /// One-line status message shown until the next action replaces it.
    pub message: String,
    /// Command-line buffer, excluding the `:` prompt but including a leading
    /// `/` or `?` for searches.
    pub cmdline: String,
    pub visual_anchor: Position,
    pub visual_active: bool,
    pub last_search: String,
    pub last_search_forward: bool,
    pub search_hits: Vec<SearchHit>,
    pub background: PaletteColor,
    pub search_color: PaletteColor,
    pub should_quit: bool,
    pub backend: Backend,
    /// Screen rectangle, refreshed by the runtime before each key.
    pub screen: Rect,
    /// Text rows of the active pane as of the last render; drives half-page
    /// scrolling.
    pub last_text_height: usize,
    // Insert-mode write-through buffer: mirrors what the current line will
    // become so each keystroke logs one op without re-reading the store.
    pub(crate) insert_active: bool,
    pub(crate) insert_row: usize,
    pub(crate) insert_line: String,
}

impl Editor {
    /// Build an editor over a single pane. `path` (when given) is read from
    /// disk; a missing or unreadable file leaves an empty document carrying
    /// the path, so `:w` creates it.
    pub fn new(backend: Backend, options: Options, path: Option<PathBuf>) -> Self {
        let mut message = String::new();
        let doc = panes::open_document(backend, path.as_deref(), &mut message);
        let ws = Workspace::new(Pane::new(doc.clone()));
        let mut editor = Self {
            ws,
            mode: Mode::Normal,
            options,
            register: Register::default(),
            decoder: Decoder::new(),
            message,
            cmdline: String::new(),
            visual_anchor: Position::origin(),
            visual_active: false,
            last_search: String::new(),
            last_search_forward: true,
            search_hits: Vec::new(),
            background: PaletteColor::Default,
            search_color: PaletteColor::Default,
            should_quit: false,
            backend,
            screen: Rect::new(0, 0, 24, 80),
            last_text_height: 22,
            insert_active: false,
            insert_row: 0,
            insert_line: String::new(),
        };
        if let Some(p) = path {
            editor.ws.docs.register(&p, &doc);
        }
        editor
    }

    pub fn cursor(&self) -> Position {
        self.ws.pane().cursor
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.ws.pane_mut().cursor = pos;
    }

    /// Highest resting column for `row` in the active document.
    pub fn max_col(&self, row: usize) -> usize {
        self.ws.doc().borrow().max_col(row, self.options.onemore)
    }

    pub fn set_screen(&mut self, rows: u16, cols: u16) {
        self.screen = Rect::new(0, 0, rows, cols);
    }

    /// Screen area available to panes (everything above the status line).
    pub fn pane_area(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.screen.height.saturating_sub(1),
            self.screen.width,
        )
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    /// Route one key according to the current mode.
    pub fn handle_key(&mut self, key: Key) {
        match self.mode {
            Mode::Command => self.handle_command_key(key),
            Mode::Insert => insert::handle_insert_key(self, key),
            Mode::Normal | Mode::Visual | Mode::VisualLine => self.handle_normal_key(key),
        }
    }

    fn handle_command_key(&mut self, key: Key) {
        match key {
            Key::Esc => {
                self.cmdline.clear();
                self.mode = Mode::Normal;
            }
            Key::Backspace => {
                self.cmdline.pop();
            }
            Key::Enter => {
                let line = std::mem::take(&mut self.cmdline);
                self.mode = Mode::Normal;
                command::execute_command_line(self, &line);
            }
            Key::Char(c) if (' '..='~').contains(&c) => self.cmdline.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: Key) {
        // Ctrl-W prefix consumes exactly the next key when it names a focus
        // action; anything else falls through to normal handling.
        if self.decoder.ctrl_w {
            self.decoder.ctrl_w = false;
            if let Key::Char(c) = key {
                match c {
                    'h' | 'j' | 'k' | 'l' => {
                        panes::focus_direction(self, c);
                        return;
                    }
                    'w' => {
                        panes::focus_next(self);
                        return;
                    }
                    _ => {}
                }
            }
        }

        // Count digits accumulate without disturbing latches or a pending
        // operator (`2gg`, `d2w`). A bare 0 falls through as the line-start
        // motion.
        if let Key::Char(c @ '0'..='9') = key {
            if c != '0' || self.decoder.has_count() {
                self.decoder.consume_digit(c);
                return;
            }
        }

        let is_latch_char = matches!(key, Key::Char('d' | 'y' | 'g' | '>' | '<'));
        if !is_latch_char {
            self.decoder.reset_latches();
        }
        // The pending operator clears only when its motion is satisfied, on
        // a mode change, or on Escape; other intervening keys leave it
        // latched in place.
        let pending = self.decoder.pending_op;

        match key {
            Key::Ctrl('w') => {
                self.decoder.ctrl_w = true;
                return;
            }
            Key::Ctrl('r') => {
                edit::redo(self);
            }
            Key::Ctrl('d') => motion::scroll_half_page_down(self),
            Key::Ctrl('u') => motion::scroll_half_page_up(self),
            Key::Esc => {
                if self.visual_active {
                    visual::exit_visual(self);
                }
                self.decoder.reset();
                return;
            }
            Key::Left => self.repeat_motion(motion::move_left),
            Key::Right => self.repeat_motion(motion::move_right),
            Key::Up => self.repeat_motion(motion::move_up),
            Key::Down => self.repeat_motion(motion::move_down),
            Key::Char(c) => match c {
                '0' => motion::move_to_line_start(self),
                'h' => self.repeat_motion(motion::move_left),
                'j' => self.repeat_motion(motion::move_down),
                'k' => self.repeat_motion(motion::move_up),
                'l' => self.repeat_motion(motion::move_right),
                'x' => edit::delete_char_under_cursor(self),
                'i' => {
                    self.decoder.pending_op = None;
                    self.begin_group();
                    self.mode = Mode::Insert;
                }
                'a' => {
                    self.decoder.pending_op = None;
                    self.begin_group();
                    let mut cur = self.cursor();
                    let len = self.ws.doc().borrow().store.line_len(cur.row);
                    cur.col = (cur.col + 1).min(len);
                    self.set_cursor(cur);
                    self.mode = Mode::Insert;
                }
                'o' => {
                    self.decoder.pending_op = None;
                    insert::open_line_below(self);
                }
                'O' => {
                    self.decoder.pending_op = None;
                    insert::open_line_above(self);
                }
                '.' => {
                    repeat::repeat_last_change(self);
                    self.decoder.reset();
                }
                ':' => {
                    self.decoder.pending_op = None;
                    self.mode = Mode::Command;
                    self.cmdline.clear();
                }
                '/' => {
                    self.decoder.pending_op = None;
                    self.mode = Mode::Command;
                    self.cmdline = "/".to_string();
                }
                '?' => {
                    self.decoder.pending_op = None;
                    self.mode = Mode::Command;
                    self.cmdline = "?".to_string();
                }
                'v' => {
                    if self.visual_active {
                        visual::exit_visual(self);
                    } else {
                        visual::enter_visual_char(self);
                    }
                }
                'V' => {
                    if self.visual_active {
                        visual::exit_visual(self);
                    } else {
                        visual::enter_visual_line(self);
                    }
                }
                'u' => edit::undo(self),
                'd' => {
                    if self.visual_active {
                        visual::delete_selection(self);
                        visual::exit_visual(self);
                    } else if self.decoder.latch('d') {
                        let n = self.decoder.take_count_or(1);
                        let row = self.cursor().row;
                        self.begin_group();
                        edit::delete_lines_range(self, row, n);
                        self.commit_group();
                        self.decoder.reset_latches();
                        self.decoder.pending_op = None;
                    } else {
                        self.decoder.pending_op = Some(Operator::Delete);
                        return;
                    }
                }
                'y' => {
                    if self.visual_active {
                        visual::yank_selection(self);
                        visual::exit_visual(self);
                    } else if self.decoder.latch('y') {
                        let n = self.decoder.take_count_or(1);
                        let row = self.cursor().row;
                        edit::yank_lines(self, row, n);
                        self.decoder.reset_latches();
                        self.decoder.pending_op = None;
                    } else {
                        self.decoder.pending_op = Some(Operator::Yank);
                        return;
                    }
                }
                'p' => edit::paste_below(self),
                'g' => {
                    if self.decoder.latch('g') {
                        let n = self.decoder.take_count();
                        if n == 0 {
                            motion::move_to_top(self);
                        } else {
                            motion::jump_to_line(self, n - 1);
                        }
                    } else {
                        return;
                    }
                }
                'G' => {
                    let n = self.decoder.take_count();
                    if n == 0 {
                        motion::move_to_bottom(self);
                    } else {
                        motion::jump_to_line(self, n - 1);
                    }
                }
                'w' => {
                    let n = self.decoder.take_count_or(1);
                    match pending {
                        Some(Operator::Delete) => {
                            for _ in 0..n {
                                edit::delete_to_next_word(self);
                            }
                            self.decoder.pending_op = None;
                        }
                        Some(Operator::Yank) => {
                            for _ in 0..n {
                                edit::yank_to_next_word(self);
                            }
                            self.decoder.pending_op = None;
                        }
                        _ => {
                            for _ in 0..n {
                                motion::word_forward(self);
                            }
                        }
                    }
                }
                'e' => {
                    let n = self.decoder.take_count_or(1);
                    match pending {
                        Some(Operator::Delete) => {
                            for _ in 0..n {
                                edit::delete_to_word_end(self);
                            }
                            self.decoder.pending_op = None;
                        }
                        Some(Operator::Yank) => {
                            for _ in 0..n {
                                edit::yank_to_word_end(self);
                            }
                            self.decoder.pending_op = None;
                        }
                        _ => {
                            for _ in 0..n {
                                motion::word_end(self);
                            }
                        }
                    }
                }
                'b' => self.repeat_motion(motion::word_backward),
                '^' => motion::move_to_line_start(self),
                '$' => motion::move_to_line_end(self),
                'n' => {
                    let n = self.decoder.take_count_or(1);
                    let forward = self.last_search_forward;
                    for _ in 0..n {
                        search::repeat_last_search(self, forward);
                    }
                }
                'N' => {
                    let n = self.decoder.take_count_or(1);
                    let forward = !self.last_search_forward;
                    for _ in 0..n {
                        search::repeat_last_search(self, forward);
                    }
                }
                '>' => {
                    if self.visual_active {
                        let (r0, r1, _, _) = visual::visual_range(self);
                        self.begin_group();
                        edit::indent_lines(self, r0, r1 - r0 + 1);
                        self.commit_group();
                        visual::exit_visual(self);
                        self.decoder.reset();
                    } else if self.decoder.latch('>') {
                        let n = self.decoder.take_count_or(1);
                        let row = self.cursor().row;
                        self.begin_group();
                        edit::indent_lines(self, row, n);
                        self.commit_group();
                        self.decoder.reset_latches();
                        self.decoder.pending_op = None;
                    } else {
                        self.decoder.pending_op = Some(Operator::Indent);
                        return;
                    }
                }
                '<' => {
                    if self.visual_active {
                        let (r0, r1, _, _) = visual::visual_range(self);
                        self.begin_group();
                        edit::dedent_lines(self, r0, r1 - r0 + 1);
                        self.commit_group();
                        visual::exit_visual(self);
                        self.decoder.reset();
                    } else if self.decoder.latch('<') {
                        let n = self.decoder.take_count_or(1);
                        let row = self.cursor().row;
                        self.begin_group();
                        edit::dedent_lines(self, row, n);
                        self.commit_group();
                        self.decoder.reset_latches();
                        self.decoder.pending_op = None;
                    } else {
                        self.decoder.pending_op = Some(Operator::Dedent);
                        return;
                    }
                }
                other => {
                    debug!(target: "actions.dispatch", key = %other, "unbound_normal_key");
                    self.decoder.reset();
                }
            },
            _ => {}
        }
        self.decoder.clear_count();
    }

    fn repeat_motion(&mut self, f: fn(&mut Editor)) {
        let n = self.decoder.take_count_or(1);
        for _ in 0..n {
            f(self);
        }
    }

    // Undo-group plumbing shared by every edit path.

    pub(crate) fn begin_group(&mut self) {
        let cur = self.cursor();
        self.ws.doc().borrow_mut().begin_group(cur);
    }

    pub(crate) fn commit_group(&mut self) {
        let cur = self.cursor();
        self.ws.doc().borrow_mut().commit_group(cur);
    }

    /// Run one rc or command-line string as if typed after `:`.
    pub fn run_command(&mut self, line: &str) {
        command::execute_command_line(self, line);
    }

    /// Runtime entry point for decoded mouse gestures.
    pub fn handle_mouse(&mut self, gesture: MouseGesture, row: u16, col: u16) {
        if self.options.enable_mouse {
            panes::handle_mouse(self, gesture, row, col);
        }
    }
}
