//! Colon command registry, options, panes, and file round trips.

mod common;
use common::*;

use core_actions::Editor;
use core_state::{Mode, Options};
use core_terminal::PaletteColor;
use core_text::{Backend, Position};

fn colon(ed: &mut Editor, line: &str) {
    ed.run_command(line);
}

#[test]
fn set_commands_toggle_and_parse() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "set number");
    assert!(ed.options.show_numbers);
    assert_eq!(ed.message, "number on");
    colon(&mut ed, "set number off");
    assert!(!ed.options.show_numbers);

    colon(&mut ed, "set tabwidth 8");
    assert_eq!(ed.options.tab_width, 8);
    assert_eq!(ed.message, "tabwidth=8");
    colon(&mut ed, "set tabwidth nope");
    assert_eq!(ed.message, "set tabwidth: width must be a number");
    colon(&mut ed, "set tabwidth 0");
    assert_eq!(ed.message, "set tabwidth: width must be >= 1");

    colon(&mut ed, "set pair on");
    assert!(ed.options.auto_pair);
    colon(&mut ed, "set onemore");
    assert!(ed.options.onemore);
    colon(&mut ed, "set mouse on");
    assert!(ed.options.enable_mouse);
    colon(&mut ed, "set autoindent on");
    assert!(ed.options.auto_indent);
    colon(&mut ed, "set color on");
    assert!(ed.options.enable_color);
}

#[test]
fn set_equals_sugar_matches_spaced_form() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "set tabwidth=2");
    assert_eq!(ed.options.tab_width, 2);
    colon(&mut ed, "set number=on");
    assert!(ed.options.show_numbers);
}

#[test]
fn color_names_map_to_palette() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "set background blue");
    assert_eq!(ed.background, PaletteColor::Blue);
    assert_eq!(ed.message, "background=blue");
    colon(&mut ed, "set searchcolor yellow");
    assert_eq!(ed.search_color, PaletteColor::Yellow);
    colon(&mut ed, "set background lavender");
    assert_eq!(ed.message, "set background: unknown color");
}

#[test]
fn unknown_commands_report() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "frobnicate now");
    assert_eq!(ed.message, "unknown command: frobnicate");
    colon(&mut ed, "set nosuch thing");
    assert_eq!(ed.message, "unknown command: set nosuch");
}

#[test]
fn backend_reports_configured_store() {
    let mut ed = editor_with_backend(Backend::Gap, &["x"]);
    colon(&mut ed, "backend");
    assert_eq!(ed.message, "backend=gap");
}

#[test]
fn quit_refuses_dirty_then_forces() {
    let mut ed = editor_with(&["x"]);
    feed(&mut ed, "ddi hello\x1b");
    assert!(ed.ws.doc().borrow().dirty);
    colon(&mut ed, "q");
    assert!(!ed.should_quit);
    assert_eq!(ed.message, "have unsaved changes, use :q! or :w");
    colon(&mut ed, "q!");
    assert!(ed.should_quit);
}

#[test]
fn write_then_quit_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let mut ed = editor_with(&["first", "second"]);
    feed(&mut ed, "x");
    assert!(ed.ws.doc().borrow().dirty);

    colon(&mut ed, &format!("w {}", path.display()));
    assert!(!ed.ws.doc().borrow().dirty, "{}", ed.message);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "irst\nsecond");

    colon(&mut ed, "q");
    assert!(ed.should_quit, "clean document quits");
}

#[test]
fn wq_without_path_or_changes() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "wq");
    assert!(ed.should_quit);
    assert_eq!(ed.message, "dont have path, and no changes, quit");

    let mut ed = editor_with(&["x"]);
    feed(&mut ed, "x");
    colon(&mut ed, "wq");
    assert!(!ed.should_quit);
    assert_eq!(ed.message, "dont have path: use :wq <path>");
}

#[test]
fn vsplit_without_path_shares_the_document() {
    let mut ed = editor_with(&["shared"]);
    colon(&mut ed, "vsplit");
    assert_eq!(ed.ws.pane_count(), 2);
    // Edit through the new pane; the first pane sees it.
    feed(&mut ed, "iX\x1b");
    colon(&mut ed, "focus 1");
    assert_eq!(buffer_text(&ed), ["Xshared"]);
    // Close the second pane; the document survives in the first.
    colon(&mut ed, "focus 2");
    colon(&mut ed, "close");
    assert_eq!(ed.ws.pane_count(), 1);
    assert_eq!(buffer_text(&ed), ["Xshared"]);
}

#[test]
fn close_refuses_last_pane() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "close");
    assert_eq!(ed.ws.pane_count(), 1);
    assert_eq!(ed.message, "cannot close last pane");
}

#[test]
fn edit_same_path_in_two_panes_dedupes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dedupe.txt");
    std::fs::write(&path, "content\n").unwrap();

    let mut ed = Editor::new(Backend::Vector, Options::default(), Some(path.clone()));
    colon(&mut ed, &format!("vsplit {}", path.display()));
    assert_eq!(ed.ws.pane_count(), 2);

    feed(&mut ed, "iZ\x1b");
    colon(&mut ed, "focus 1");
    assert_eq!(buffer_text(&ed), ["Zcontent", ""], "same Document in both panes");
}

#[test]
fn edit_extra_paths_open_vertical_splits() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "aaa").unwrap();
    std::fs::write(&b, "bbb").unwrap();

    let mut ed = editor_with(&["scratch"]);
    colon(&mut ed, &format!("edit {} {}", a.display(), b.display()));
    assert_eq!(ed.ws.pane_count(), 2);
    assert_eq!(buffer_text(&ed), ["bbb"], "active pane holds the last split");
    colon(&mut ed, "focus 1");
    assert_eq!(buffer_text(&ed), ["aaa"]);
}

#[test]
fn search_commands_move_and_highlight() {
    let mut ed = editor_with(&["alpha beta", "beta gamma", "delta"]);
    colon(&mut ed, "/beta");
    assert_eq!(cursor(&ed), Position::new(0, 6));
    assert_eq!(ed.search_hits.len(), 2);
    assert!(ed.message.starts_with("matches:2"));

    feed(&mut ed, "n");
    assert_eq!(cursor(&ed), Position::new(1, 0));
    feed(&mut ed, "n");
    assert_eq!(ed.message, "not found pattern", "no wraparound");
    feed(&mut ed, "N");
    assert_eq!(cursor(&ed), Position::new(0, 6));
}

#[test]
fn search_empty_pattern_reports() {
    let mut ed = editor_with(&["x"]);
    colon(&mut ed, "/");
    assert_eq!(ed.message, "pattern empty");
    feed(&mut ed, "n");
    assert_eq!(ed.message, "no last search");
}

#[test]
fn command_mode_escape_cancels() {
    let mut ed = editor_with(&["abc"]);
    feed(&mut ed, ":dd");
    assert_eq!(ed.mode, Mode::Command);
    assert_eq!(ed.cmdline, "dd");
    feed(&mut ed, "\x1b");
    assert_eq!(ed.mode, Mode::Normal);
    assert_eq!(buffer_text(&ed), ["abc"], "cancelled command does nothing");

    feed(&mut ed, ":q!\n");
    assert!(ed.should_quit);
}
