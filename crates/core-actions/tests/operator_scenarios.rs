//! Counts, operators, latches, and line-range edits through the key path.

mod common;
use common::*;

use core_text::Position;

#[test]
fn counts_apply_to_motions() {
    let mut ed = editor_with(&["a", "b", "c", "d", "e"]);
    feed(&mut ed, "3j");
    assert_eq!(cursor(&ed), Position::new(3, 0));
    feed(&mut ed, "2k");
    assert_eq!(cursor(&ed), Position::new(1, 0));
    feed(&mut ed, "10j");
    assert_eq!(cursor(&ed), Position::new(4, 0), "clamped at last line");
}

#[test]
fn zero_is_motion_without_count_and_digit_with() {
    let mut ed = editor_with(&["abcdefghijklm"]);
    set_cursor(&mut ed, 0, 5);
    feed(&mut ed, "0");
    assert_eq!(cursor(&ed), Position::new(0, 0), "bare 0 goes to column 0");

    feed(&mut ed, "10l");
    assert_eq!(cursor(&ed), Position::new(0, 10), "0 after 1 is a count digit");
}

#[test]
fn count_dd_deletes_block_and_undoes_as_unit() {
    let mut ed = editor_with(&["1", "2", "3", "4", "5"]);
    feed(&mut ed, "3dd");
    assert_eq!(buffer_text(&ed), ["4", "5"]);
    assert_eq!(ed.register.lines, ["1", "2", "3"]);

    feed(&mut ed, "u");
    assert_eq!(buffer_text(&ed), ["1", "2", "3", "4", "5"]);
    press(&mut ed, core_input::Key::Ctrl('r'));
    assert_eq!(buffer_text(&ed), ["4", "5"]);
}

#[test]
fn count_yy_then_paste() {
    let mut ed = editor_with(&["x", "y", "z"]);
    feed(&mut ed, "2yy");
    assert_eq!(ed.register.lines, ["x", "y"]);
    assert_eq!(buffer_text(&ed), ["x", "y", "z"], "yank does not mutate");
    feed(&mut ed, "p");
    assert_eq!(buffer_text(&ed), ["x", "x", "y", "y", "z"]);
}

#[test]
fn dw_and_de_operate_within_the_line() {
    let mut ed = editor_with(&["foo bar baz"]);
    feed(&mut ed, "dw");
    assert_eq!(buffer_text(&ed), [" bar baz"], "dw removes the word run");
    assert_eq!(ed.register.lines, ["foo"]);
    assert!(!ed.register.linewise);

    let mut ed = editor_with(&["  foo bar"]);
    feed(&mut ed, "dw");
    assert_eq!(buffer_text(&ed), ["foo bar"], "dw on spaces removes the space run");
    assert_eq!(ed.register.lines, ["  "]);

    let mut ed = editor_with(&["foo bar"]);
    feed(&mut ed, "de");
    assert_eq!(buffer_text(&ed), [" bar"], "de stops at the word end");
    assert_eq!(ed.register.lines, ["foo"]);
}

#[test]
fn yw_fills_register_without_mutation() {
    let mut ed = editor_with(&["foo bar"]);
    feed(&mut ed, "yw");
    assert_eq!(buffer_text(&ed), ["foo bar"]);
    assert_eq!(ed.register.lines, ["foo"]);
    set_cursor(&mut ed, 0, 3);
    feed(&mut ed, "yw");
    assert_eq!(ed.register.lines, [" "], "on the gap, yw takes the space run");
}

#[test]
fn pending_operator_survives_intervening_motion() {
    let mut ed = editor_with(&["foo bar", "second one"]);
    feed(&mut ed, "d");
    feed(&mut ed, "j");
    assert_eq!(
        buffer_text(&ed),
        ["foo bar", "second one"],
        "d then j deletes nothing yet"
    );
    // j is not the operator's motion, so the delete stays pending and the
    // next w satisfies it at the new position.
    feed(&mut ed, "w");
    assert_eq!(buffer_text(&ed), ["foo bar", " one"]);
    assert_eq!(ed.register.lines, ["second"]);
}

#[test]
fn escape_cancels_pending_operator() {
    let mut ed = editor_with(&["foo bar"]);
    feed(&mut ed, "d\x1bw");
    assert_eq!(buffer_text(&ed), ["foo bar"], "w after Escape is a plain motion");
    assert_eq!(cursor(&ed), Position::new(0, 4));
}

#[test]
fn mode_change_cancels_pending_operator() {
    let mut ed = editor_with(&["foo bar"]);
    feed(&mut ed, "di\x1b");
    feed(&mut ed, "w");
    assert_eq!(buffer_text(&ed), ["foo bar"], "entering Insert dropped the operator");
    assert_eq!(cursor(&ed), Position::new(0, 4));
}

#[test]
fn count_between_operator_and_motion() {
    let mut ed = editor_with(&["one two three four"]);
    feed(&mut ed, "d2w");
    // First pass removes the word, second removes the space run it exposed.
    assert_eq!(buffer_text(&ed), ["two three four"]);
}

#[test]
fn count_prefixed_gg_jump() {
    let mut ed = editor_with(&["a", "b", "c", "d"]);
    feed(&mut ed, "2gg");
    assert_eq!(cursor(&ed), Position::new(1, 0));
}

#[test]
fn gg_and_g_jumps() {
    let mut ed = editor_with(&["a", "b", "c", "d"]);
    feed(&mut ed, "G");
    assert_eq!(cursor(&ed), Position::new(3, 0));
    feed(&mut ed, "gg");
    assert_eq!(cursor(&ed), Position::new(0, 0));
    feed(&mut ed, "3gg");
    assert_eq!(cursor(&ed), Position::new(2, 0), "count is a 1-based line");
    feed(&mut ed, "99G");
    assert_eq!(cursor(&ed), Position::new(3, 0), "clamped");
}

#[test]
fn indent_and_dedent_with_counts() {
    let mut ed = editor_with(&["one", "two", "three"]);
    feed(&mut ed, "2>>");
    assert_eq!(buffer_text(&ed), ["    one", "    two", "three"]);

    feed(&mut ed, "u");
    assert_eq!(buffer_text(&ed), ["one", "two", "three"], "count indent is one group");

    feed(&mut ed, "2>>");
    feed(&mut ed, "<<");
    assert_eq!(buffer_text(&ed), ["one", "    two", "three"]);
}

#[test]
fn dedent_tab_counts_full_width_and_stops() {
    let mut ed = editor_with(&["\tword", "  \tmix", "nolead"]);
    feed(&mut ed, "3<<");
    // A tab is worth tab_width columns and terminates the removal; plain
    // spaces strip one column each, and a tab that follows them still goes.
    assert_eq!(buffer_text(&ed), ["word", "mix", "nolead"]);
}

#[test]
fn visual_indent_uses_selection_rows() {
    let mut ed = editor_with(&["a", "b", "c"]);
    feed(&mut ed, "Vj>");
    assert_eq!(buffer_text(&ed), ["    a", "    b", "c"]);
    assert_eq!(ed.mode, core_state::Mode::Normal, "visual exits after the operator");
}

#[test]
fn charwise_single_line_paste_after_cursor() {
    let mut ed = editor_with(&["abc"]);
    ed.register.set_charwise("XY".to_string());
    feed(&mut ed, "p");
    assert_eq!(buffer_text(&ed), ["aXYbc"], "paste lands after the cursor byte");
}

#[test]
fn x_at_line_end_is_silent_noop() {
    let mut ed = editor_with(&["ab"]);
    set_cursor(&mut ed, 0, 2);
    feed(&mut ed, "x");
    assert_eq!(buffer_text(&ed), ["ab"]);
    assert!(!ed.ws.doc().borrow().log.can_undo(), "empty group was dropped");
}

#[test]
fn dollar_and_caret_motions() {
    let mut ed = editor_with(&["hello"]);
    feed(&mut ed, "$");
    assert_eq!(cursor(&ed), Position::new(0, 4));
    ed.options.onemore = true;
    feed(&mut ed, "$");
    assert_eq!(cursor(&ed), Position::new(0, 5), "onemore reaches the virtual column");
    feed(&mut ed, "^");
    assert_eq!(cursor(&ed), Position::new(0, 0));
}

#[test]
fn dedent_with_wide_tabwidth() {
    let mut ed = editor_with(&["        deep"]);
    ed.options.tab_width = 8;
    feed(&mut ed, "<<");
    assert_eq!(buffer_text(&ed), ["deep"]);
}
