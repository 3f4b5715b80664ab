//! Undo/redo invariants driven through the full editor, across all three
//! store backends.

mod common;
use common::*;

use core_text::Backend;

const BACKENDS: [Backend; 3] = [Backend::Vector, Backend::Gap, Backend::Rope];

fn edit_script(ed: &mut core_actions::Editor) {
    feed(ed, "ihello\x1b");
    feed(ed, "oworld wide\x1b");
    set_cursor(ed, 1, 0);
    feed(ed, "dw");
    feed(ed, "yy");
    feed(ed, "p");
    feed(ed, "Vd");
    set_cursor(ed, 0, 0);
    feed(ed, ">>");
    feed(ed, "x");
}

#[test]
fn line_count_never_reaches_zero() {
    for backend in BACKENDS {
        let mut ed = editor_with_backend(backend, &["only"]);
        feed(&mut ed, "dd");
        assert_eq!(buffer_text(&ed), [""], "{backend:?}");
        feed(&mut ed, "dd");
        assert_eq!(buffer_text(&ed), [""], "{backend:?}");
        feed(&mut ed, "Vd");
        assert!(ed.ws.doc().borrow().line_count() >= 1, "{backend:?}");
    }
}

#[test]
fn k_undos_then_k_redos_restore_exactly() {
    for backend in BACKENDS {
        let mut ed = editor_with_backend(backend, &["seed line"]);
        edit_script(&mut ed);
        let final_text = buffer_text(&ed);
        let final_cursor = cursor(&ed);
        let depth = ed.ws.doc().borrow().log.undo_depth();
        assert!(depth >= 5, "script should commit several groups, got {depth}");

        for k in 1..=depth {
            let mut ed = editor_with_backend(backend, &["seed line"]);
            edit_script(&mut ed);
            for _ in 0..k {
                feed(&mut ed, "u");
            }
            for _ in 0..k {
                press(&mut ed, core_input::Key::Ctrl('r'));
            }
            assert_eq!(buffer_text(&ed), final_text, "{backend:?} k={k}");
            assert_eq!(cursor(&ed), final_cursor, "{backend:?} k={k}");
        }
    }
}

#[test]
fn full_unwind_returns_to_seed() {
    for backend in BACKENDS {
        let mut ed = editor_with_backend(backend, &["seed line"]);
        edit_script(&mut ed);
        for _ in 0..64 {
            feed(&mut ed, "u");
        }
        assert_eq!(buffer_text(&ed), ["seed line"], "{backend:?}");
    }
}

#[test]
fn redo_is_dead_after_a_new_edit() {
    let mut ed = editor_with(&["one", "two"]);
    feed(&mut ed, "dd");
    feed(&mut ed, "u");
    assert_eq!(buffer_text(&ed), ["one", "two"]);
    assert!(ed.ws.doc().borrow().log.can_redo());

    feed(&mut ed, "x");
    assert!(!ed.ws.doc().borrow().log.can_redo(), "edit cleared redo");
    let before = buffer_text(&ed);
    press(&mut ed, core_input::Key::Ctrl('r'));
    assert_eq!(buffer_text(&ed), before, "redo does nothing after an edit");
}

#[test]
fn backends_agree_on_full_editing_session() {
    let mut snapshots = Vec::new();
    for backend in BACKENDS {
        let mut ed = editor_with_backend(backend, &["alpha beta", "gamma delta", "epsilon"]);
        edit_script(&mut ed);
        feed(&mut ed, "uu");
        feed(&mut ed, "3dd");
        feed(&mut ed, "iz\x1b.");
        snapshots.push((buffer_text(&ed), cursor(&ed)));
    }
    assert_eq!(snapshots[0], snapshots[1], "vector vs gap");
    assert_eq!(snapshots[0], snapshots[2], "vector vs rope");
}

#[test]
fn untouched_rows_keep_exact_bytes() {
    let mut ed = editor_with(&["row zero", "row one", "row two", "row three"]);
    set_cursor(&mut ed, 1, 0);
    feed(&mut ed, "iEDIT\x1b");
    assert_eq!(buffer_text(&ed)[0], "row zero");
    assert_eq!(buffer_text(&ed)[2], "row two");
    assert_eq!(buffer_text(&ed)[3], "row three");
    set_cursor(&mut ed, 2, 0);
    feed(&mut ed, "dd");
    assert_eq!(buffer_text(&ed)[0], "row zero");
    assert_eq!(buffer_text(&ed)[2], "row three");
}
