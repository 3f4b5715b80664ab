//! Colon command surface.
//!
//! The line after `:` splits on whitespace; the first token selects a
//! handler, the rest are arguments. `set name=value …` is sugar for
//! `set name value …`. Search lines (`/pat`, `?pat`) bypass the registry.
//! Unknown names produce a status message, never an error path.

use std::path::PathBuf;

use core_model::Orientation;
use core_terminal::PaletteColor;

use crate::{io_ops, panes, search, Editor};

type Handler = fn(&mut Editor, &[String]);

const COMMANDS: &[(&str, Handler)] = &[
    ("w", cmd_write),
    ("q", cmd_quit),
    ("q!", cmd_quit_force),
    ("wq", cmd_write_quit),
    ("set number", cmd_set_number),
    ("set relativenumber", cmd_set_relativenumber),
    ("set pair", cmd_set_pair),
    ("set tabwidth", cmd_set_tabwidth),
    ("set color", cmd_set_color),
    ("set background", cmd_set_background),
    ("set searchcolor", cmd_set_searchcolor),
    ("set onemore", cmd_set_onemore),
    ("set mouse", cmd_set_mouse),
    ("set autoindent", cmd_set_autoindent),
    ("backend", cmd_backend),
    ("vsplit", cmd_vsplit),
    ("vsp", cmd_vsplit),
    ("hsplit", cmd_hsplit),
    ("split", cmd_hsplit),
    ("sp", cmd_hsplit),
    ("close", cmd_close),
    ("focus", cmd_focus),
    ("edit", cmd_edit),
];

fn execute(ed: &mut Editor, name: &str, args: &[String]) -> bool {
    for (cmd, handler) in COMMANDS {
        if *cmd == name {
            handler(ed, args);
            return true;
        }
    }
    false
}

/// Run one command line (without the `:` prompt). Also the entry point for
/// rc-file lines and startup commands.
pub fn execute_command_line(ed: &mut Editor, line: &str) {
    if let Some(pattern) = line.strip_prefix('/') {
        let pattern = pattern.to_string();
        ed.last_search = pattern.clone();
        ed.last_search_forward = true;
        search::search_forward(ed, &pattern);
        search::recompute_search_hits(ed, &pattern);
        return;
    }
    if let Some(pattern) = line.strip_prefix('?') {
        let pattern = pattern.to_string();
        ed.last_search = pattern.clone();
        ed.last_search_forward = false;
        search::search_backward(ed, &pattern);
        search::recompute_search_hits(ed, &pattern);
        return;
    }
    let mut tokens = line.split_whitespace().map(str::to_string);
    let Some(cmd) = tokens.next() else {
        return;
    };
    let args: Vec<String> = tokens.collect();
    if cmd == "set" && !args.is_empty() {
        // `set name=value rest…` becomes `set name` with `[value, rest…]`.
        let (name, value) = match args[0].split_once('=') {
            Some((n, v)) => (n.to_string(), Some(v.to_string())),
            None => (args[0].clone(), None),
        };
        let composite = format!("set {name}");
        let mut subargs = Vec::new();
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            subargs.push(v);
        }
        subargs.extend_from_slice(&args[1..]);
        if !execute(ed, &composite, &subargs) {
            ed.set_message(format!("unknown command: {composite}"));
        }
        return;
    }
    if !execute(ed, &cmd, &args) {
        ed.set_message(format!("unknown command: {cmd}"));
    }
}

fn cmd_write(ed: &mut Editor, args: &[String]) {
    let target = args.first().map(PathBuf::from);
    let doc = ed.ws.doc();
    let (_, msg) = io_ops::write_document(&mut doc.borrow_mut(), target.as_deref());
    ed.set_message(msg);
}

fn cmd_quit(ed: &mut Editor, _args: &[String]) {
    panes::close_or_quit(ed, false);
}

fn cmd_quit_force(ed: &mut Editor, _args: &[String]) {
    panes::close_or_quit(ed, true);
}

fn cmd_write_quit(ed: &mut Editor, args: &[String]) {
    let doc = ed.ws.doc();
    let has_path = doc.borrow().path.is_some();
    let dirty = doc.borrow().dirty;
    let target = args.first().map(PathBuf::from);
    if has_path || target.is_some() {
        let (ok, msg) = io_ops::write_document(&mut doc.borrow_mut(), target.as_deref());
        ed.set_message(msg);
        if ok {
            panes::close_or_quit(ed, true);
        }
    } else if !dirty {
        panes::close_or_quit(ed, true);
        ed.set_message("dont have path, and no changes, quit");
    } else {
        ed.set_message("dont have path: use :wq <path>");
    }
}

fn toggle_or_set(
    ed: &mut Editor,
    args: &[String],
    field: fn(&mut Editor) -> &mut bool,
    label: &str,
    usage: &str,
) {
    match args.first().map(String::as_str) {
        None => {
            let v = field(ed);
            *v = !*v;
            let on = *v;
            ed.set_message(format!("{label} {}", if on { "on" } else { "off" }));
        }
        Some("on") => {
            *field(ed) = true;
            ed.set_message(format!("{label} on"));
        }
        Some("off") => {
            *field(ed) = false;
            ed.set_message(format!("{label} off"));
        }
        Some(_) => ed.set_message(usage.to_string()),
    }
}

fn cmd_set_number(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.show_numbers,
        "number",
        "set number: use :set number on|off",
    );
}

fn cmd_set_relativenumber(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.relative_numbers,
        "relativenumber",
        "set relativenumber: use :set relativenumber on|off",
    );
}

fn cmd_set_pair(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.auto_pair,
        "auto-pair",
        "set pair: use :set pair on|off",
    );
}

fn cmd_set_onemore(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.onemore,
        "onemore",
        "set onemore: use :set onemore on|off",
    );
}

fn cmd_set_mouse(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.enable_mouse,
        "mouse",
        "set mouse: use :set mouse on|off",
    );
}

fn cmd_set_autoindent(ed: &mut Editor, args: &[String]) {
    toggle_or_set(
        ed,
        args,
        |e| &mut e.options.auto_indent,
        "autoindent",
        "set autoindent: use :set autoindent on|off",
    );
}

fn cmd_set_tabwidth(ed: &mut Editor, args: &[String]) {
    let Some(arg) = args.first() else {
        ed.set_message("set tabwidth: use :set tabwidth <width>");
        return;
    };
    match arg.parse::<usize>() {
        Ok(w) if w >= 1 => {
            ed.options.tab_width = w;
            ed.set_message(format!("tabwidth={w}"));
        }
        Ok(_) => ed.set_message("set tabwidth: width must be >= 1"),
        Err(_) => ed.set_message("set tabwidth: width must be a number"),
    }
}

fn cmd_set_color(ed: &mut Editor, args: &[String]) {
    match args.first().map(String::as_str) {
        Some("on" | "1" | "true") => {
            ed.options.enable_color = true;
            ed.set_message("color on");
        }
        Some("off" | "0" | "false") => {
            ed.options.enable_color = false;
            ed.set_message("color off");
        }
        _ => ed.set_message("set color: use :set color on|off"),
    }
}

fn cmd_set_background(ed: &mut Editor, args: &[String]) {
    let Some(name) = args.first() else {
        ed.set_message("set background: use :set background default|black|white|red|green|blue|yellow|magenta|cyan");
        return;
    };
    let name = name.to_lowercase();
    match PaletteColor::from_name(&name) {
        Some(color) => {
            ed.background = color;
            ed.set_message(format!("background={name}"));
        }
        None => ed.set_message("set background: unknown color"),
    }
}

fn cmd_set_searchcolor(ed: &mut Editor, args: &[String]) {
    let Some(name) = args.first() else {
        ed.set_message("set searchcolor: use :set searchcolor default|black|white|red|green|blue|yellow|magenta|cyan");
        return;
    };
    let name = name.to_lowercase();
    match PaletteColor::from_name(&name) {
        Some(color) => {
            ed.search_color = color;
            ed.set_message(format!("searchhl={name}"));
        }
        None => ed.set_message("set searchhl: unknown color"),
    }
}

fn cmd_backend(ed: &mut Editor, _args: &[String]) {
    let name = ed.ws.doc().borrow().store.backend_name();
    ed.set_message(format!("backend={name}"));
}

fn cmd_vsplit(ed: &mut Editor, args: &[String]) {
    let path = args.first().map(PathBuf::from);
    panes::split(ed, Orientation::Vertical, path.as_deref());
}

fn cmd_hsplit(ed: &mut Editor, args: &[String]) {
    let path = args.first().map(PathBuf::from);
    panes::split(ed, Orientation::Horizontal, path.as_deref());
}

fn cmd_close(ed: &mut Editor, _args: &[String]) {
    if !panes::close_active_pane(ed) {
        ed.set_message("cannot close last pane");
    }
}

fn cmd_focus(ed: &mut Editor, args: &[String]) {
    let parsed = args.first().and_then(|a| a.parse::<usize>().ok());
    match parsed {
        Some(n) if n >= 1 => panes::set_active_pane(ed, n - 1),
        _ => ed.set_message("focus <index>"),
    }
}

fn cmd_edit(ed: &mut Editor, args: &[String]) {
    let Some(first) = args.first() else {
        ed.set_message("edit <file> [more files]");
        return;
    };
    let active = ed.ws.active_id();
    panes::open_path_in_pane(ed, active, &PathBuf::from(first));
    for extra in &args[1..] {
        panes::split(ed, Orientation::Vertical, Some(&PathBuf::from(extra)));
    }
}
