//! vix entrypoint: argument parsing, logging, terminal setup, and the
//! single-threaded key loop (read, decode, mutate, render).

use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use core_actions::{Editor, MouseGesture};
use core_config as config;
use core_input::map_key_event;
use core_state::Options;
use core_terminal::CrosstermTerminal;
use core_text::Backend;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind,
};
use crossterm::execute;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "vix.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vix", version, about = "vix editor")]
struct Args {
    /// Files to open; the first lands in the initial pane, the rest open in
    /// vertical splits.
    pub paths: Vec<PathBuf>,
    /// Configuration file path (overrides discovery of `vix.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Store backend override: vector, gap, or rope.
    #[arg(long = "backend")]
    pub backend: Option<String>,
}

fn configure_logging() -> Result<WorkerGuard> {
    let log_path = std::path::Path::new(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(log_path);
    }
    let appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("VIX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Restore the terminal before the default panic report so the message is
/// readable outside the alternate screen.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);
        let _ = crossterm::terminal::disable_raw_mode();
        default_hook(info);
    }));
}

fn build_editor(args: &Args) -> Result<Editor> {
    let cfg = config::load_from(args.config.clone())?;
    let backend = match &args.backend {
        Some(name) => name.parse::<Backend>()?,
        None => cfg.backend(),
    };
    let mut options = Options::default();
    cfg.apply_options(&mut options);
    let mut editor = Editor::new(backend, options, args.paths.first().cloned());
    for extra in args.paths.iter().skip(1) {
        editor.run_command(&format!("vsplit {}", extra.display()));
    }
    if let Some(rc) = config::rc_path() {
        for cmd in config::load_rc_commands(&rc) {
            editor.run_command(&cmd);
        }
    }
    info!(
        target: "runtime",
        backend = ?editor.backend,
        panes = editor.ws.pane_count(),
        "editor_ready"
    );
    Ok(editor)
}

fn event_loop(term: &mut CrosstermTerminal, editor: &mut Editor) -> Result<()> {
    let mut mouse_captured = false;
    while !editor.should_quit {
        if editor.options.enable_mouse != mouse_captured {
            if editor.options.enable_mouse {
                execute!(stdout(), EnableMouseCapture)?;
            } else {
                execute!(stdout(), DisableMouseCapture)?;
            }
            mouse_captured = editor.options.enable_mouse;
        }
        core_render::render(term, editor);
        match crossterm::event::read()? {
            Event::Key(key_event) => {
                if let Some(key) = map_key_event(&key_event) {
                    editor.handle_key(key);
                }
            }
            Event::Mouse(mouse) => {
                let gesture = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(MouseGesture::LeftClick),
                    MouseEventKind::ScrollUp => Some(MouseGesture::WheelUp),
                    MouseEventKind::ScrollDown => Some(MouseGesture::WheelDown),
                    _ => None,
                };
                if let Some(gesture) = gesture {
                    editor.handle_mouse(gesture, mouse.row, mouse.column);
                }
            }
            Event::Resize(_, _) => {
                // The next render reads the new size.
            }
            _ => {}
        }
    }
    if mouse_captured {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging()?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut editor = build_editor(&args)?;
    let mut term = CrosstermTerminal::new();
    term.enter()?;
    let result = event_loop(&mut term, &mut editor);
    term.leave()?;
    info!(target: "runtime", "shutdown");
    result
}
