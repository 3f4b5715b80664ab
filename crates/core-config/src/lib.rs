//! Startup configuration.
//!
//! Two inputs, applied in order:
//!
//! 1. `vix.toml` (working directory first, then the platform config dir)
//!    selects the store backend and option defaults. Unknown fields are
//!    ignored and a parse error falls back to defaults so a broken config
//!    never blocks startup.
//! 2. `~/.vixrc` holds colon-command lines executed at startup through the
//!    same dispatcher the user types into. Blank lines and lines starting
//!    with `#`, `"`, or `//` are comments; a leading `:` is optional.

use std::path::{Path, PathBuf};

use anyhow::Result;
use core_state::Options;
use core_text::Backend;
use serde::Deserialize;
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "vix.toml";
pub const RC_FILE: &str = ".vixrc";

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EditorConfig {
    #[serde(default)]
    pub tabwidth: Option<usize>,
    #[serde(default)]
    pub number: Option<bool>,
    #[serde(default)]
    pub relativenumber: Option<bool>,
    #[serde(default)]
    pub autoindent: Option<bool>,
    #[serde(default)]
    pub pair: Option<bool>,
    #[serde(default)]
    pub onemore: Option<bool>,
    #[serde(default)]
    pub mouse: Option<bool>,
    #[serde(default)]
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

#[derive(Debug, Default, Clone)]
pub struct Config {
    pub file: ConfigFile,
}

/// Best-effort config path: local `vix.toml` first, then the platform
/// config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vix").join(CONFIG_FILE);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(Config { file })
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

impl Config {
    /// Backend selected by the config, or the default when absent/unknown.
    pub fn backend(&self) -> Backend {
        match &self.file.store.backend {
            Some(name) => match name.parse::<Backend>() {
                Ok(backend) => backend,
                Err(e) => {
                    warn!(target: "config", error = %e, "backend_fallback_to_default");
                    Backend::default()
                }
            },
            None => Backend::default(),
        }
    }

    /// Fold config defaults into freshly constructed options.
    pub fn apply_options(&self, opts: &mut Options) {
        let e = &self.file.editor;
        if let Some(w) = e.tabwidth {
            opts.tab_width = w.max(1);
        }
        if let Some(v) = e.number {
            opts.show_numbers = v;
        }
        if let Some(v) = e.relativenumber {
            opts.relative_numbers = v;
        }
        if let Some(v) = e.autoindent {
            opts.auto_indent = v;
        }
        if let Some(v) = e.pair {
            opts.auto_pair = v;
        }
        if let Some(v) = e.onemore {
            opts.onemore = v;
        }
        if let Some(v) = e.mouse {
            opts.enable_mouse = v;
        }
        if let Some(v) = e.color {
            opts.enable_color = v;
        }
    }
}

/// Location of the rc file in the user's home directory.
pub fn rc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(RC_FILE))
}

/// Read rc commands from `path`: trimmed, comments and blanks dropped, the
/// optional leading `:` stripped. Missing file means no commands.
pub fn load_rc_commands(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter_map(|raw| {
            let line = raw.trim();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with('"')
                || line.starts_with("//")
            {
                return None;
            }
            Some(line.strip_prefix(':').unwrap_or(line).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_yields_defaults() {
        let cfg = load_from(Some(PathBuf::from("__no_such_vix_config__.toml"))).unwrap();
        assert_eq!(cfg.backend(), Backend::Rope);
        let mut opts = Options::default();
        cfg.apply_options(&mut opts);
        assert_eq!(opts.tab_width, 4);
    }

    #[test]
    fn parses_backend_and_editor_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[store]\nbackend = \"gap\"\n[editor]\ntabwidth = 8\nnumber = true\npair = true\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.backend(), Backend::Gap);
        let mut opts = Options::default();
        cfg.apply_options(&mut opts);
        assert_eq!(opts.tab_width, 8);
        assert!(opts.show_numbers);
        assert!(opts.auto_pair);
        assert!(!opts.onemore, "untouched options keep their defaults");
    }

    #[test]
    fn broken_toml_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[store\nbackend=???").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.backend(), Backend::Rope);
    }

    #[test]
    fn unknown_backend_name_falls_back() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[store]\nbackend = \"piece\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.backend(), Backend::Rope);
    }

    #[test]
    fn rc_lines_skip_comments_and_strip_colon() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "# comment\n\" vim style comment\n// slashes\n\n  :set number\nset tabwidth 2\n",
        )
        .unwrap();
        let cmds = load_rc_commands(tmp.path());
        assert_eq!(cmds, ["set number", "set tabwidth 2"]);
    }

    #[test]
    fn rc_missing_file_is_empty() {
        assert!(load_rc_commands(Path::new("/definitely/not/here/.vixrc")).is_empty());
    }
}
