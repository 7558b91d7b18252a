//! XDG-style locations for the config file and the database.

use std::path::PathBuf;

const APP_DIR: &str = "subtranslate";

/// `$XDG_CONFIG_HOME/subtranslate`, falling back to `~/.config/subtranslate`.
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/subtranslate`, falling back to `~/.cache/subtranslate`.
pub fn cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    let base = std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map_or_else(|| home_dir().join(home_fallback), PathBuf::from);
    base.join(APP_DIR)
}

/// Home directory; the working directory when it cannot be determined.
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
