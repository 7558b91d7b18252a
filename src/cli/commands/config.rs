//! `subtranslate config`: shows where configuration lives and what it resolves to.

use anyhow::Result;

use crate::cli::Args;
use crate::config::ConfigManager;
use crate::ui::Style;

use super::load_settings;

pub fn run_config(args: &Args, show: bool) -> Result<()> {
    let manager = ConfigManager::new();

    if !show {
        println!(
            "{} {}",
            Style::label("config file:"),
            manager.config_path().display()
        );
        println!("{}", Style::hint("Use --show to print the resolved configuration"));
        return Ok(());
    }

    let settings = load_settings(args)?;
    println!("{}", Style::header("Configuration"));
    for (key, value) in settings.describe() {
        println!("  {} {}", Style::label(format!("{key:<26}")), Style::value(value));
    }

    Ok(())
}
