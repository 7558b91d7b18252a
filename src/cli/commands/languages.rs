//! `subtranslate languages`: lists what the configured service supports.

use anyhow::{Result, bail};

use crate::cli::Args;
use crate::translation::LanguageCatalog;
use crate::ui::{Spinner, Style};

use super::{load_settings, open_cache};

pub async fn print_languages(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let catalog = LanguageCatalog::new(&settings.service, open_cache(&settings)?)?;

    let languages = {
        let _spinner = Spinner::new("Fetching supported languages...");
        catalog.supported_languages().await
    };

    if languages.is_empty() {
        bail!(
            "Could not fetch the language list from {}",
            settings.service.kind.display_name()
        );
    }

    println!(
        "{}\n",
        Style::header(format!(
            "Languages supported by {}",
            settings.service.kind.display_name()
        ))
    );
    for (code, name) in languages {
        println!("  {} {name}", Style::code(format!("{code:<10}")));
    }

    Ok(())
}
