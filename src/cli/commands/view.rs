//! `subtranslate view`: renders one subpage request.

use anyhow::Result;

use crate::cli::{Args, ViewArgs};
use crate::input::InputReader;
use crate::orchestrator::{PageRequest, RenderOutcome};
use crate::ui::{Spinner, Style};

use super::{build_orchestrator, load_settings};

pub async fn run_view(args: &Args, view: &ViewArgs) -> Result<()> {
    let settings = load_settings(args)?;
    let rendered_content = InputReader::read(view.file.as_deref())?;
    let (orchestrator, _) = build_orchestrator(&settings)?;

    let page = PageRequest {
        page_id: view.page_id,
        revision_id: view.revision_id,
        source_lang: view.from.clone(),
        target_lang: view.to.clone(),
        rendered_content,
        title_text: view.title.clone(),
    };

    let outcome = {
        let _spinner = (!settings.render.use_job_queue)
            .then(|| Spinner::new(&format!("Translating to {}...", view.to)));
        orchestrator.render(&page).await
    };

    match &outcome {
        RenderOutcome::Translated(_) => {}
        RenderOutcome::Processing(_) => {
            eprintln!(
                "{} translation job queued for {}",
                Style::warning("Processing:"),
                Style::value(page.cache_key())
            );
        }
        RenderOutcome::Untranslated => {
            eprintln!(
                "{} no translation available; showing the base page",
                Style::warning("Note:")
            );
            print!("{}", page.rendered_content);
            return Ok(());
        }
    }

    if let Some(page_view) = outcome.view() {
        if let Some(title) = &page_view.display_title {
            eprintln!("{} {title}", Style::label("title:"));
        }
        if let Some(policy) = &page_view.robot_policy {
            eprintln!("{} {policy}", Style::label("robots:"));
        }
        print!("{}", page_view.html);
    }

    Ok(())
}
