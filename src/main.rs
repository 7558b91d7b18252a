use anyhow::Result;
use clap::Parser;

use subtranslate::cli::commands::{config, jobs, languages, view};
use subtranslate::cli::{Args, Command};
use subtranslate::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    match &args.command {
        Command::View(view_args) => view::run_view(&args, view_args).await?,
        Command::Jobs { command } => jobs::run_jobs(&args, command).await?,
        Command::Languages => languages::print_languages(&args).await?,
        Command::Config { show } => config::run_config(&args, *show)?,
    }

    Ok(())
}
