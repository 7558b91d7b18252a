use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subtranslate")]
#[command(about = "Machine translation for wiki language subpages")]
#[command(version)]
pub struct Args {
    /// Translation service (deepl, google, libretranslate, lingva)
    #[arg(short = 's', long, global = true)]
    pub service: Option<String>,

    /// Service base URL
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,

    /// Disable the translation cache
    #[arg(short = 'n', long, global = true)]
    pub no_cache: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a translated view of a page
    View(ViewArgs),
    /// Inspect or run queued translation jobs
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// List languages supported by the configured service
    Languages,
    /// Show configuration
    Config {
        /// Print the resolved configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ViewArgs {
    /// Rendered page HTML (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub page_id: u64,

    #[arg(long)]
    pub revision_id: u64,

    /// Target language code, the subpage suffix (e.g. de, fr, zh-hant)
    #[arg(short = 't', long = "to")]
    pub to: String,

    /// Source language code of the base page; detected when omitted
    #[arg(short = 'f', long = "from", default_value = "")]
    pub from: String,

    /// Title of the base page
    #[arg(long, default_value = "")]
    pub title: String,
}

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// Execute queued jobs
    Run {
        /// Stop after this many jobs
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the number of queued jobs
    Count,
}
