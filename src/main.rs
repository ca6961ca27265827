//! `thanks` — find the open source maintainers you depend on who are seeking donations.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Read direct dependencies and the installed package tree ([`analyzer`]).
//! 3. Load config and resolve the registry ([`config`], [`registry::npmrc`]).
//! 4. Fetch maintainers and download counts ([`registry`]), concurrently.
//! 5. Rank each maintainer's packages ([`aggregate`]) and match them against
//!    the donation table ([`matcher`], [`donations`]).
//! 6. Render the requested report ([`report`]) and offer to open the donate
//!    pages ([`browser`]).
//! 7. Exit `1` on a setup error (no `package.json`, nothing installed).

mod aggregate;
mod analyzer;
mod browser;
mod cli;
mod config;
mod donations;
mod error;
mod matcher;
mod models;
mod pipeline;
mod progress;
mod registry;
mod report;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use analyzer::node::NodeAnalyzer;
use analyzer::Analyzer;
use cli::{Cli, ReportFormat};
use config::load_config;
use donations::DonationTable;
use pipeline::Summary;
use progress::{Progress, Silent, Spinner};
use registry::npmrc::Npmrc;
use registry::Registry;

const ISSUES_URL: &str = "https://github.com/feross/thanks";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprint!("{}", failure_message(&err));
        std::process::exit(1);
    }
}

fn failure_message(err: &anyhow::Error) -> String {
    format!(
        "{} {:#}\n\n{} Open an issue at {}\n\n",
        "Error:".red().bold(),
        err,
        "Found a bug?".cyan(),
        ISSUES_URL.magenta()
    )
}

fn init_logging(verbose: bool) {
    let level = if verbose { "warn,thanks=debug" } else { "warn" };
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(verbose)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let progress: Box<dyn Progress> = if cli.quiet || cli.report == ReportFormat::Json {
        Box::new(Silent)
    } else {
        Box::new(Spinner::new())
    };

    // The spinner must be gone before anything, including an error, is printed
    let outcome = summarize(&cli, &path, progress.as_ref()).await;
    progress.done();
    let (summary, table) = outcome?;

    match cli.report {
        ReportFormat::Json => {
            println!("{}", report::json::to_string(&summary, &table)?);
        }
        ReportFormat::Terminal => {
            report::terminal::render(&summary, &table, cli.quiet);

            let links = &summary.donations.donate_links;
            if !links.is_empty() && !cli.no_open && !cli.quiet && browser::confirm_open()? {
                browser::open_donate_links(links);
            }
        }
    }

    Ok(())
}

async fn summarize(
    cli: &Cli,
    path: &Path,
    progress: &dyn Progress,
) -> Result<(Summary, DonationTable)> {
    let project = NodeAnalyzer::new().analyze(path, progress)?;

    let config = load_config(&project.root, cli.config.as_deref())?;
    let table = config.donation_table();

    let npmrc = Npmrc::load(&project.root);
    let settings = config.registry_settings(cli.registry.as_deref(), &npmrc);
    log::debug!(target: "thanks::config", "Using registry {}", settings.registry_url);

    let registry = Registry::new(settings)?;
    let summary = pipeline::collect(&registry, &project, &table, progress).await;

    Ok((summary, table))
}
