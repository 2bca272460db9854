// repocards entry point.
// Loads configuration, builds the page, and keeps its project cards current.

mod cache;
mod config;
mod error;
mod github;
mod logging;
mod output;
mod page;
mod scheduler;
mod stats;
#[cfg(test)]
mod test_utils;
mod update;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use tokio::sync::Mutex;
use tracing::{error, info};

use cache::Fetcher;
use config::Config;
use error::{RepoCardsError, Result};
use github::GitHubClient;
use output::{FileSink, PageSink, StdoutSink};
use scheduler::Scheduler;

#[derive(Parser)]
#[command(
    name = "repocards",
    version,
    about = "Decorate project cards with live GitHub stats"
)]
struct Cli {
    #[arg(long, short, help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Run a single update cycle and exit")]
    once: bool,

    #[arg(long, help = "Print the owner's public profile counters and exit")]
    profile: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "repocards failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config)?;
    info!(owner = %config.owner, projects = config.projects.len(), "configuration loaded");

    let endpoints = config.endpoints();
    let client = GitHubClient::new(config.github_token.as_deref())?;
    let fetcher = Arc::new(Fetcher::new(client, endpoints.clone(), config.cache_ttl()));

    if cli.profile {
        return print_profile(&fetcher).await;
    }

    let document = page::build_document(&config.site_title(), &endpoints, &config.projects);
    let sink: Arc<dyn PageSink> = match &config.output_path {
        Some(path) => Arc::new(FileSink::new(path)),
        None => Arc::new(StdoutSink),
    };
    let scheduler = Arc::new(
        Scheduler::new(
            fetcher,
            Arc::new(Mutex::new(document)),
            config.projects.clone(),
            config.update_interval(),
        )
        .with_sink(sink),
    );

    if cli.once {
        scheduler.run_cycle().await;
        return Ok(());
    }

    let handle = Arc::clone(&scheduler).start();
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    handle.stop();
    handle.join().await;

    Ok(())
}

async fn print_profile(fetcher: &Fetcher<GitHubClient>) -> Result<()> {
    let profile = fetcher.get_user_profile().await.into_option().ok_or_else(|| {
        RepoCardsError::Other(format!(
            "profile for {} unavailable",
            fetcher.endpoints().owner()
        ))
    })?;

    println!(
        "{} ({}): {} public repositories, {} followers",
        profile.login,
        profile.name.as_deref().unwrap_or("-"),
        profile.public_repos,
        profile.followers
    );
    Ok(())
}
