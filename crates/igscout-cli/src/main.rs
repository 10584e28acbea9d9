mod report;
mod run;

use std::num::NonZeroUsize;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "igscout")]
#[command(about = "Discover hashtag posters and collect their profile statistics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl each configured hashtag and write its profile reports
    Run {
        /// Hashtag to crawl; repeat for several. Replaces `IGSCOUT_HASHTAGS`
        #[arg(long = "hashtag", value_name = "TAG")]
        hashtags: Vec<String>,

        /// Number of posts to discover per hashtag
        #[arg(long)]
        target: Option<usize>,

        /// Concurrent workers for the resolution and extraction stages
        #[arg(long)]
        workers: Option<NonZeroUsize>,

        /// Print the resolved plan without launching a browser
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// Command-line values keyed by the environment variable they replace.
    fn config_overrides(&self) -> Vec<(&'static str, String)> {
        let Commands::Run {
            hashtags,
            target,
            workers,
            ..
        } = self;

        let mut overrides = Vec::new();
        if !hashtags.is_empty() {
            overrides.push(("IGSCOUT_HASHTAGS", hashtags.join(",")));
        }
        if let Some(target) = target {
            overrides.push(("IGSCOUT_TARGET_POST_COUNT", target.to_string()));
        }
        if let Some(workers) = workers {
            overrides.push(("IGSCOUT_WORKERS", workers.to_string()));
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        hashtags: Vec::new(),
        target: None,
        workers: None,
        dry_run: false,
    });

    let config = igscout_core::load_app_config_with_overrides(&command.config_overrides())?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Run { dry_run, .. } => run::run_hashtags(&config, dry_run).await,
    }
}

#[cfg(test)]
mod tests;
