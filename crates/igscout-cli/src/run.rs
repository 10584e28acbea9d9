//! The `run` command: one pipeline run and one pair of reports per hashtag.
//!
//! A hashtag that fails (browser launch, feed discovery, report write) is
//! logged and skipped so the remaining hashtags still run.

use std::sync::Arc;

use anyhow::Context;
use igscout_core::AppConfig;
use igscout_scraper::{
    BrowserSession, HashtagPipeline, HttpFetcher, PageFetcher, PageModel, SessionOptions,
    SharedDataModel,
};

use crate::report;

pub(crate) async fn run_hashtags(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        print_plan(config);
        return Ok(());
    }

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        HttpFetcher::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build page fetcher: {e}"))?,
    );
    let page_model: Arc<dyn PageModel> = Arc::new(SharedDataModel);
    let pipeline = HashtagPipeline::from_config(config, fetcher, page_model);
    let session_options = SessionOptions::from_config(config);

    let total = config.hashtags.len();
    let mut completed = 0_usize;

    for (index, hashtag) in config.hashtags.iter().enumerate() {
        tracing::info!(hashtag = %hashtag, position = index + 1, total, "starting hashtag");

        let mut session = match BrowserSession::launch(&session_options).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(hashtag = %hashtag, error = %e, "browser launch failed; skipping hashtag");
                continue;
            }
        };

        let run = match pipeline.run(&mut session, hashtag).await {
            Ok(run) => run,
            Err(e) => {
                tracing::error!(
                    hashtag = %hashtag,
                    kind = %e.kind(),
                    error = %e,
                    "hashtag run failed; skipping"
                );
                continue;
            }
        };

        match report::write_reports(
            &config.output_dir,
            &run,
            config.min_followers,
            config.max_followers,
        ) {
            Ok(paths) => {
                completed += 1;
                tracing::info!(
                    hashtag = %hashtag,
                    records = run.records.len(),
                    users = %paths.users.display(),
                    influencers = %paths.influencers.display(),
                    "reports written"
                );
            }
            Err(e) => {
                tracing::error!(hashtag = %hashtag, error = %e, "writing reports failed");
            }
        }
    }

    tracing::info!(completed, total, "all hashtags processed");
    if completed == 0 && total > 0 {
        anyhow::bail!("no hashtag produced a report ({total} attempted)");
    }
    Ok(())
}

fn print_plan(config: &AppConfig) {
    println!(
        "dry-run: would crawl {} hashtags: [{}]",
        config.hashtags.len(),
        config.hashtags.join(", ")
    );
    println!(
        "  target posts per hashtag: {}, workers: {}, headless: {}, proxy: {}",
        config.target_post_count,
        config.workers,
        config.headless,
        if config.proxy.is_some() { "on" } else { "off" }
    );
    println!(
        "  influencer followers: ({}, {}), output dir: {}",
        config.min_followers,
        config.max_followers,
        config.output_dir.display()
    );
}
