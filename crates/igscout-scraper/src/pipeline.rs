//! Per-hashtag orchestration: crawl, resolve, extract.
//!
//! 1. Discover post URLs on the hashtag feed with a [`FeedSession`].
//! 2. Close the session; the remaining stages use plain HTTP.
//! 3. Shard the posts across workers and resolve their owners' profiles.
//! 4. Shard the profiles across workers and extract one record each.
//! 5. Label every record, placeholders included, with the hashtag.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use igscout_core::{AppConfig, ProfileRecord};

use crate::crawler::PostDiscoveryCrawler;
use crate::error::ScraperError;
use crate::extractor::ProfileInfoExtractor;
use crate::fetch::PageFetcher;
use crate::markup::PageModel;
use crate::resolver::ProfileResolver;
use crate::session::FeedSession;

/// Outcome of one hashtag run.
#[derive(Debug, Clone)]
pub struct HashtagRun {
    pub hashtag: String,
    /// One record per resolved profile, placeholders included.
    pub records: Vec<ProfileRecord>,
    /// Wall-clock time from crawl start to the last extracted record.
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct HashtagPipeline {
    crawler: PostDiscoveryCrawler,
    resolver: ProfileResolver,
    extractor: ProfileInfoExtractor,
    target_post_count: usize,
    workers: NonZeroUsize,
}

impl HashtagPipeline {
    #[must_use]
    pub fn new(
        crawler: PostDiscoveryCrawler,
        resolver: ProfileResolver,
        extractor: ProfileInfoExtractor,
        target_post_count: usize,
        workers: NonZeroUsize,
    ) -> Self {
        Self {
            crawler,
            resolver,
            extractor,
            target_post_count,
            workers,
        }
    }

    /// Wire every stage from configuration around one fetcher and page model.
    #[must_use]
    pub fn from_config(
        config: &AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        page_model: Arc<dyn PageModel>,
    ) -> Self {
        Self::new(
            PostDiscoveryCrawler::from_config(Arc::clone(&page_model), config),
            ProfileResolver::from_config(Arc::clone(&fetcher), Arc::clone(&page_model), config),
            ProfileInfoExtractor::new(fetcher, page_model),
            config.target_post_count,
            config.workers,
        )
    }

    /// Run every stage for `hashtag`.
    ///
    /// `session` is closed once discovery finishes, whether or not it
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Only discovery failures are returned. Per-post and per-profile
    /// failures are absorbed by the later stages.
    pub async fn run<S>(&self, session: &mut S, hashtag: &str) -> Result<HashtagRun, ScraperError>
    where
        S: FeedSession + ?Sized,
    {
        let started = Instant::now();

        let discovered = self
            .crawler
            .discover(session, hashtag, self.target_post_count)
            .await;
        if let Err(e) = session.close().await {
            tracing::warn!(hashtag, error = %e, "closing crawl session failed");
        }
        let discovered = discovered?;

        let mut post_urls: Vec<String> = discovered.into_iter().collect();
        post_urls.sort();
        tracing::info!(hashtag, posts = post_urls.len(), "resolving post owners");

        let mut profile_urls: Vec<String> = self
            .resolver
            .resolve_all(post_urls, self.workers)
            .await
            .into_iter()
            .collect();
        profile_urls.sort();
        tracing::info!(hashtag, profiles = profile_urls.len(), "extracting profiles");

        let records: Vec<ProfileRecord> = self
            .extractor
            .extract_all(profile_urls, self.workers)
            .await
            .into_iter()
            .map(|record| record.labeled(hashtag))
            .collect();

        let elapsed = started.elapsed();
        tracing::info!(
            hashtag,
            records = records.len(),
            placeholders = records.iter().filter(|r| r.username.is_unavailable()).count(),
            elapsed_secs = elapsed.as_secs_f64(),
            "hashtag run complete"
        );

        Ok(HashtagRun {
            hashtag: hashtag.to_string(),
            records,
            elapsed,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
