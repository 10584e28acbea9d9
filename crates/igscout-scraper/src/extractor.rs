//! Profile URL → [`ProfileRecord`] extraction.

use std::num::NonZeroUsize;
use std::sync::Arc;

use igscout_core::{Field, ProfileRecord};

use crate::distributor::shard;
use crate::emails::extract_emails;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::markup::PageModel;

/// Reads statistics and contact addresses from profile pages.
///
/// Output is aligned 1:1 with the input: a profile that cannot be fetched or
/// parsed yields [`ProfileRecord::unavailable`] at its position.
#[derive(Clone)]
pub struct ProfileInfoExtractor {
    fetcher: Arc<dyn PageFetcher>,
    page_model: Arc<dyn PageModel>,
}

impl ProfileInfoExtractor {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, page_model: Arc<dyn PageModel>) -> Self {
        Self {
            fetcher,
            page_model,
        }
    }

    /// Extract one record per URL, in input order.
    pub async fn extract(&self, profile_urls: &[String]) -> Vec<ProfileRecord> {
        let total = profile_urls.len();
        let mut records = Vec::with_capacity(total);

        for (index, url) in profile_urls.iter().enumerate() {
            tracing::debug!(profile = index + 1, total, url = %url, "extracting profile info");
            let record = match self.extract_one(url).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        kind = %e.kind(),
                        error = %e,
                        "unable to extract profile; recording placeholder"
                    );
                    ProfileRecord::unavailable()
                }
            };
            records.push(record);
        }

        records
    }

    /// Shard `profile_urls` across `workers` concurrent tasks and concatenate
    /// the shard outputs by shard index.
    ///
    /// The result has the same length and order as `profile_urls`. A worker
    /// that aborts contributes placeholders for its whole shard.
    pub async fn extract_all(
        &self,
        profile_urls: Vec<String>,
        workers: NonZeroUsize,
    ) -> Vec<ProfileRecord> {
        let total = profile_urls.len();
        let shards = shard(profile_urls, workers);
        let shard_sizes: Vec<usize> = shards.iter().map(Vec::len).collect();

        let handles: Vec<_> = shards
            .into_iter()
            .enumerate()
            .map(|(index, urls)| {
                let extractor = self.clone();
                tokio::spawn(async move {
                    tracing::debug!(shard = index, profiles = urls.len(), "extractor worker started");
                    extractor.extract(&urls).await
                })
            })
            .collect();

        let mut records = Vec::with_capacity(total);
        for ((index, joined), size) in futures::future::join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .zip(shard_sizes)
        {
            match joined {
                Ok(shard_records) => records.extend(shard_records),
                Err(e) => {
                    tracing::error!(shard = index, error = %e, "extractor worker aborted");
                    records.extend(std::iter::repeat_with(ProfileRecord::unavailable).take(size));
                }
            }
        }
        records
    }

    async fn extract_one(&self, profile_url: &str) -> Result<ProfileRecord, ScraperError> {
        let markup = self.fetcher.fetch_page(profile_url).await?;
        let summary = self.page_model.profile_summary(&markup)?;
        let emails = extract_emails(self.page_model.email_source(&markup)?);

        Ok(ProfileRecord {
            username: Field::Value(summary.username),
            followers: Field::Value(summary.followers),
            following: Field::Value(summary.following),
            posts: Field::Value(summary.posts),
            emails: Field::Value(emails),
            profile_url: Field::Value(profile_url.to_string()),
            hashtag: Field::Unavailable,
        })
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
