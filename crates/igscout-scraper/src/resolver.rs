//! Post URL → owning profile URL resolution.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use igscout_core::AppConfig;

use crate::distributor::shard;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::markup::PageModel;

/// Maps post pages to the profile URLs of their owners.
///
/// Failures on individual posts are logged and the post is dropped; the
/// output is a set whose size is not tied to the input size.
#[derive(Clone)]
pub struct ProfileResolver {
    fetcher: Arc<dyn PageFetcher>,
    page_model: Arc<dyn PageModel>,
    profile_url_prefix: String,
}

impl ProfileResolver {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        page_model: Arc<dyn PageModel>,
        profile_url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            page_model,
            profile_url_prefix: profile_url_prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(
        fetcher: Arc<dyn PageFetcher>,
        page_model: Arc<dyn PageModel>,
        config: &AppConfig,
    ) -> Self {
        Self::new(fetcher, page_model, config.profile_url_prefix.clone())
    }

    /// Resolve every post in `post_urls`, sequentially.
    pub async fn resolve(&self, post_urls: &[String]) -> HashSet<String> {
        let total = post_urls.len();
        let mut profiles = HashSet::new();

        for (index, url) in post_urls.iter().enumerate() {
            tracing::debug!(post = index + 1, total, url = %url, "resolving post owner");
            match self.resolve_one(url).await {
                Ok(profile_url) => {
                    profiles.insert(profile_url);
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        kind = %e.kind(),
                        error = %e,
                        "no profile URL for post; skipping"
                    );
                }
            }
        }

        profiles
    }

    /// Shard `post_urls` across `workers` concurrent tasks and union the
    /// per-shard results.
    pub async fn resolve_all(
        &self,
        post_urls: Vec<String>,
        workers: NonZeroUsize,
    ) -> HashSet<String> {
        let handles: Vec<_> = shard(post_urls, workers)
            .into_iter()
            .enumerate()
            .map(|(index, posts)| {
                let resolver = self.clone();
                tokio::spawn(async move {
                    tracing::debug!(shard = index, posts = posts.len(), "resolver worker started");
                    resolver.resolve(&posts).await
                })
            })
            .collect();

        let mut profiles = HashSet::new();
        for (index, joined) in futures::future::join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(found) => profiles.extend(found),
                Err(e) => {
                    tracing::error!(shard = index, error = %e, "resolver worker aborted");
                }
            }
        }
        profiles
    }

    async fn resolve_one(&self, post_url: &str) -> Result<String, ScraperError> {
        let markup = self.fetcher.fetch_page(post_url).await?;
        let username = self.page_model.owner_username(&markup)?;
        Ok(self.profile_url(&username))
    }

    /// Profile page URL for `username`.
    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        format!("{}{username}/", self.profile_url_prefix)
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
