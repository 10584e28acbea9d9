//! Hashtag feed discovery.
//!
//! Drives one [`FeedSession`] over a hashtag feed, repeatedly harvesting the
//! rendered post links and scrolling for more until either the capped target
//! is reached or the feed stops growing.

use std::collections::HashSet;
use std::sync::Arc;

use igscout_core::{AppConfig, CrawlSettings};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ScraperError;
use crate::markup::PageModel;
use crate::session::FeedSession;

/// Bytes escaped in the hashtag path segment; hashtags keep `_` readable.
const HASHTAG_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// Discovered posts and the consecutive no-growth poll count for one crawl.
#[derive(Debug, Default)]
struct CrawlState {
    discovered: HashSet<String>,
    stagnant_polls: u32,
}

impl CrawlState {
    /// Add links until `cap` is reached; returns how many were new.
    fn absorb(&mut self, links: Vec<String>, cap: usize) -> usize {
        let before = self.discovered.len();
        for link in links {
            if self.discovered.len() >= cap {
                break;
            }
            self.discovered.insert(link);
        }
        self.discovered.len() - before
    }
}

#[derive(Clone)]
pub struct PostDiscoveryCrawler {
    page_model: Arc<dyn PageModel>,
    feed_url_prefix: String,
    post_link_selector: String,
    settings: CrawlSettings,
}

impl PostDiscoveryCrawler {
    #[must_use]
    pub fn new(
        page_model: Arc<dyn PageModel>,
        feed_url_prefix: impl Into<String>,
        post_link_selector: impl Into<String>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            page_model,
            feed_url_prefix: feed_url_prefix.into(),
            post_link_selector: post_link_selector.into(),
            settings,
        }
    }

    #[must_use]
    pub fn from_config(page_model: Arc<dyn PageModel>, config: &AppConfig) -> Self {
        Self::new(
            page_model,
            config.feed_url_prefix.clone(),
            config.post_link_selector.clone(),
            config.crawl.clone(),
        )
    }

    /// Feed page URL for `hashtag`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] for an empty hashtag.
    pub fn feed_url(&self, hashtag: &str) -> Result<String, ScraperError> {
        let tag = hashtag.trim().trim_start_matches('#');
        if tag.is_empty() {
            return Err(ScraperError::InvalidUrl {
                url: format!("{}{hashtag}/", self.feed_url_prefix),
                reason: "hashtag is empty".to_string(),
            });
        }
        let encoded = utf8_percent_encode(tag, HASHTAG_SEGMENT);
        Ok(format!("{}{encoded}/", self.feed_url_prefix))
    }

    /// Collect up to `min(target, declared feed size)` distinct post URLs.
    ///
    /// The crawl stops early once the configured number of consecutive polls
    /// add nothing new. Failures while loading more content are not errors;
    /// they only show up as polls without growth.
    ///
    /// # Errors
    ///
    /// Any failure opening the feed page or reading its declared post count
    /// is returned; nothing downstream can run without it.
    pub async fn discover<S>(
        &self,
        session: &mut S,
        hashtag: &str,
        target: usize,
    ) -> Result<HashSet<String>, ScraperError>
    where
        S: FeedSession + ?Sized,
    {
        let feed_url = self.feed_url(hashtag)?;
        session.open(&feed_url).await?;
        let feed_markup = session.markup().await?;
        let declared = self.page_model.declared_post_count(&feed_markup)?;
        let cap = target.min(declared);

        tracing::info!(hashtag, target, declared, cap, "crawling hashtag feed");

        let mut state = CrawlState::default();
        while state.discovered.len() < cap {
            let links = match session.post_links(&self.post_link_selector).await {
                Ok(links) => links,
                Err(e) => {
                    tracing::debug!(hashtag, error = %e, "reading post links failed");
                    Vec::new()
                }
            };

            if state.absorb(links, cap) == 0 {
                state.stagnant_polls += 1;
            } else {
                state.stagnant_polls = 0;
            }

            tracing::debug!(
                hashtag,
                discovered = state.discovered.len(),
                cap,
                stagnant_polls = state.stagnant_polls,
                "polled hashtag feed"
            );

            if state.discovered.len() >= cap {
                break;
            }
            if state.stagnant_polls >= self.settings.stagnation_limit {
                tracing::info!(
                    hashtag,
                    discovered = state.discovered.len(),
                    cap,
                    "feed stopped growing; ending crawl early"
                );
                break;
            }

            if let Err(e) = session.load_more().await {
                tracing::debug!(hashtag, error = %e, "loading more posts failed");
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        Ok(state.discovered)
    }
}

#[cfg(test)]
#[path = "crawler_test.rs"]
mod tests;
