//! Page models: where each piece of data lives in the site's markup.
//!
//! The site's layout drifts over time. Every layout-specific offset, path and
//! token position sits behind [`PageModel`], with one implementation per
//! markup version, so a layout change is a new implementation rather than an
//! edit scattered across the crawl and extraction stages.

mod blob;
mod shared_data;

pub use blob::{extract_balanced_json, find_first_nested_str, script_blocks};
pub use shared_data::SharedDataModel;

use crate::error::ScraperError;

/// Headline statistics read from a profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub username: String,
    pub followers: f64,
    pub following: f64,
    pub posts: f64,
}

/// Locates data in one markup version of the feed, post and profile pages.
pub trait PageModel: Send + Sync {
    /// Number of posts the hashtag feed claims to contain.
    ///
    /// # Errors
    ///
    /// Returns a parse or extraction error when the count cannot be read.
    fn declared_post_count(&self, feed_html: &str) -> Result<usize, ScraperError>;

    /// Username of the account that owns a post.
    ///
    /// # Errors
    ///
    /// Returns a parse or extraction error when no owner is present.
    fn owner_username(&self, post_html: &str) -> Result<String, ScraperError>;

    /// Follower, following and post counts plus the display username.
    ///
    /// # Errors
    ///
    /// Returns an extraction error when the summary is absent or malformed.
    fn profile_summary(&self, profile_html: &str) -> Result<ProfileSummary, ScraperError>;

    /// Raw text of the script block that carries the profile biography.
    ///
    /// # Errors
    ///
    /// Returns an extraction error when the block does not exist.
    fn email_source<'a>(&self, profile_html: &'a str) -> Result<&'a str, ScraperError>;
}
