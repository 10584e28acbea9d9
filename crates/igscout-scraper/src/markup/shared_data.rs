//! The `window._sharedData = {...};` markup layout.
//!
//! Feed and post pages embed the whole page state as one JSON blob assigned
//! to `window._sharedData`. Profile pages expose their statistics in the
//! `og:description` meta tag ("`12.5k Followers, 300 Following, 42 Posts -
//! See Instagram photos and videos from Jane Doe (@jane)`") and the biography
//! inside the fourth script block.

use std::sync::LazyLock;

use regex::Regex;

use super::blob::{extract_balanced_json, find_first_nested_str, script_blocks};
use super::{PageModel, ProfileSummary};
use crate::error::ScraperError;
use crate::numbers::normalize_count;

const SHARED_DATA_MARKER: &str = "window._sharedData";
const DECLARED_COUNT_POINTER: &str =
    "/entry_data/TagPage/0/graphql/hashtag/edge_hashtag_to_media/count";
const POST_GRAPHQL_POINTER: &str = "/entry_data/PostPage/0/graphql";

/// Zero-based position of the biography-bearing script block.
const EMAIL_SCRIPT_INDEX: usize = 3;

/// Tokens needed for "`<n> Followers, <n> Following, <n> Posts`".
const MIN_DESCRIPTION_TOKENS: usize = 6;
/// Trailing tokens that make up the display username.
const USERNAME_TOKENS: usize = 3;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));

static OG_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bproperty\s*=\s*["']og:description["']"#).expect("valid regex")
});

static CONTENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct SharedDataModel;

impl SharedDataModel {
    /// Parse the `window._sharedData` blob embedded in `html`.
    fn shared_data(html: &str, context: &str) -> Result<serde_json::Value, ScraperError> {
        let missing = || ScraperError::MissingData {
            context: format!("{SHARED_DATA_MARKER} in {context}"),
        };

        let start = html.find(SHARED_DATA_MARKER).ok_or_else(missing)?;
        let after_marker = &html[start + SHARED_DATA_MARKER.len()..];
        let assigned = after_marker.trim_start().strip_prefix('=').ok_or_else(missing)?;
        let blob = extract_balanced_json(assigned.trim_start()).ok_or_else(missing)?;

        serde_json::from_str(blob).map_err(|source| ScraperError::Json {
            context: context.to_string(),
            source,
        })
    }

    fn og_description(html: &str) -> Option<String> {
        META_TAG
            .find_iter(html)
            .map(|m| m.as_str())
            .filter(|tag| OG_DESCRIPTION.is_match(tag))
            .find_map(|tag| {
                let cap = CONTENT_ATTR.captures(tag)?;
                let raw = cap.get(1).or_else(|| cap.get(2))?.as_str();
                Some(html_escape::decode_html_entities(raw).into_owned())
            })
    }
}

impl PageModel for SharedDataModel {
    fn declared_post_count(&self, feed_html: &str) -> Result<usize, ScraperError> {
        let data = Self::shared_data(feed_html, "hashtag feed")?;
        data.pointer(DECLARED_COUNT_POINTER)
            .and_then(serde_json::Value::as_u64)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| ScraperError::ExtractionMiss {
                field: "edge_hashtag_to_media.count",
                context: "hashtag feed".to_string(),
            })
    }

    fn owner_username(&self, post_html: &str) -> Result<String, ScraperError> {
        let data = Self::shared_data(post_html, "post page")?;
        let graphql = data
            .pointer(POST_GRAPHQL_POINTER)
            .ok_or_else(|| ScraperError::MissingData {
                context: "PostPage graphql in post page".to_string(),
            })?;

        find_first_nested_str(graphql, "owner", "username")
            .map(str::to_string)
            .ok_or_else(|| ScraperError::ExtractionMiss {
                field: "owner.username",
                context: "post page".to_string(),
            })
    }

    fn profile_summary(&self, profile_html: &str) -> Result<ProfileSummary, ScraperError> {
        let description =
            Self::og_description(profile_html).ok_or_else(|| ScraperError::ExtractionMiss {
                field: "og:description",
                context: "profile page".to_string(),
            })?;
        parse_description(&description)
    }

    fn email_source<'a>(&self, profile_html: &'a str) -> Result<&'a str, ScraperError> {
        script_blocks(profile_html)
            .get(EMAIL_SCRIPT_INDEX)
            .copied()
            .ok_or_else(|| ScraperError::ExtractionMiss {
                field: "biography script",
                context: "profile page".to_string(),
            })
    }
}

/// Split an `og:description` summary into statistics and display username.
pub(crate) fn parse_description(description: &str) -> Result<ProfileSummary, ScraperError> {
    let tokens: Vec<&str> = description.split_whitespace().collect();
    if tokens.len() < MIN_DESCRIPTION_TOKENS {
        return Err(ScraperError::ExtractionMiss {
            field: "profile statistics",
            context: format!("description \"{description}\""),
        });
    }

    let count = |index: usize, field: &'static str| {
        normalize_count(tokens[index]).ok_or_else(|| ScraperError::ExtractionMiss {
            field,
            context: format!("description token \"{}\"", tokens[index]),
        })
    };

    Ok(ProfileSummary {
        username: tokens[tokens.len() - USERNAME_TOKENS..].join(" "),
        followers: count(0, "followers")?,
        following: count(2, "following")?,
        posts: count(4, "posts")?,
    })
}

#[cfg(test)]
#[path = "shared_data_test.rs"]
mod tests;
