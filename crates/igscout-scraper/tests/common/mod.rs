//! Page fixtures in the `window._sharedData` layout plus a scripted feed.

#![allow(dead_code)]

use async_trait::async_trait;
use igscout_scraper::{FeedSession, ScraperError};

pub fn feed_page(count: u64) -> String {
    format!(
        r#"<html><body><script type="text/javascript">window._sharedData = {{"entry_data":{{"TagPage":[{{"graphql":{{"hashtag":{{"edge_hashtag_to_media":{{"count":{count}}}}}}}}}]}}}};</script></body></html>"#
    )
}

pub fn post_page(owner: &str) -> String {
    format!(
        r#"<html><body><script type="text/javascript">window._sharedData = {{"entry_data":{{"PostPage":[{{"graphql":{{"shortcode_media":{{"owner":{{"id":"1","username":"{owner}"}}}}}}}}]}}}};</script></body></html>"#
    )
}

pub fn profile_page(owner: &str, followers: &str, bio: &str) -> String {
    format!(
        r#"<html><head>
<meta property="og:description" content="{followers} Followers, 120 Following, 33 Posts - See Instagram photos and videos from {owner} Official (@{owner})" />
<script>window.a = 1;</script>
<script>window.b = 2;</script>
<script>window.c = 3;</script>
<script type="text/javascript">{{"biography":"{bio}"}}</script>
</head><body></body></html>"#
    )
}

/// Feed session that serves one fixed markup and link list.
pub struct StaticFeed {
    pub markup: String,
    pub links: Vec<String>,
    pub opened: Vec<String>,
    pub closed: bool,
}

impl StaticFeed {
    pub fn new(markup: String, links: Vec<String>) -> Self {
        Self {
            markup,
            links,
            opened: Vec::new(),
            closed: false,
        }
    }
}

#[async_trait]
impl FeedSession for StaticFeed {
    async fn open(&mut self, url: &str) -> Result<(), ScraperError> {
        self.opened.push(url.to_owned());
        Ok(())
    }

    async fn markup(&mut self) -> Result<String, ScraperError> {
        Ok(self.markup.clone())
    }

    async fn post_links(&mut self, _selector: &str) -> Result<Vec<String>, ScraperError> {
        Ok(self.links.clone())
    }

    async fn load_more(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.closed = true;
        Ok(())
    }
}
