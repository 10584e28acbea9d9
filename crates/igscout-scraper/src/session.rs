//! Stateful rendering session used to reveal the hashtag feed.
//!
//! The feed only renders posts as the page is scrolled, so discovery needs a
//! real browser rather than the plain HTTP fetcher. A session is stateful and
//! is driven from a single task; it is never shared between workers.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use igscout_core::AppConfig;

use crate::error::ScraperError;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// A page-rendering session positioned on one page at a time.
#[async_trait]
pub trait FeedSession: Send {
    /// Navigate to `url` and wait for it to load.
    async fn open(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Current markup of the open page.
    async fn markup(&mut self) -> Result<String, ScraperError>;

    /// Absolute `href` of every element currently matching `selector`.
    async fn post_links(&mut self, selector: &str) -> Result<Vec<String>, ScraperError>;

    /// Ask the page to render more content (scroll to the bottom).
    async fn load_more(&mut self) -> Result<(), ScraperError>;

    /// Release the session. Further calls are invalid.
    async fn close(&mut self) -> Result<(), ScraperError>;
}

/// Launch options for [`BrowserSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub headless: bool,
    /// Value for Chrome's `--proxy-server` switch.
    pub proxy_server: Option<String>,
    pub chrome_path: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            headless: config.headless,
            proxy_server: config.proxy.as_ref().map(|p| p.http.clone()),
            chrome_path: config.chrome_path.clone(),
            request_timeout: Some(Duration::from_secs(config.request_timeout_secs)),
            user_agent: Some(config.user_agent.clone()),
        }
    }
}

/// [`FeedSession`] backed by a Chromium instance driven over CDP.
pub struct BrowserSession {
    browser: Browser,
    handler: tokio::task::JoinHandle<()>,
    page: Option<Page>,
    user_agent: Option<String>,
}

impl BrowserSession {
    /// Launch a browser for one crawl.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if the browser cannot be configured
    /// or started.
    pub async fn launch(options: &SessionOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-infobars");

        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(proxy) = &options.proxy_server {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        if let Some(path) = &options.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if let Some(timeout) = options.request_timeout {
            builder = builder.request_timeout(timeout);
        }

        let config = builder
            .build()
            .map_err(|e| ScraperError::browser("configuring browser", e))?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::browser("launching browser", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::debug!(headless = options.headless, "browser session launched");

        Ok(Self {
            browser,
            handler,
            page: None,
            user_agent: options.user_agent.clone(),
        })
    }

    fn page(&self) -> Result<&Page, ScraperError> {
        self.page.as_ref().ok_or_else(|| ScraperError::Browser {
            context: "reading page".to_string(),
            reason: "no page is open".to_string(),
        })
    }
}

#[async_trait]
impl FeedSession for BrowserSession {
    async fn open(&mut self, url: &str) -> Result<(), ScraperError> {
        if let Some(previous) = self.page.take() {
            if let Err(e) = previous.close().await {
                tracing::debug!(error = %e, "closing previous tab failed");
            }
        }

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::browser("opening tab", e))?;
        if let Some(ua) = &self.user_agent {
            page.set_user_agent(ua.as_str())
                .await
                .map_err(|e| ScraperError::browser("setting user agent", e))?;
        }
        // goto resolves once the load event has fired.
        page.goto(url)
            .await
            .map_err(|e| ScraperError::browser("navigating", e))?;

        self.page = Some(page);
        Ok(())
    }

    async fn markup(&mut self) -> Result<String, ScraperError> {
        self.page()?
            .content()
            .await
            .map_err(|e| ScraperError::browser("reading markup", e))
    }

    async fn post_links(&mut self, selector: &str) -> Result<Vec<String>, ScraperError> {
        let selector_literal = serde_json::to_string(selector).map_err(|source| {
            ScraperError::Json {
                context: "post link selector".to_string(),
                source,
            }
        })?;
        let script = format!(
            "Array.from(document.querySelectorAll({selector_literal})).map(el => el.href).filter(h => typeof h === 'string' && h.length > 0)"
        );

        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::browser("collecting post links", e))?;
        result.into_value::<Vec<String>>().map_err(|source| ScraperError::Json {
            context: "post link list".to_string(),
            source,
        })
    }

    async fn load_more(&mut self) -> Result<(), ScraperError> {
        self.page()?
            .evaluate(SCROLL_TO_BOTTOM)
            .await
            .map_err(|e| ScraperError::browser("scrolling", e))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!(error = %e, "closing tab failed");
            }
        }
        self.browser
            .close()
            .await
            .map_err(|e| ScraperError::browser("closing browser", e))?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "waiting for browser exit failed");
        }
        self.handler.abort();
        Ok(())
    }
}
