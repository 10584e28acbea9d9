//! Plain HTTP page fetching for the post and profile stages.

use std::time::Duration;

use async_trait::async_trait;
use igscout_core::{AppConfig, ProxyConfig};
use reqwest::Client;

use crate::error::ScraperError;

/// Returns the markup text of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns a fetch-class [`ScraperError`] when the page cannot be
    /// retrieved.
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError>;
}

/// [`PageFetcher`] over a shared `reqwest` client.
///
/// Every request is bounded by the configured timeout; expiry surfaces as
/// [`ScraperError::Timeout`]. No request is retried.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the given timeout, `User-Agent` and
    /// optional proxy pair.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the proxy endpoints are invalid or
    /// the client cannot be constructed, and [`ScraperError::Certificate`] if
    /// the proxy CA certificate cannot be read.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        proxy: Option<&ProxyConfig>,
    ) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);

        if let Some(proxy) = proxy {
            builder = builder
                .proxy(reqwest::Proxy::http(&proxy.http)?)
                .proxy(reqwest::Proxy::https(&proxy.https)?);

            if let Some(path) = &proxy.ca_cert_path {
                let pem = std::fs::read(path).map_err(|source| ScraperError::Certificate {
                    path: path.display().to_string(),
                    source,
                })?;
                builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Builds a fetcher from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.proxy.as_ref(),
        )
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(|e| classify(e, url))
    }
}

fn classify(err: reqwest::Error, url: &str) -> ScraperError {
    if err.is_timeout() {
        ScraperError::Timeout {
            url: url.to_owned(),
        }
    } else {
        ScraperError::Http(err)
    }
}
