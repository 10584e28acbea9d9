use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, CrawlSettings, ProxyConfig};
use crate::ConfigError;

pub const DEFAULT_FEED_URL_PREFIX: &str = "https://www.instagram.com/explore/tags/";
pub const DEFAULT_PROFILE_URL_PREFIX: &str = "https://www.instagram.com/";
pub const DEFAULT_POST_LINK_SELECTOR: &str = r#"a[href*="/p/"]"#;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load configuration with `overrides` taking precedence over the process
/// environment and `.env` files.
///
/// Each override is keyed by the environment variable it replaces, so values
/// given on the command line pass through the same parsing and validation.
///
/// # Errors
///
/// Returns `ConfigError` if required values are missing or invalid after the
/// overrides are applied.
pub fn load_app_config_with_overrides(
    overrides: &[(&str, String)],
) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(overlay(overrides, |key| std::env::var(key)))
}

/// Lookup that consults `overrides` before falling back to `base`.
fn overlay<'a, F>(
    overrides: &'a [(&'a str, String)],
    base: F,
) -> impl Fn(&str) -> Result<String, std::env::VarError> + 'a
where
    F: Fn(&str) -> Result<String, std::env::VarError> + 'a,
{
    move |key| {
        overrides
            .iter()
            .find(|(var, _)| *var == key)
            .map_or_else(|| base(key), |(_, value)| Ok(value.clone()))
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_float = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        parse_bool(var, &or_default(var, "false"))
    };

    let hashtags = parse_hashtags(&require("IGSCOUT_HASHTAGS")?);
    if hashtags.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "IGSCOUT_HASHTAGS".to_string(),
            reason: "no hashtags listed".to_string(),
        });
    }

    let target_post_count = usize::try_from(parse_num("IGSCOUT_TARGET_POST_COUNT", "10")?)
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "IGSCOUT_TARGET_POST_COUNT".to_string(),
            reason: e.to_string(),
        })?;

    let workers = usize::try_from(parse_num("IGSCOUT_WORKERS", "1")?)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            var: "IGSCOUT_WORKERS".to_string(),
            reason: "must be at least 1".to_string(),
        })?;

    let headless = parse_flag("IGSCOUT_HEADLESS")?;

    let proxy = if parse_flag("IGSCOUT_PROXY")? {
        Some(ProxyConfig {
            http: require("IGSCOUT_PROXY_HTTP")?,
            https: require("IGSCOUT_PROXY_HTTPS")?,
            ca_cert_path: lookup("IGSCOUT_PROXY_CA_CERT").ok().map(PathBuf::from),
        })
    } else {
        None
    };

    let min_followers = parse_float("IGSCOUT_MIN_FOLLOWERS", "1000")?;
    let max_followers = parse_float("IGSCOUT_MAX_FOLLOWERS", "1000000")?;

    let stagnation_limit = u32::try_from(parse_num("IGSCOUT_CRAWL_STAGNATION_LIMIT", "20")?)
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            var: "IGSCOUT_CRAWL_STAGNATION_LIMIT".to_string(),
            reason: "must be a positive 32-bit integer".to_string(),
        })?;

    let crawl = CrawlSettings {
        poll_interval: Duration::from_millis(parse_num("IGSCOUT_CRAWL_POLL_INTERVAL_MS", "1000")?),
        stagnation_limit,
    };

    let config = AppConfig {
        hashtags,
        target_post_count,
        workers,
        headless,
        proxy,
        min_followers,
        max_followers,
        feed_url_prefix: or_default("IGSCOUT_FEED_URL_PREFIX", DEFAULT_FEED_URL_PREFIX),
        profile_url_prefix: or_default("IGSCOUT_PROFILE_URL_PREFIX", DEFAULT_PROFILE_URL_PREFIX),
        post_link_selector: or_default("IGSCOUT_POST_LINK_SELECTOR", DEFAULT_POST_LINK_SELECTOR),
        chrome_path: lookup("IGSCOUT_CHROME_PATH").ok().map(PathBuf::from),
        output_dir: PathBuf::from(or_default("IGSCOUT_OUTPUT_DIR", "./output")),
        log_level: or_default("IGSCOUT_LOG_LEVEL", "info"),
        request_timeout_secs: parse_num("IGSCOUT_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("IGSCOUT_USER_AGENT", DEFAULT_USER_AGENT),
        crawl,
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if !(config.min_followers < config.max_followers) {
        return Err(ConfigError::Validation(format!(
            "IGSCOUT_MIN_FOLLOWERS ({}) must be below IGSCOUT_MAX_FOLLOWERS ({})",
            config.min_followers, config.max_followers
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "IGSCOUT_REQUEST_TIMEOUT_SECS must be non-zero".to_string(),
        ));
    }

    for (var, value) in [
        ("IGSCOUT_FEED_URL_PREFIX", &config.feed_url_prefix),
        ("IGSCOUT_PROFILE_URL_PREFIX", &config.profile_url_prefix),
    ] {
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{value}\" is not an http(s) URL"),
            });
        }
    }

    if config.post_link_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "IGSCOUT_POST_LINK_SELECTOR must be non-empty".to_string(),
        ));
    }

    Ok(())
}

/// Split a comma-separated hashtag list, dropping blanks and any leading `#`.
#[must_use]
pub fn parse_hashtags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().trim_start_matches('#').trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("\"{other}\" is not a boolean"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
