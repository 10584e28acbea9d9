use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("browser session error while {context}: {reason}")]
    Browser { context: String, reason: String },

    #[error("JSON parse error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("structured data missing: {context}")]
    MissingData { context: String },

    #[error("field {field} not found in {context}")]
    ExtractionMiss { field: &'static str, context: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cannot read proxy CA certificate {path}: {source}")]
    Certificate {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse failure classes used when absorbing per-item errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or availability problem.
    Fetch,
    /// Structured data missing or malformed.
    Parse,
    /// Expected field or path absent.
    ExtractionMiss,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Fetch => write!(f, "fetch"),
            FailureKind::Parse => write!(f, "parse"),
            FailureKind::ExtractionMiss => write!(f, "extraction_miss"),
        }
    }
}

impl ScraperError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ScraperError::Http(_)
            | ScraperError::Timeout { .. }
            | ScraperError::HttpStatus { .. }
            | ScraperError::Browser { .. }
            | ScraperError::InvalidUrl { .. }
            | ScraperError::Certificate { .. } => FailureKind::Fetch,
            ScraperError::Json { .. } | ScraperError::MissingData { .. } => FailureKind::Parse,
            ScraperError::ExtractionMiss { .. } => FailureKind::ExtractionMiss,
        }
    }

    pub(crate) fn browser(context: &str, err: impl std::fmt::Display) -> Self {
        ScraperError::Browser {
            context: context.to_string(),
            reason: err.to_string(),
        }
    }
}
