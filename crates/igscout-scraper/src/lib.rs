pub mod crawler;
pub mod distributor;
pub mod emails;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod markup;
pub mod numbers;
pub mod pipeline;
pub mod resolver;
pub mod session;

pub use crawler::PostDiscoveryCrawler;
pub use distributor::shard;
pub use emails::extract_emails;
pub use error::{FailureKind, ScraperError};
pub use extractor::ProfileInfoExtractor;
pub use fetch::{HttpFetcher, PageFetcher};
pub use markup::{PageModel, ProfileSummary, SharedDataModel};
pub use numbers::normalize_count;
pub use pipeline::{HashtagPipeline, HashtagRun};
pub use resolver::ProfileResolver;
pub use session::{BrowserSession, FeedSession, SessionOptions};
