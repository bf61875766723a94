// ABOUTME: Error types for the crawl driver around the classifier.
// ABOUTME: Each CrawlError variant names the stage that failed, as written to the error log.

use pagekind::ClassifyError;
use thiserror::Error;

/// A failure while fetching, decoding or classifying one URL.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("SSL error: {0}")]
    Tls(String),

    #[error("failed decoding html: {0}")]
    Decode(String),

    #[error("failed parsing html: {0}")]
    Parse(String),

    #[error("broken page or decode issue: {0}")]
    BrokenPage(String),
}

impl From<ClassifyError> for CrawlError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::ParseFailure(reason) => CrawlError::Parse(reason),
            ClassifyError::BrokenInput(reason) => CrawlError::BrokenPage(reason),
        }
    }
}

impl CrawlError {
    /// Short description of the failing stage.
    pub fn stage(&self) -> &'static str {
        match self {
            CrawlError::InvalidUrl(_) => "invalid url",
            CrawlError::Connection(_) => "connection failed",
            CrawlError::Tls(_) => "SSL error",
            CrawlError::Decode(_) => "failed decoding html",
            CrawlError::Parse(_) => "failed parsing html",
            CrawlError::BrokenPage(_) => "broken page or decode issue",
        }
    }

    /// The underlying error message, without the stage prefix.
    pub fn detail(&self) -> &str {
        match self {
            CrawlError::InvalidUrl(msg)
            | CrawlError::Connection(msg)
            | CrawlError::Tls(msg)
            | CrawlError::Decode(msg)
            | CrawlError::Parse(msg)
            | CrawlError::BrokenPage(msg) => msg,
        }
    }
}
