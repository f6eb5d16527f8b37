use thiserror::Error;

/// Failure of a single job board during a scrape.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    #[error("Unexpected status: HTTP {0}")]
    Status(u16),

    #[error("Invalid search URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Scraper thread panicked")]
    Panicked,
}
