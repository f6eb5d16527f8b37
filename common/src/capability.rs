use crate::{ResultSet, ScrapeConfig, ScrapeError};

/// The "scrape jobs" capability: one call, one result set or one failure.
pub trait ScrapeJobs {
    type Output: ResultSet;

    fn scrape_jobs(&self, config: &ScrapeConfig) -> Result<Self::Output, ScrapeError>;
}
