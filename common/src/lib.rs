//! Shared data model for the job scraper and the smoke-test runner.

mod capability;
mod config;
mod error;
mod frame;
mod job;
mod site;

pub use capability::ScrapeJobs;
pub use config::{ScrapeConfig, log_filter};
pub use error::ScrapeError;
pub use frame::{CsvOptions, JobFrame, ResultSet, Value};
pub use job::{Compensation, CompensationInterval, JobPost};
pub use site::{Country, Site};
