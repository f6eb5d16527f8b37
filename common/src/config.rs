use serde::{Deserialize, Serialize};

use crate::Site;

/// Options understood by a scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub sources: Vec<Site>,
    pub search_term: String,
    pub location: String,
    pub results_wanted: usize,
    /// Maximum posting age, in hours.
    pub hours_old: u32,
    pub country: String,
    /// 0 = errors only, 1 = warnings, 2 = everything.
    pub verbosity: u8,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            sources: vec![Site::Indeed, Site::LinkedIn],
            search_term: "software engineer".to_string(),
            location: "San Francisco, CA".to_string(),
            results_wanted: 5,
            hours_old: 72,
            country: "USA".to_string(),
            verbosity: 2,
        }
    }
}

/// Log filter directive for a verbosity level.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}
