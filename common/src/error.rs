use thiserror::Error;

/// Anything that can go wrong during a scrape or while exporting its results.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Invalid country: {0}")]
    InvalidCountry(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Every requested site failed; carries `(site, reason)` pairs.
    #[error("All job sites failed: {}", format_failures(.0))]
    AllSitesFailed(Vec<(String, String)>),

    #[error("Row {row} has {found} values but the frame has {expected} columns")]
    Shape {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(site, reason)| format!("{site}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}
