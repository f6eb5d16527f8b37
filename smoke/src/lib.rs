//! Smoke test for the job scraper.
//!
//! Runs one scrape, prints what came back and saves it as CSV. Any failure
//! ends up as a short report with the usual suspects; the run itself never
//! fails because the scrape did.

use common::{CsvOptions, ResultSet, ScrapeConfig, ScrapeError, ScrapeJobs};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

pub const BANNER: &str = "Testing JobSpy library...";
pub const OUTPUT_FILE: &str = "test_jobs.csv";
const PREVIEW_ROWS: usize = 5;

const POSSIBLE_CAUSES: [&str; 4] = [
    "Rate limiting from job sites",
    "Network connectivity issues",
    "Missing dependencies",
    "Site structure changes",
];

/// Everything a smoke run needs; `Default` is the standard run.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub scrape: ScrapeConfig,
    pub output_path: PathBuf,
    pub preview_rows: usize,
    pub csv: CsvOptions,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            scrape: ScrapeConfig::default(),
            output_path: PathBuf::from(OUTPUT_FILE),
            preview_rows: PREVIEW_ROWS,
            csv: CsvOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found { count: usize, output_path: PathBuf },
    Empty,
    Failed { message: String },
}

pub struct SmokeTest<S> {
    scraper: S,
    config: SmokeConfig,
}

impl<S: ScrapeJobs> SmokeTest<S> {
    pub fn new(scraper: S, config: SmokeConfig) -> Self {
        Self { scraper, config }
    }

    /// Runs the scrape once and writes the report to `out`.
    ///
    /// Only a failure to write the report itself is returned as an error.
    pub fn run<W: Write>(&self, out: &mut W) -> io::Result<Outcome> {
        writeln!(out, "{BANNER}")?;

        let jobs = match self.scraper.scrape_jobs(&self.config.scrape) {
            Ok(jobs) => jobs,
            Err(e) => return Self::fail(out, &e),
        };

        let count = jobs.len();
        writeln!(out, "✅ Success! Found {count} jobs")?;

        if jobs.is_empty() {
            warn!("Scrape returned no jobs");
            writeln!(
                out,
                "⚠️ No jobs found - this might be due to rate limiting or site restrictions"
            )?;
            return Ok(Outcome::Empty);
        }

        writeln!(out, "\nSample job data:")?;
        writeln!(out, "{}", jobs.head(self.config.preview_rows))?;

        let output_path = &self.config.output_path;
        if let Err(e) = jobs.write_csv(output_path, &self.config.csv) {
            return Self::fail(out, &e);
        }
        info!(count, path = %output_path.display(), "Saved results");
        writeln!(out, "\n💾 Results saved to {}", output_path.display())?;

        writeln!(out, "\nColumns available: {:?}", jobs.columns())?;

        Ok(Outcome::Found {
            count,
            output_path: output_path.clone(),
        })
    }

    fn fail<W: Write>(out: &mut W, err: &ScrapeError) -> io::Result<Outcome> {
        error!(error = %err, "Smoke test failed");
        write!(out, "{}", failure_report(err))?;
        Ok(Outcome::Failed {
            message: err.to_string(),
        })
    }
}

/// The console text printed for a failed run.
pub fn failure_report(err: &ScrapeError) -> String {
    let mut report = format!("❌ Error occurred: {err}\n\nThis might be due to:\n");
    for cause in POSSIBLE_CAUSES {
        report.push_str("- ");
        report.push_str(cause);
        report.push('\n');
    }
    report
}
