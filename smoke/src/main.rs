//! Runs the job scraper smoke test against the live job boards.

use job_scraper::{JobScraper, init_telemetry};
use jobspy_smoke::{BANNER, Outcome, SmokeConfig, SmokeTest, failure_report};
use std::io::{self, Write};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = SmokeConfig::default();
    init_telemetry(config.scrape.verbosity);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = match JobScraper::new() {
        Ok(scraper) => SmokeTest::new(scraper, config).run(&mut out)?,
        Err(e) => {
            writeln!(out, "{BANNER}")?;
            write!(out, "{}", failure_report(&e))?;
            Outcome::Failed {
                message: e.to_string(),
            }
        }
    };

    info!(?outcome, "Smoke test finished");
    Ok(())
}
