//! Job board scraper
//!
//! Searches Indeed and LinkedIn for postings matching a [`ScrapeConfig`]
//! and returns them as a [`JobFrame`].

mod error;
mod indeed;
mod linkedin;
mod salary;
mod telemetry;

use chrono::{NaiveDate, Utc};
use common::{Country, JobFrame, JobPost, ScrapeConfig, ScrapeError, ScrapeJobs, Site};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub use telemetry::init_telemetry;

use error::SiteError;
use indeed::Indeed;
use linkedin::LinkedIn;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hard stop on pagination per site, however few results came back.
const MAX_PAGES: usize = 10;

/// The parts of a [`ScrapeConfig`] a site needs to build its search URL.
pub(crate) struct SearchQuery {
    pub search_term: String,
    pub location: String,
    pub hours_old: u32,
}

/// One job board: where to search and how to read a result page.
pub(crate) trait SiteSource: Sync {
    fn site(&self) -> Site;

    fn search_url(&self, query: &SearchQuery, page: usize) -> Result<Url, SiteError>;

    fn parse_page(&self, html: &str) -> Vec<JobPost>;
}

/// Blocking scraper over all supported job boards.
pub struct JobScraper {
    client: Client,
}

impl JobScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    fn fetch(&self, url: &Url) -> Result<String, SiteError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SiteError::RateLimited);
        }
        if !status.is_success() {
            return Err(SiteError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }

    fn scrape_site(
        &self,
        source: &dyn SiteSource,
        query: &SearchQuery,
        results_wanted: usize,
        today: NaiveDate,
    ) -> Result<Vec<JobPost>, SiteError> {
        let site = source.site();
        collect_pages(
            site,
            results_wanted,
            query.hours_old,
            today,
            |page| {
                let url = source.search_url(query, page)?;
                info!(%site, %url, "Fetching search page");
                let html = self.fetch(&url)?;
                debug!(%site, bytes = html.len(), "Fetched search page");
                Ok(source.parse_page(&html))
            },
        )
    }

    /// Scrapes every source on its own thread and merges the results in
    /// source order.
    fn scrape_sources(
        &self,
        sources: &[Box<dyn SiteSource>],
        query: &SearchQuery,
        results_wanted: usize,
        today: NaiveDate,
    ) -> Result<JobFrame, ScrapeError> {
        let outcomes: Vec<(Site, Result<Vec<JobPost>, SiteError>)> = thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let source = source.as_ref();
                    let handle = scope.spawn(move || {
                        self.scrape_site(source, query, results_wanted, today)
                    });
                    (source.site(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(site, handle)| (site, handle.join().unwrap_or(Err(SiteError::Panicked))))
                .collect()
        });

        merge_outcomes(outcomes)
    }
}

impl ScrapeJobs for JobScraper {
    type Output = JobFrame;

    fn scrape_jobs(&self, config: &ScrapeConfig) -> Result<JobFrame, ScrapeError> {
        if let Ok(json) = serde_json::to_string(config) {
            debug!(config = %json, "Starting scrape");
        }

        let country = Country::parse(&config.country)?;
        let query = SearchQuery {
            search_term: config.search_term.clone(),
            location: config.location.clone(),
            hours_old: config.hours_old,
        };
        let today = Utc::now().date_naive();

        let sources: Vec<Box<dyn SiteSource>> = config
            .sources
            .iter()
            .map(|site| -> Box<dyn SiteSource> {
                match site {
                    Site::Indeed => Box::new(Indeed::new(country)),
                    Site::LinkedIn => Box::new(LinkedIn::new()),
                }
            })
            .collect();

        self.scrape_sources(&sources, &query, config.results_wanted, today)
    }
}

/// Paginates one site until enough distinct, fresh postings are collected.
///
/// A failure on the first productive page fails the site; a failure later on
/// keeps what was gathered so far.
fn collect_pages<F>(
    site: Site,
    results_wanted: usize,
    hours_old: u32,
    today: NaiveDate,
    mut fetch_page: F,
) -> Result<Vec<JobPost>, SiteError>
where
    F: FnMut(usize) -> Result<Vec<JobPost>, SiteError>,
{
    let mut posts: Vec<JobPost> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for page in 0..MAX_PAGES {
        if posts.len() >= results_wanted {
            break;
        }

        let batch = match fetch_page(page) {
            Ok(batch) => batch,
            Err(e) if posts.is_empty() => return Err(e),
            Err(e) => {
                warn!(%site, page, error = %e, "Stopping early, keeping results so far");
                break;
            }
        };

        let mut unseen = 0;
        for post in batch {
            // Skip duplicates (same job may appear on several pages)
            if !seen_urls.insert(post.job_url.clone()) {
                continue;
            }
            unseen += 1;
            if is_fresh(post.date_posted, hours_old, today) {
                debug!(%site, title = %post.title, company = %post.company, "Found job");
                posts.push(post);
            }
        }

        debug!(%site, page, unseen, total = posts.len(), "Processed search page");
        if unseen == 0 {
            break;
        }
    }

    posts.truncate(results_wanted);
    Ok(posts)
}

/// Whether a posting falls inside the freshness window (whole days, rounded
/// up). Undated postings and a zero window always pass.
fn is_fresh(date_posted: Option<NaiveDate>, hours_old: u32, today: NaiveDate) -> bool {
    let Some(date) = date_posted else {
        return true;
    };
    if hours_old == 0 {
        return true;
    }
    let days = i64::from(hours_old.div_ceil(24));
    today.signed_duration_since(date).num_days() <= days
}

fn merge_outcomes(
    outcomes: Vec<(Site, Result<Vec<JobPost>, SiteError>)>,
) -> Result<JobFrame, ScrapeError> {
    let requested = outcomes.len();
    let mut posts = Vec::new();
    let mut failures = Vec::new();

    for (site, outcome) in outcomes {
        match outcome {
            Ok(found) => {
                info!(%site, count = found.len(), "Finished scraping");
                posts.extend(found);
            }
            Err(e) => {
                warn!(%site, error = %e, "Scraping failed");
                failures.push((site.to_string(), e.to_string()));
            }
        }
    }

    if requested > 0 && failures.len() == requested {
        return Err(ScrapeError::AllSitesFailed(failures));
    }

    Ok(JobFrame::from_posts(&posts))
}

/// Trimmed, whitespace-collapsed text of the first match of `selector`.
pub(crate) fn text_of(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|el| {
        el.text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}

pub(crate) fn mentions_remote(text: &str) -> bool {
    text.to_ascii_lowercase().contains("remote")
}
