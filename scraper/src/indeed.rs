//! Indeed search result pages.

use chrono::{DateTime, Utc};
use common::{Compensation, Country, JobPost, Site};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::SiteError;
use crate::salary::{extract_compensation, parse_interval};
use crate::{SearchQuery, SiteSource, mentions_remote, text_of};

const PAGE_SIZE: usize = 10;

/// Indeed ships the result list as a JSON model assigned to this global.
const JOB_CARDS_MARKER: &str = r#"window.mosaic.providerData["mosaic-provider-jobcards"]"#;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.job_seen_beacon").unwrap());
static JOB_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("h2.jobTitle a[data-jk]").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.jobTitle span[title], h2.jobTitle span").unwrap());
static COMPANY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-testid="company-name"]"#).unwrap());
static LOCATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-testid="text-location"]"#).unwrap());
static SALARY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#".salary-snippet-container, [data-testid="attribute_snippet_testid"]"#)
        .unwrap()
});
static SNIPPET: Lazy<Selector> = Lazy::new(|| Selector::parse(".job-snippet").unwrap());

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderData {
    meta_data: MetaData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaData {
    mosaic_provider_job_cards_model: JobCardsModel,
}

#[derive(Debug, Deserialize)]
struct JobCardsModel {
    #[serde(default)]
    results: Vec<JobCard>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobCard {
    jobkey: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    formatted_location: String,
    /// Milliseconds since the Unix epoch.
    pub_date: Option<i64>,
    salary_snippet: Option<SalarySnippet>,
    extracted_salary: Option<ExtractedSalary>,
    #[serde(default)]
    remote_location: bool,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SalarySnippet {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractedSalary {
    min: f64,
    max: f64,
    #[serde(rename = "type")]
    kind: String,
}

pub struct Indeed {
    /// Scheme and host, without a trailing slash.
    base_url: String,
}

impl Indeed {
    pub fn new(country: Country) -> Self {
        Self::with_base_url(format!("https://{}", country.indeed_host()))
    }

    pub(crate) fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn job_url(&self, job_key: &str) -> String {
        format!("{}/viewjob?jk={}", self.base_url, job_key)
    }

    fn parse_embedded(&self, html: &str) -> Option<Vec<JobPost>> {
        let start = html.find(JOB_CARDS_MARKER)?;
        let rest = &html[start + JOB_CARDS_MARKER.len()..];
        let rest = &rest[rest.find('{')?..];

        let provider = match serde_json::Deserializer::from_str(rest)
            .into_iter::<ProviderData>()
            .next()?
        {
            Ok(provider) => provider,
            Err(e) => {
                debug!(error = %e, "Indeed job card model did not parse, using HTML cards");
                return None;
            }
        };

        Some(
            provider
                .meta_data
                .mosaic_provider_job_cards_model
                .results
                .into_iter()
                .map(|card| self.post_from_card(card))
                .collect(),
        )
    }

    fn post_from_card(&self, card: JobCard) -> JobPost {
        let snippet_pay = card
            .salary_snippet
            .and_then(|s| s.text)
            .and_then(|text| extract_compensation(&text));

        let compensation = match card.extracted_salary {
            Some(salary) => Some(Compensation {
                interval: parse_interval(&salary.kind),
                min_amount: Some(salary.min),
                max_amount: Some(salary.max),
                currency: snippet_pay.and_then(|p| p.currency),
            }),
            None => snippet_pay,
        };

        let date_posted = card
            .pub_date
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive());

        let description = Html::parse_fragment(&card.snippet)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ");
        let description = description.split_whitespace().collect::<Vec<_>>().join(" ");

        let is_remote = card.remote_location
            || mentions_remote(&card.formatted_location)
            || mentions_remote(&card.title);

        JobPost {
            id: format!("in-{}", card.jobkey),
            site: Site::Indeed,
            job_url: self.job_url(&card.jobkey),
            title: card.title,
            company: card.company,
            location: card.formatted_location,
            date_posted,
            compensation,
            is_remote: Some(is_remote),
            description,
        }
    }

    fn parse_cards(&self, html: &str) -> Vec<JobPost> {
        let document = Html::parse_document(html);
        document
            .select(&CARD)
            .filter_map(|card| self.post_from_element(card))
            .collect()
    }

    fn post_from_element(&self, card: ElementRef<'_>) -> Option<JobPost> {
        let job_key = card
            .select(&JOB_LINK)
            .next()
            .and_then(|el| el.value().attr("data-jk"))?
            .to_string();

        let title = card
            .select(&TITLE)
            .next()
            .map(|el| {
                el.value()
                    .attr("title")
                    .map(str::to_string)
                    .unwrap_or_else(|| el.text().collect::<String>().trim().to_string())
            })
            .filter(|t| !t.is_empty())?;

        let company = text_of(card, &COMPANY).unwrap_or_default();
        let location = text_of(card, &LOCATION).unwrap_or_default();
        let compensation = card
            .select(&SALARY)
            .find_map(|el| extract_compensation(&el.text().collect::<String>()));
        let description = text_of(card, &SNIPPET).unwrap_or_default();
        let is_remote = mentions_remote(&location) || mentions_remote(&title);

        Some(JobPost {
            id: format!("in-{job_key}"),
            site: Site::Indeed,
            job_url: self.job_url(&job_key),
            title,
            company,
            location,
            date_posted: None,
            compensation,
            is_remote: Some(is_remote),
            description,
        })
    }
}

impl SiteSource for Indeed {
    fn site(&self) -> Site {
        Site::Indeed
    }

    fn search_url(&self, query: &SearchQuery, page: usize) -> Result<Url, SiteError> {
        let start = (page * PAGE_SIZE).to_string();
        let days = query.hours_old.div_ceil(24).to_string();

        let mut params = vec![
            ("q", query.search_term.as_str()),
            ("l", query.location.as_str()),
            ("start", start.as_str()),
        ];
        if query.hours_old > 0 {
            params.push(("fromage", days.as_str()));
        }

        Ok(Url::parse_with_params(
            &format!("{}/jobs", self.base_url),
            &params,
        )?)
    }

    fn parse_page(&self, html: &str) -> Vec<JobPost> {
        self.parse_embedded(html)
            .unwrap_or_else(|| self.parse_cards(html))
    }
}
