//! LinkedIn's public (logged-out) job search listing.

use chrono::NaiveDate;
use common::{CompensationInterval, JobPost, Site};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::SiteError;
use crate::salary::extract_compensation;
use crate::{SearchQuery, SiteSource, mentions_remote, text_of};

const SEARCH_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const PAGE_SIZE: usize = 10;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.base-search-card").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.base-card__full-link").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.base-search-card__title").unwrap());
static COMPANY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h4.base-search-card__subtitle").unwrap());
static LOCATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.job-search-card__location").unwrap());
static SALARY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.job-search-card__salary-info").unwrap());
static LISTED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("time.job-search-card__listdate, time.job-search-card__listdate--new").unwrap()
});

pub struct LinkedIn {
    search_url: String,
}

impl LinkedIn {
    pub fn new() -> Self {
        Self::with_search_url(SEARCH_URL)
    }

    pub(crate) fn with_search_url(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
        }
    }

    fn post_from_card(card: ElementRef<'_>) -> Option<JobPost> {
        let href = card
            .select(&LINK)
            .next()
            .and_then(|el| el.value().attr("href"));

        let id = card
            .value()
            .attr("data-entity-urn")
            .and_then(|urn| urn.rsplit(':').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| href.and_then(id_from_href))?;

        let title = text_of(card, &TITLE).filter(|t| !t.is_empty())?;
        let company = text_of(card, &COMPANY).unwrap_or_default();
        let location = text_of(card, &LOCATION).unwrap_or_default();

        let date_posted = card
            .select(&LISTED)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        // Listed salaries are annual unless the text says otherwise.
        let compensation = text_of(card, &SALARY)
            .and_then(|text| extract_compensation(&text))
            .map(|mut pay| {
                pay.interval.get_or_insert(CompensationInterval::Yearly);
                pay
            });

        let is_remote = mentions_remote(&location) || mentions_remote(&title);

        Some(JobPost {
            id: format!("li-{id}"),
            site: Site::LinkedIn,
            job_url: format!("https://www.linkedin.com/jobs/view/{id}"),
            title,
            company,
            location,
            date_posted,
            compensation,
            is_remote: Some(is_remote),
            description: String::new(),
        })
    }
}

impl Default for LinkedIn {
    fn default() -> Self {
        Self::new()
    }
}

/// `/jobs/view/software-engineer-at-acme-4012345678?position=1` -> `4012345678`
fn id_from_href(href: &str) -> Option<String> {
    let path = href.split('?').next()?;
    let slug = path.trim_end_matches('/').rsplit('/').next()?;
    let id = slug.rsplit('-').next()?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
}

impl SiteSource for LinkedIn {
    fn site(&self) -> Site {
        Site::LinkedIn
    }

    fn search_url(&self, query: &SearchQuery, page: usize) -> Result<Url, SiteError> {
        let start = (page * PAGE_SIZE).to_string();
        let window = format!("r{}", u64::from(query.hours_old) * 3600);

        let mut params = vec![
            ("keywords", query.search_term.as_str()),
            ("location", query.location.as_str()),
            ("start", start.as_str()),
        ];
        if query.hours_old > 0 {
            params.push(("f_TPR", window.as_str()));
        }

        Ok(Url::parse_with_params(&self.search_url, &params)?)
    }

    fn parse_page(&self, html: &str) -> Vec<JobPost> {
        let document = Html::parse_document(html);
        document
            .select(&CARD)
            .filter_map(Self::post_from_card)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<li>
  <div class="base-card base-search-card job-search-card" data-entity-urn="urn:li:jobPosting:4012345678">
    <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/software-engineer-at-acme-4012345678?position=1&amp;pageNum=0">
      <span class="sr-only">Software Engineer</span>
    </a>
    <div class="base-search-card__info">
      <h3 class="base-search-card__title">
        Software Engineer
      </h3>
      <h4 class="base-search-card__subtitle"><a href="https://www.linkedin.com/company/acme">Acme</a></h4>
      <div class="base-search-card__metadata">
        <span class="job-search-card__salary-info">$150,000.00 - $190,000.00</span>
        <span class="job-search-card__location">San Francisco, CA</span>
        <time class="job-search-card__listdate" datetime="2026-10-17">2 days ago</time>
      </div>
    </div>
  </div>
</li>
<li>
  <div class="base-card base-search-card job-search-card">
    <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/platform-engineer-remote-at-globex-4099999999?position=2"></a>
    <h3 class="base-search-card__title">Platform Engineer (Remote)</h3>
    <h4 class="base-search-card__subtitle">Globex</h4>
    <span class="job-search-card__location">United States</span>
    <time class="job-search-card__listdate--new" datetime="2026-10-19">1 hour ago</time>
  </div>
</li>
<li><div class="base-search-card"><h3 class="base-search-card__title">No id anywhere</h3></div></li>
"#;

    #[test]
    fn test_search_url() {
        let query = SearchQuery {
            search_term: "software engineer".to_string(),
            location: "San Francisco, CA".to_string(),
            hours_old: 72,
        };
        let url = LinkedIn::new().search_url(&query, 2).unwrap();
        assert_eq!(url.host_str(), Some("www.linkedin.com"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("keywords".to_string(), "software engineer".to_string())));
        assert!(pairs.contains(&("start".to_string(), "20".to_string())));
        assert!(pairs.contains(&("f_TPR".to_string(), "r259200".to_string())));
    }

    #[test]
    fn test_parse_cards() {
        let posts = LinkedIn::new().parse_page(PAGE);
        assert_eq!(posts.len(), 2);

        let first = &posts[0];
        assert_eq!(first.id, "li-4012345678");
        assert_eq!(first.job_url, "https://www.linkedin.com/jobs/view/4012345678");
        assert_eq!(first.title, "Software Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "San Francisco, CA");
        assert_eq!(first.date_posted, NaiveDate::from_ymd_opt(2026, 10, 17));
        assert_eq!(first.is_remote, Some(false));

        let pay = first.compensation.as_ref().unwrap();
        assert_eq!(pay.min_amount, Some(150000.0));
        assert_eq!(pay.max_amount, Some(190000.0));
        assert_eq!(pay.interval, Some(CompensationInterval::Yearly));

        let second = &posts[1];
        assert_eq!(second.id, "li-4099999999");
        assert_eq!(second.is_remote, Some(true));
        assert_eq!(second.date_posted, NaiveDate::from_ymd_opt(2026, 10, 19));
        assert!(second.compensation.is_none());
    }

    #[test]
    fn test_id_from_href() {
        assert_eq!(
            id_from_href("https://www.linkedin.com/jobs/view/rust-dev-at-x-123?refId=a"),
            Some("123".to_string())
        );
        assert_eq!(id_from_href("https://www.linkedin.com/jobs/view/rust-dev"), None);
    }
}
