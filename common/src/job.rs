use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Site;

/// A single posting as extracted from a job board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JobPost {
    pub id: String,
    pub site: Site,
    pub job_url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub date_posted: Option<NaiveDate>,
    pub compensation: Option<Compensation>,
    pub is_remote: Option<bool>,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Compensation {
    pub interval: Option<CompensationInterval>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompensationInterval {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
}

impl CompensationInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationInterval::Yearly => "yearly",
            CompensationInterval::Monthly => "monthly",
            CompensationInterval::Weekly => "weekly",
            CompensationInterval::Daily => "daily",
            CompensationInterval::Hourly => "hourly",
        }
    }
}
