use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ScrapeError;

/// A job board the scraper knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Indeed,
    LinkedIn,
}

impl Site {
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Indeed => "indeed",
            Site::LinkedIn => "linkedin",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Country qualifier. Only Indeed is country-specific, via its regional host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Usa,
    Uk,
    Canada,
    Australia,
    Germany,
    France,
    India,
    Ireland,
    Netherlands,
    Singapore,
}

impl Country {
    /// Resolves a free-form country name or code.
    pub fn parse(name: &str) -> Result<Self, ScrapeError> {
        let country = match name.trim().to_ascii_lowercase().as_str() {
            "usa" | "us" | "united states" | "united states of america" => Country::Usa,
            "uk" | "gb" | "united kingdom" | "great britain" => Country::Uk,
            "canada" | "ca" => Country::Canada,
            "australia" | "au" => Country::Australia,
            "germany" | "de" => Country::Germany,
            "france" | "fr" => Country::France,
            "india" | "in" => Country::India,
            "ireland" | "ie" => Country::Ireland,
            "netherlands" | "nl" => Country::Netherlands,
            "singapore" | "sg" => Country::Singapore,
            _ => return Err(ScrapeError::InvalidCountry(name.to_string())),
        };
        Ok(country)
    }

    pub fn indeed_host(&self) -> &'static str {
        match self {
            Country::Usa => "www.indeed.com",
            Country::Uk => "uk.indeed.com",
            Country::Canada => "ca.indeed.com",
            Country::Australia => "au.indeed.com",
            Country::Germany => "de.indeed.com",
            Country::France => "fr.indeed.com",
            Country::India => "in.indeed.com",
            Country::Ireland => "ie.indeed.com",
            Country::Netherlands => "nl.indeed.com",
            Country::Singapore => "sg.indeed.com",
        }
    }
}
