//! Pulls a pay range out of free-form salary text.

use common::{Compensation, CompensationInterval};
use once_cell::sync::Lazy;
use regex::Regex;

// Amounts may carry a currency symbol, thousands separators, a `K` suffix
// and a trailing ISO code, e.g. "$50,000", "£45.50", "120K USD".
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([$£€])?\s?(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s?([kK]\b)?\s?(USD|GBP|EUR|CAD|AUD)?").unwrap()
});

static INTERVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hourly|hour|hr|yearly|year|yr|annually|annual|annum|monthly|month|mo|weekly|week|wk|daily|day)\b").unwrap()
});

/// Extracts the minimum and maximum amounts, pay interval and currency.
/// A bare number with no currency marker only counts when it is at least
/// 1000, which keeps years and small counts out.
pub fn extract_compensation(text: &str) -> Option<Compensation> {
    let mut amounts = Vec::with_capacity(2);
    let mut currency = None;

    for cap in AMOUNT.captures_iter(text) {
        let symbol = cap.get(1).map(|m| m.as_str());
        let code = cap.get(4).map(|m| m.as_str());
        let thousands = cap.get(3).is_some();

        let clean_number: String = cap[2].chars().filter(|c| *c != ',').collect();
        let Ok(mut amount) = clean_number.parse::<f64>() else {
            continue;
        };
        if thousands {
            amount *= 1000.0;
        }

        let marked = symbol.is_some() || code.is_some();
        if !marked && (thousands || amount < 1000.0) {
            continue;
        }

        if currency.is_none() {
            currency = code.map(str::to_string).or_else(|| symbol.map(currency_for_symbol));
        }
        amounts.push(amount);
        if amounts.len() == 2 {
            break;
        }
    }

    let min_amount = *amounts.first()?;
    let max_amount = amounts.get(1).copied().unwrap_or(min_amount);

    Some(Compensation {
        interval: extract_interval(text),
        min_amount: Some(min_amount.min(max_amount)),
        max_amount: Some(min_amount.max(max_amount)),
        currency,
    })
}

/// Maps an interval keyword (or Indeed's salary `type`) to an interval.
pub fn parse_interval(word: &str) -> Option<CompensationInterval> {
    match word.to_ascii_lowercase().as_str() {
        "hourly" | "hour" | "hr" => Some(CompensationInterval::Hourly),
        "yearly" | "year" | "yr" | "annually" | "annual" | "annum" => {
            Some(CompensationInterval::Yearly)
        }
        "monthly" | "month" | "mo" => Some(CompensationInterval::Monthly),
        "weekly" | "week" | "wk" => Some(CompensationInterval::Weekly),
        "daily" | "day" => Some(CompensationInterval::Daily),
        _ => None,
    }
}

fn extract_interval(text: &str) -> Option<CompensationInterval> {
    INTERVAL
        .captures(text)
        .and_then(|cap| parse_interval(&cap[1]))
}

fn currency_for_symbol(symbol: &str) -> String {
    match symbol {
        "£" => "GBP",
        "€" => "EUR",
        _ => "USD",
    }
    .to_string()
}
