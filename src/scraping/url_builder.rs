//! Builds the per-day history request URL.

use crate::scraping::error::ScrapeError;
use crate::types::query_params::QueryParams;
use chrono::{Datelike, NaiveDate};
use url::{form_urlencoded, Url};

/// Builds the complete history URL for one day.
///
/// The query of `base_url` is replaced by the invariant pairs of `params` followed by
/// `year`, `month` and `day` taken from `date`. Any date keys already present in
/// `params` are ignored, so stale values never leak into a request. Keys and values
/// are form-urlencoded.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidBaseUrl`] if `base_url` cannot be parsed.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wunder_history::{build_url, QueryParams};
///
/// let params = QueryParams::wunderground("KCASANFR58", "day", 1);
/// let date = NaiveDate::from_ymd_opt(2015, 7, 4).unwrap();
/// let url = build_url(date, "https://example.com/WXDailyHistory.asp", &params).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://example.com/WXDailyHistory.asp?ID=KCASANFR58&graphspan=day&format=1&year=2015&month=7&day=4"
/// );
/// ```
pub fn build_url(date: NaiveDate, base_url: &str, params: &QueryParams) -> Result<Url, ScrapeError> {
    let mut url =
        Url::parse(base_url).map_err(|e| ScrapeError::InvalidBaseUrl(base_url.to_string(), e))?;

    let year = date.year().to_string();
    let month = date.month().to_string();
    let day = date.day().to_string();

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.invariant_pairs())
        .append_pair("year", &year)
        .append_pair("month", &month)
        .append_pair("day", &day)
        .finish();
    url.set_query(Some(&query));

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const BASE: &str = "https://www.wunderground.com/weatherstation/WXDailyHistory.asp";

    fn pairs(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_build_url_sets_date_components() -> Result<(), Box<dyn std::error::Error>> {
        let params = QueryParams::wunderground("KCASANFR58", "day", 1);
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let url = build_url(date, BASE, &params)?;

        let q = pairs(&url);
        assert_eq!(q.get("ID").map(String::as_str), Some("KCASANFR58"));
        assert_eq!(q.get("graphspan").map(String::as_str), Some("day"));
        assert_eq!(q.get("format").map(String::as_str), Some("1"));
        assert_eq!(q.get("year").map(String::as_str), Some("2020"));
        assert_eq!(q.get("month").map(String::as_str), Some("1"));
        assert_eq!(q.get("day").map(String::as_str), Some("2"));
        assert_eq!(url.host_str(), Some("www.wunderground.com"));
        assert_eq!(url.path(), "/weatherstation/WXDailyHistory.asp");
        Ok(())
    }

    #[test]
    fn test_build_url_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let params = QueryParams::wunderground("KCASANFR58", "day", 1);
        let date = NaiveDate::from_ymd_opt(2016, 2, 29).unwrap();
        let a = build_url(date, BASE, &params)?;
        let b = build_url(date, BASE, &params)?;
        assert_eq!(pairs(&a), pairs(&b));
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_build_url_overrides_stale_date_keys() -> Result<(), Box<dyn std::error::Error>> {
        let params = QueryParams::wunderground("KCASANFR58", "day", 1)
            .with("year", 1999)
            .with("month", 12)
            .with("day", 31);
        let date = NaiveDate::from_ymd_opt(2021, 6, 15).unwrap();
        let url = build_url(date, BASE, &params)?;

        let year_values: Vec<_> = url.query_pairs().filter(|(k, _)| k == "year").collect();
        assert_eq!(year_values.len(), 1);
        let q = pairs(&url);
        assert_eq!(q["year"], "2021");
        assert_eq!(q["month"], "6");
        assert_eq!(q["day"], "15");

        // A second call on a different date sees nothing from the first.
        let next = NaiveDate::from_ymd_opt(2021, 6, 16).unwrap();
        let q = pairs(&build_url(next, BASE, &params)?);
        assert_eq!(q["day"], "16");
        Ok(())
    }

    #[test]
    fn test_build_url_encodes_reserved_characters() -> Result<(), Box<dyn std::error::Error>> {
        let params = QueryParams::new().with("ID", "A&B=C D/é");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let url = build_url(date, BASE, &params)?;

        let query = url.query().unwrap_or_default();
        assert!(query.starts_with("ID=A%26B%3DC+D%2F%C3%A9&"), "got {}", query);
        assert_eq!(pairs(&url)["ID"], "A&B=C D/é");
        Ok(())
    }

    #[test]
    fn test_build_url_replaces_existing_query() -> Result<(), Box<dyn std::error::Error>> {
        let params = QueryParams::new().with("ID", "X");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let url = build_url(date, "http://localhost:8080/history?stale=1", &params)?;
        assert!(!pairs(&url).contains_key("stale"));
        Ok(())
    }

    #[test]
    fn test_build_url_rejects_malformed_base() {
        let params = QueryParams::new();
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let err = build_url(date, "not a url", &params).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidBaseUrl(ref base, _) if base == "not a url"));
    }
}
