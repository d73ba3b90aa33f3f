//! Scrape run configuration, read from a TOML file.
//!
//! ```toml
//! [paths]
//! log_path = "scrape.log"
//! out_dir = "data"
//!
//! [params]
//! base_url = "https://www.wunderground.com/weatherstation/WXDailyHistory.asp"
//! start_date = "2020, 1, 1"
//! end_date = "2020, 1, 3"
//! station_id = "KCASANFR58"
//! graphspan = "day"
//! format = 1
//! sleep_time = 5
//! ```
//!
//! Optional keys under `[params]`: `max_attempts`, `skip_existing`, `extension` and
//! `request_timeout_secs`.

use crate::scraping::error::ScrapeError;
use crate::scraping::output::DEFAULT_EXTENSION;
use crate::scraping::pacing::TokioSleeper;
use crate::scraping::page_source::HttpPageSource;
use crate::scraping::scraper::HistoryScraper;
use crate::types::date_range::DateRange;
use crate::types::query_params::QueryParams;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {field} '{value}', expected 'year, month, day'")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid base url '{0}'")]
    InvalidBaseUrl(String, #[source] url::ParseError),

    #[error("Invalid {field} {value}, expected a finite number of seconds >= 0")]
    InvalidSeconds { field: &'static str, value: f64 },

    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    paths: RawPaths,
    params: RawParams,
}

#[derive(Debug, Deserialize)]
struct RawPaths {
    log_path: PathBuf,
    out_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawParams {
    base_url: String,
    start_date: String,
    end_date: String,
    station_id: String,
    graphspan: String,
    format: u32,
    sleep_time: f64,
    max_attempts: Option<u32>,
    #[serde(default)]
    skip_existing: bool,
    extension: Option<String>,
    request_timeout_secs: Option<f64>,
}

/// Everything one `scrape` invocation needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub log_path: PathBuf,
    pub out_dir: PathBuf,
    pub base_url: String,
    pub range: DateRange,
    pub params: QueryParams,
    pub base_sleep: Duration,
    pub max_attempts: Option<u32>,
    pub skip_existing: bool,
    pub extension: String,
    pub request_timeout: Option<Duration>,
}

impl ScrapeConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let params = raw.params;

        Url::parse(&params.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(params.base_url.clone(), e))?;
        let start = parse_date_triple("start_date", &params.start_date)?;
        let end = parse_date_triple("end_date", &params.end_date)?;
        let base_sleep = seconds("sleep_time", params.sleep_time)?;
        let request_timeout = params
            .request_timeout_secs
            .map(|s| seconds("request_timeout_secs", s))
            .transpose()?;
        if params.max_attempts == Some(0) {
            return Err(ConfigError::InvalidMaxAttempts);
        }

        Ok(Self {
            log_path: raw.paths.log_path,
            out_dir: raw.paths.out_dir,
            base_url: params.base_url,
            range: DateRange::new(start, end),
            params: QueryParams::wunderground(&params.station_id, &params.graphspan, params.format),
            base_sleep,
            max_attempts: params.max_attempts,
            skip_existing: params.skip_existing,
            extension: params
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            request_timeout,
        })
    }

    /// Scraper that talks to the real site and sleeps on the tokio timer.
    pub fn http_scraper(&self) -> Result<HistoryScraper<HttpPageSource, TokioSleeper>, ScrapeError> {
        Ok(HistoryScraper::builder()
            .source(HttpPageSource::new(self.request_timeout)?)
            .sleeper(TokioSleeper)
            .base_url(self.base_url.clone())
            .params(self.params.clone())
            .base_sleep(self.base_sleep)
            .out_dir(self.out_dir.clone())
            .extension(self.extension.clone())
            .maybe_max_attempts(self.max_attempts)
            .skip_existing(self.skip_existing)
            .build())
    }
}

/// Parses `"2015, 1, 31"` into a date.
pub fn parse_date_triple(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    let invalid = || ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    };
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    let [year, month, day] = parts[..] else {
        return Err(invalid());
    };
    let year = i32::try_from(year).map_err(|_| invalid())?;
    let month = u32::try_from(month).map_err(|_| invalid())?;
    let day = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidSeconds { field, value })
}
