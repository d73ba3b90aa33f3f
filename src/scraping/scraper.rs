//! The day-by-day history scrape loop.
//!
//! Each date of a [`DateRange`] goes through the same cycle: build the URL, request
//! it, write the body to that date's file, then wait a jittered pacing delay. A
//! connection failure keeps the loop on the same date with a doubling backoff sleep;
//! every other failure ends the run.

use crate::scraping::error::ScrapeError;
use crate::scraping::output::{output_path, write_day_file, DEFAULT_EXTENSION};
use crate::scraping::pacing::{pacing_delay, Backoff, Sleeper};
use crate::scraping::page_source::{FetchError, PageSource};
use crate::scraping::url_builder::build_url;
use crate::types::date_range::DateRange;
use crate::types::query_params::QueryParams;
use bon::Builder;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task;

/// Counters reported once the whole range has been walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Dates handled, downloaded or skipped.
    pub processed: usize,
    /// Day files written.
    pub written: usize,
    /// Dates skipped because their file already existed.
    pub skipped: usize,
    /// Connection failures that were retried.
    pub retries: u32,
}

/// Scrapes one history page per day and stores each under the output directory.
///
/// # Examples
///
/// ```no_run
/// # use wunder_history::{DateRange, HistoryScraper, HttpPageSource, QueryParams, TokioSleeper, WunderError};
/// # use chrono::NaiveDate;
/// # use std::time::Duration;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), WunderError> {
/// let scraper = HistoryScraper::builder()
///     .source(HttpPageSource::new(None)?)
///     .sleeper(TokioSleeper)
///     .base_url("https://www.wunderground.com/weatherstation/WXDailyHistory.asp")
///     .params(QueryParams::wunderground("KCASANFR58", "day", 1))
///     .base_sleep(Duration::from_secs(5))
///     .out_dir("data")
///     .max_attempts(10)
///     .build();
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
/// let summary = scraper.scrape(DateRange::new(start, end)).await?;
/// println!("{} files written", summary.written);
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct HistoryScraper<S, Z> {
    source: S,
    sleeper: Z,
    #[builder(into)]
    base_url: String,
    params: QueryParams,
    /// Centre of the pacing delay and starting value of the backoff.
    base_sleep: Duration,
    #[builder(into)]
    out_dir: PathBuf,
    #[builder(into, default = String::from(DEFAULT_EXTENSION))]
    extension: String,
    /// Failed connection attempts allowed per date. `None` retries forever.
    max_attempts: Option<u32>,
    /// Leave dates whose file already exists alone instead of downloading them again.
    #[builder(default)]
    skip_existing: bool,
}

impl<S: PageSource, Z: Sleeper> HistoryScraper<S, Z> {
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        output_path(&self.out_dir, date, &self.extension)
    }

    /// Walks `range` in ascending order, downloading and storing every date.
    ///
    /// # Errors
    ///
    /// * [`ScrapeError::OutputDirCreation`] if the output directory cannot be created.
    /// * [`ScrapeError::InvalidBaseUrl`] if the base URL does not parse.
    /// * [`ScrapeError::RetriesExhausted`] if `max_attempts` is set and a date keeps failing.
    /// * Any non-connection failure of the page source or of the file write.
    ///
    /// Files written before the error stay on disk.
    pub async fn scrape(&self, range: DateRange) -> Result<ScrapeSummary, ScrapeError> {
        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| ScrapeError::OutputDirCreation(self.out_dir.clone(), e))?;

        info!(
            "Start scraping {} ({} days) from {} with {}",
            range,
            range.num_days(),
            self.base_url,
            self.params
        );

        let mut summary = ScrapeSummary::default();
        for (index, date) in range.enumerate() {
            let path = self.path_for(date);
            if self.skip_existing && tokio::fs::try_exists(&path).await.unwrap_or(false) {
                info!("Skipping {}, {} already exists", date, path.display());
                summary.skipped += 1;
                summary.processed += 1;
                continue;
            }

            let url = build_url(date, &self.base_url, &self.params)?;
            let mut backoff = Backoff::new(self.base_sleep);
            let body = loop {
                println!("Downloading file number {}", index);
                info!(
                    "attempt download file no. {} ({}, attempt {})",
                    index,
                    date,
                    backoff.failures() + 1
                );
                info!("time to sleep {:.3}s", backoff.current().as_secs_f64());

                match self.source.fetch(&url).await {
                    Ok(body) => break body,
                    Err(FetchError::Connection { url, source }) => {
                        warn!("ConnectionError for {} ({}): {}", date, url, source);
                        let failed = backoff.failures() + 1;
                        if self.max_attempts.is_some_and(|max| failed >= max) {
                            return Err(ScrapeError::RetriesExhausted {
                                date,
                                attempts: failed,
                            });
                        }
                        let wait = backoff.fail();
                        summary.retries += 1;
                        self.sleeper.sleep(wait).await;
                    }
                    Err(FetchError::Fatal(e)) => return Err(e),
                }
            };

            let target = path.clone();
            task::spawn_blocking(move || write_day_file(&target, &body)).await??;
            summary.written += 1;
            summary.processed += 1;

            let delay = pacing_delay(self.base_sleep, &mut rand::rng());
            info!(
                "Wrote {}, pausing {:.3}s before the next request",
                path.display(),
                delay.as_secs_f64()
            );
            self.sleeper.sleep(delay).await;
        }

        info!(
            "Finished scraping: {} dates processed, {} files written, {} skipped, {} retries",
            summary.processed, summary.written, summary.skipped, summary.retries
        );
        Ok(summary)
    }
}
