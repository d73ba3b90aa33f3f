use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid base url '{0}'")]
    InvalidBaseUrl(String, #[source] url::ParseError),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write output file '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),

    #[error("Blocking file task failed")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Gave up on {date} after {attempts} failed connection attempts")]
    RetriesExhausted { date: NaiveDate, attempts: u32 },
}
