use crate::analysis::error::AnalysisError;
use crate::config::ConfigError;
use crate::scraping::error::ScrapeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WunderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to open log file '{0}'")]
    LogInit(PathBuf, #[source] std::io::Error),

    #[error("Failed to install logger")]
    Logger(#[from] log::SetLoggerError),
}
