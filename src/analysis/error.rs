use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to list data directory '{0}'")]
    ReadDir(PathBuf, #[source] std::io::Error),

    #[error("Failed to read data file '{0}'")]
    ReadFile(PathBuf, #[source] std::io::Error),

    #[error("Parsing error processing CSV data in '{path}'")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("No data rows found in '{0}'")]
    NoDataFiles(PathBuf),

    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Column '{0}' has no numeric values")]
    EmptyMetric(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to draw plot: {0}")]
    Plot(String),

    #[error("Failed to write '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV '{path}'")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}
