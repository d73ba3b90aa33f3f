use crate::analysis::error::AnalysisError;
use polars::prelude::*;
use std::path::Path;

/// Observation timestamp column of the history pages, `YYYY-MM-DD HH:MM:SS`.
pub const TIME_COLUMN: &str = "Time";
pub const DAY_COLUMN: &str = "day";
pub const HOUR_COLUMN: &str = "hour";

/// Reduces every day to (at most) 24 rows: the mean of each numeric column per hour.
///
/// `day` is the first ten characters of `Time` and `hour` the two characters eight
/// from its end. Non-numeric columns are dropped. The result is sorted by day and hour.
///
/// # Errors
///
/// [`AnalysisError::MissingColumn`] if there is no `Time` column.
pub fn hourly_averages(df: &DataFrame) -> Result<DataFrame, AnalysisError> {
    if df.column(TIME_COLUMN).is_err() {
        return Err(AnalysisError::MissingColumn(TIME_COLUMN.to_string()));
    }

    let means: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != TIME_COLUMN)
        .filter(|c| c.dtype().is_integer() || c.dtype().is_float())
        .map(|c| col(c.name().clone()).cast(DataType::Float64).mean())
        .collect();

    let time = col(TIME_COLUMN).cast(DataType::String);
    let hourly = df
        .clone()
        .lazy()
        .with_columns([
            time.clone().str().slice(lit(0i64), lit(10u64)).alias(DAY_COLUMN),
            time.str().slice(lit(-8i64), lit(2u64)).alias(HOUR_COLUMN),
        ])
        .group_by([col(DAY_COLUMN), col(HOUR_COLUMN)])
        .agg(means)
        .sort([DAY_COLUMN, HOUR_COLUMN], SortMultipleOptions::default())
        .collect()?;
    Ok(hourly)
}

/// Writes a table (typically the hourly averages) as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), AnalysisError> {
    let file =
        std::fs::File::create(path).map_err(|e| AnalysisError::Write(path.to_path_buf(), e))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| AnalysisError::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
