//! Reads the per-day files written by the scraper back into one `DataFrame`.

use crate::analysis::error::AnalysisError;
use crate::scraping::output::DEFAULT_EXTENSION;
use bon::Builder;
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Which files to read and which of their columns to keep.
#[derive(Debug, Clone, Builder)]
pub struct LoadOptions {
    /// Extension of the day files, without the dot.
    #[builder(into, default = String::from(DEFAULT_EXTENSION))]
    pub extension: String,
    /// Columns to keep. `None` keeps all of them.
    pub columns: Option<Vec<String>>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Day files in `dir` with the given extension, sorted by name (and so by date).
pub fn list_day_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, AnalysisError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| AnalysisError::ReadDir(dir.to_path_buf(), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| AnalysisError::ReadDir(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parses one day file. Returns `None` when the server sent only a header.
///
/// The scraped pages keep an empty line wherever a `<br>` was removed; those lines are
/// dropped before parsing. Data rows end with a delimiter the header lacks, so fields
/// beyond the header's columns are truncated.
pub fn read_day_file(path: &Path) -> Result<Option<DataFrame>, AnalysisError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| AnalysisError::ReadFile(path.to_path_buf(), e))?;
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Ok(None);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(lines.join("\n").into_bytes()))
        .finish()
        .map_err(|e| AnalysisError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok((df.height() > 0).then_some(df))
}

/// Reads every day file in `dir` and stacks them into one frame.
///
/// Column types are widened across files (a column that is integral in one day and
/// fractional in another ends up as `f64`).
///
/// # Errors
///
/// * [`AnalysisError::NoDataFiles`] if no file holds any data row.
/// * [`AnalysisError::MissingColumn`] if a requested column is absent from a file.
pub fn load_day_files(dir: &Path, options: &LoadOptions) -> Result<DataFrame, AnalysisError> {
    let files = list_day_files(dir, &options.extension)?;
    let mut frames = Vec::with_capacity(files.len());

    for path in &files {
        let Some(df) = read_day_file(path)? else {
            debug!("No data rows in {}, skipping", path.display());
            continue;
        };
        let df = match &options.columns {
            Some(columns) => select_columns(df, columns)?,
            None => df,
        };
        debug!("Adding file: {} ({} rows)", path.display(), df.height());
        frames.push(df.lazy());
    }

    if frames.is_empty() {
        return Err(AnalysisError::NoDataFiles(dir.to_path_buf()));
    }
    info!(
        "Loaded {} of {} day files from {}",
        frames.len(),
        files.len(),
        dir.display()
    );

    let combined = concat(
        frames,
        UnionArgs {
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;
    Ok(combined)
}

fn select_columns(df: DataFrame, columns: &[String]) -> Result<DataFrame, AnalysisError> {
    let present = df.get_column_names();
    if let Some(missing) = columns
        .iter()
        .find(|c| !present.iter().any(|p| p.as_str() == c.as_str()))
    {
        return Err(AnalysisError::MissingColumn(missing.clone()));
    }
    Ok(df.select(columns.iter().map(|c| c.as_str()))?)
}
