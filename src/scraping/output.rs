use crate::scraping::error::ScrapeError;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Line-break tag the history pages put at the end of every row.
pub const LINE_BREAK_MARKER: &str = "<br>";

pub const DEFAULT_EXTENSION: &str = "csv";

/// `2020_01_02.csv` style name for the file holding one day.
pub fn output_file_name(date: NaiveDate, extension: &str) -> String {
    format!("{}.{}", date.format("%Y_%m_%d"), extension)
}

pub fn output_path(out_dir: &Path, date: NaiveDate, extension: &str) -> PathBuf {
    out_dir.join(output_file_name(date, extension))
}

pub fn strip_line_breaks(body: &str) -> String {
    body.replace(LINE_BREAK_MARKER, "")
}

/// Writes a page body to `path` with the line-break markers removed.
///
/// The body goes to a temporary file next to `path` first and is then renamed over it,
/// so an existing file is replaced whole and a crash never leaves half a day behind.
pub fn write_day_file(path: &Path, body: &str) -> Result<(), ScrapeError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| ScrapeError::OutputWrite(path.to_path_buf(), e))?;
    temp_file
        .write_all(strip_line_breaks(body).as_bytes())
        .map_err(|e| ScrapeError::OutputWrite(path.to_path_buf(), e))?;
    temp_file
        .flush()
        .map_err(|e| ScrapeError::OutputWrite(path.to_path_buf(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| ScrapeError::OutputWrite(path.to_path_buf(), e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(output_file_name(date, "csv"), "2020_01_02.csv");
        let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(output_file_name(date, "txt"), "1999_12_31.txt");
    }

    #[test]
    fn test_strip_line_breaks_removes_every_marker() {
        let body = "Time,TemperatureF,<br>\n2020-01-01 00:05:00,51.2,<br>\n<br><br>";
        assert_eq!(
            strip_line_breaks(body),
            "Time,TemperatureF,\n2020-01-01 00:05:00,51.2,\n"
        );
    }

    #[test]
    fn test_write_day_file_overwrites() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let path = output_path(dir.path(), date, DEFAULT_EXTENSION);

        write_day_file(&path, "first attempt, much longer body<br>")?;
        write_day_file(&path, "second<br>")?;

        assert_eq!(std::fs::read_to_string(&path)?, "second");
        // Only the day file remains, no temp files.
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_day_file_missing_dir_fails() {
        let path = Path::new("/definitely/not/here/2020_01_01.csv");
        let err = write_day_file(path, "x").unwrap_err();
        assert!(matches!(err, ScrapeError::OutputWrite(ref p, _) if p == path));
    }
}
