mod analysis;
mod config;
mod error;
mod logging;
mod scraping;
mod types;

pub use config::{parse_date_triple, ConfigError, ScrapeConfig};
pub use error::WunderError;
pub use logging::{init_console_log, init_run_log};

pub use scraping::error::ScrapeError;
pub use scraping::output::{
    output_file_name, output_path, strip_line_breaks, write_day_file, DEFAULT_EXTENSION,
    LINE_BREAK_MARKER,
};
pub use scraping::pacing::{pacing_delay, Backoff, Sleeper, TokioSleeper, PACING_HIGH, PACING_LOW};
pub use scraping::page_source::{FetchError, HttpPageSource, PageSource};
pub use scraping::scraper::{HistoryScraper, ScrapeSummary};
pub use scraping::url_builder::build_url;

pub use types::date_range::DateRange;
pub use types::query_params::{QueryParams, DATE_KEYS};

pub use analysis::distribution::{
    ecdf, hours_below_distribution, HoursBasis, HOURS_COLUMN, HOURS_PER_YEAR,
};
pub use analysis::error::AnalysisError;
pub use analysis::hourly::{hourly_averages, write_csv, DAY_COLUMN, HOUR_COLUMN, TIME_COLUMN};
pub use analysis::loader::{list_day_files, load_day_files, read_day_file, LoadOptions};
pub use analysis::plot::plot_hours_below;
