//! wunder-history: scrape Weather Underground station history and summarise it.
//!
//! `wunder-history scrape station.toml` downloads one file per day of the configured
//! range. `wunder-history analyze data/ hours_below.svg` turns those files into hourly
//! averages and plots how many hours per year are spent at or below each value of a
//! metric.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use wunder_history::{
    hourly_averages, hours_below_distribution, init_console_log, init_run_log, load_day_files,
    plot_hours_below, write_csv, HoursBasis, LoadOptions, ScrapeConfig, DEFAULT_EXTENSION,
};

#[derive(Parser)]
#[command(name = "wunder-history", version, about = "Weather Underground history scraper")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download one history file per day of the configured date range.
    Scrape {
        /// TOML config with [paths] and [params] sections.
        config: PathBuf,
    },
    /// Average scraped files per hour and plot the hours-below distribution of one metric.
    Analyze {
        /// Directory holding the scraped day files.
        data_dir: PathBuf,
        /// Where to write the SVG plot.
        figure: PathBuf,
        /// Numeric column to build the distribution from.
        #[arg(long, default_value = "TemperatureF")]
        metric: String,
        /// Only read these columns (comma separated). `Time` is always needed.
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
        /// Extension of the day files.
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
        /// Count every observed hour instead of scaling to a 365-day year.
        #[arg(long)]
        total_hours: bool,
        /// Also write the hourly averages to this CSV file.
        #[arg(long)]
        hourly_out: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scrape { config } => scrape(config).await,
        Command::Analyze {
            data_dir,
            figure,
            metric,
            columns,
            extension,
            total_hours,
            hourly_out,
        } => {
            init_console_log()?;
            let options = LoadOptions::builder()
                .extension(extension)
                .maybe_columns(columns)
                .build();
            let basis = if total_hours {
                HoursBasis::Observed
            } else {
                HoursBasis::Year
            };
            analyze(data_dir, figure, &metric, &options, basis, hourly_out)
        }
    }
}

async fn scrape(config_path: PathBuf) -> anyhow::Result<()> {
    let config = ScrapeConfig::from_path(&config_path)
        .with_context(|| format!("Invalid config {}", config_path.display()))?;
    init_run_log(&config.log_path)?;
    info!("Start Scraping with config {}", config_path.display());

    let scraper = config.http_scraper()?;
    let summary = scraper.scrape(config.range).await?;
    println!(
        "Scraped {} dates into {} ({} written, {} skipped, {} connection retries)",
        summary.processed,
        config.out_dir.display(),
        summary.written,
        summary.skipped,
        summary.retries
    );
    Ok(())
}

fn analyze(
    data_dir: PathBuf,
    figure: PathBuf,
    metric: &str,
    options: &LoadOptions,
    basis: HoursBasis,
    hourly_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let observations = load_day_files(&data_dir, options)?;
    info!("Read {} observations", observations.height());

    let mut hourly = hourly_averages(&observations)?;
    if let Some(path) = hourly_out {
        write_csv(&mut hourly, &path)?;
        info!("Wrote hourly averages to {}", path.display());
    }

    let dist = hours_below_distribution(&hourly, metric, basis)?;
    plot_hours_below(&dist, metric, &figure)?;
    println!(
        "Plotted {} hourly values of {} to {}",
        dist.height(),
        metric,
        figure.display()
    );
    Ok(())
}
