use crate::error::WunderError;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Sends all log records of this process to `log_path`, appending to what is already there.
///
/// Defaults to `info`; `RUST_LOG` still overrides it. The parent directory is created
/// if missing. Can only be called once per process.
pub fn init_run_log(log_path: &Path) -> Result<(), WunderError> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| WunderError::LogInit(log_path.to_path_buf(), e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| WunderError::LogInit(log_path.to_path_buf(), e))?;

    Builder::from_env(Env::default().default_filter_or(LevelFilter::Info.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}

/// Plain stderr logging for the analysis commands.
pub fn init_console_log() -> Result<(), WunderError> {
    Builder::from_env(Env::default().default_filter_or(LevelFilter::Info.as_str())).try_init()?;
    Ok(())
}
