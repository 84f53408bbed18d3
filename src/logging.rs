//! Logger setup: `env_logger` writing to a log file in the app data directory.

use crate::constants::LOG_FILE_NAME;
use crate::error::InitError;
use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

/// Data directory for the log file, created if missing.
pub fn data_dir() -> Result<PathBuf, InitError> {
    let proj_dirs = ProjectDirs::from("com", "solidsoft", "Routine").ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.to_path_buf())
}

/// Open (append) the log file inside `dir`.
pub fn open_log_file(dir: &Path) -> Result<File, InitError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
        .map_err(InitError::LogFile)
}

/// Initialize logging once. `RUST_LOG` overrides the default `info` filter.
/// Falls back to stderr when the log file cannot be opened.
pub fn init() {
    LOGGER_INIT.call_once(|| {
        let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
        builder.format_timestamp_millis();

        let file_error = match data_dir().and_then(|dir| open_log_file(&dir)) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
                None
            }
            Err(e) => Some(e),
        };

        if builder.try_init().is_ok() {
            if let Some(e) = file_error {
                log::warn!("Logging to stderr: {e}");
            }
        }
    });
}
