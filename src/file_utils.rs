use crate::logger::Logger;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the append-only log kept inside the destination directory
pub const LOG_FILE_NAME: &str = "youtube_downloader.log";

pub fn log_file_path(directory: &Path) -> PathBuf {
    directory.join(LOG_FILE_NAME)
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Create the destination directory (and any missing parents) if needed.
///
/// Failures are logged with their cause and reported as `false`; nothing is
/// propagated past this point.
pub fn verify_directory(directory: &Path, logger: &Logger) -> bool {
    match fs::create_dir_all(directory) {
        Ok(()) => {
            logger.info(&format!("Diretório de downloads: {}", directory.display()));
            true
        }
        Err(e) => {
            logger.error_detail(
                &format!("Erro ao acessar diretório {}", directory.display()),
                &e,
            );
            false
        }
    }
}
