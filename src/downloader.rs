use crate::file_utils;
use crate::logger::Logger;
use crate::options::DownloadOptions;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_YTDLP: &str = "yt-dlp";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0} not found; is it installed and on PATH?")]
    BackendNotFound(String),

    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed ({status})")]
    Failed { program: String, status: String },

    #[error("destination directory unavailable: {}", .0.display())]
    DirectoryUnavailable(PathBuf),
}

/// The media library that does the actual extraction, fetching and transcoding.
pub trait MediaBackend {
    fn check_available(&self) -> Result<(), DownloadError>;

    /// Run one download for the given URLs, blocking until it finishes.
    fn download(&self, options: &DownloadOptions, urls: &[&str]) -> Result<(), DownloadError>;
}

/// Runs the `yt-dlp` executable with inherited stdio, so its own progress shows through.
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MediaBackend for YtDlp {
    fn check_available(&self) -> Result<(), DownloadError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| DownloadError::BackendNotFound(self.program.clone()))
    }

    fn download(&self, options: &DownloadOptions, urls: &[&str]) -> Result<(), DownloadError> {
        let status = Command::new(&self.program)
            .args(options.to_args())
            .arg("--")
            .args(urls)
            .status()
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DownloadError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

fn invoke(
    backend: &dyn MediaBackend,
    logger: &Logger,
    options: &DownloadOptions,
    url: &str,
) -> Result<(), DownloadError> {
    if let Ok(json) = serde_json::to_string(options) {
        logger.debug(&format!("Opções do download: {}", json));
    }
    backend.check_available()?;
    backend.download(options, &[url])
}

/// Download a single video, ignoring any playlist the URL belongs to.
///
/// Returns the elapsed time on success. A failure is logged here, once, and
/// handed back as the error value; it never escapes as a panic.
pub fn download_video(
    backend: &dyn MediaBackend,
    logger: &Logger,
    url: &str,
    directory: &Path,
    audio_only: bool,
) -> Result<Duration, DownloadError> {
    logger.debug(&format!("Preparando para baixar: {}", url));
    let started = Instant::now();

    if !file_utils::verify_directory(directory, logger) {
        return Err(DownloadError::DirectoryUnavailable(directory.to_path_buf()));
    }

    let options = DownloadOptions::single_video(directory, audio_only);
    match invoke(backend, logger, &options, url) {
        Ok(()) => {
            let elapsed = started.elapsed();
            logger.info(&format!(
                "Download concluído em {:.1}s",
                elapsed.as_secs_f64()
            ));
            Ok(elapsed)
        }
        Err(e) => {
            logger.error_detail(&format!("Falha ao baixar {}", url), &e);
            Err(e)
        }
    }
}

/// Download a whole playlist in one backend call, optionally stopping after
/// `limit` items counted from the start of the playlist.
pub fn download_playlist(
    backend: &dyn MediaBackend,
    logger: &Logger,
    url: &str,
    directory: &Path,
    audio_only: bool,
    limit: Option<NonZeroU32>,
) -> Result<Duration, DownloadError> {
    let started = Instant::now();

    if !file_utils::verify_directory(directory, logger) {
        return Err(DownloadError::DirectoryUnavailable(directory.to_path_buf()));
    }

    match limit {
        Some(n) => logger.debug(&format!("Limite de {} vídeos para a playlist: {}", n, url)),
        None => logger.debug(&format!("Baixando playlist completa: {}", url)),
    }

    let options = DownloadOptions::playlist(directory, audio_only, limit);
    match invoke(backend, logger, &options, url) {
        Ok(()) => {
            let elapsed = started.elapsed();
            logger.info(&format!(
                "Download da playlist finalizado em {:.1}s.",
                elapsed.as_secs_f64()
            ));
            Ok(elapsed)
        }
        Err(e) => {
            logger.error_detail("Erro ao processar playlist", &e);
            Err(e)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::stub::BackendStub;
    use super::*;
    use crate::logger::{Level, LogConfig};
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn test_logger(directory: &Path) -> Logger {
        Logger::new(
            LogConfig {
                min_level: Level::Debug,
                console: false,
                color: false,
            },
            file_utils::log_file_path(directory),
        )
    }

    fn read_log(directory: &Path) -> String {
        fs::read_to_string(file_utils::log_file_path(directory)).unwrap()
    }

    #[test]
    fn test_video_download_passes_single_url() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(temp_dir.path());
        let backend = BackendStub::succeeding();

        let result = download_video(
            &backend,
            &logger,
            "https://youtube.com/watch?v=abc",
            temp_dir.path(),
            false,
        );
        assert!(result.is_ok(), "download failed: {:?}", result.err());

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (options, urls) = &calls[0];
        assert!(options.no_playlist);
        assert_eq!(urls, &vec!["https://youtube.com/watch?v=abc".to_string()]);
        assert!(read_log(temp_dir.path()).contains("INFO - Download concluído em"));
    }

    #[test]
    fn test_video_download_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("new");
        let logger = test_logger(&target);

        let result = download_video(
            &BackendStub::succeeding(),
            &logger,
            "https://youtu.be/abc",
            &target,
            true,
        );
        assert!(result.is_ok());
        assert!(target.is_dir());
    }

    #[test]
    fn test_backend_failure_is_logged_once() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(temp_dir.path());

        let result = download_video(
            &BackendStub::failing(),
            &logger,
            "https://youtube.com/watch?v=abc",
            temp_dir.path(),
            false,
        );
        assert_matches!(result, Err(DownloadError::Failed { .. }));

        let log = read_log(temp_dir.path());
        assert_eq!(log.matches(" - ERROR - ").count(), 1);
        assert!(log.contains("Falha ao baixar https://youtube.com/watch?v=abc: stub failed"));
        assert!(!log.contains("Download concluído"));
    }

    #[test]
    fn test_playlist_download_with_limit() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(temp_dir.path());
        let backend = BackendStub::succeeding();

        let result = download_playlist(
            &backend,
            &logger,
            "https://youtube.com/playlist?list=PL1",
            temp_dir.path(),
            true,
            NonZeroU32::new(3),
        );
        assert!(result.is_ok());

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (options, urls) = &calls[0];
        assert_eq!(options.playlist_end, NonZeroU32::new(3));
        assert_eq!(options.postprocessors.len(), 1);
        assert_eq!(urls.len(), 1);
        assert!(read_log(temp_dir.path()).contains("INFO - Download da playlist finalizado em "));
    }

    #[test]
    fn test_playlist_failure_is_logged_once() {
        let temp_dir = TempDir::new().unwrap();
        let logger = test_logger(temp_dir.path());

        let result = download_playlist(
            &BackendStub::failing(),
            &logger,
            "https://youtube.com/playlist?list=PL1",
            temp_dir.path(),
            false,
            None,
        );
        assert!(result.is_err());

        let log = read_log(temp_dir.path());
        assert_eq!(log.matches(" - ERROR - ").count(), 1);
        assert!(log.contains("Erro ao processar playlist"));
    }

    #[test]
    fn test_playlist_stops_on_unusable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let logger = test_logger(temp_dir.path());
        let backend = BackendStub::succeeding();

        let result = download_playlist(
            &backend,
            &logger,
            "https://youtube.com/playlist?list=PL1",
            &blocker.join("sub"),
            false,
            None,
        );
        assert_matches!(result, Err(DownloadError::DirectoryUnavailable(_)));
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_backend_binary() {
        let backend = YtDlp::new("ytgrab-definitely-missing-binary");
        assert_matches!(
            backend.check_available(),
            Err(DownloadError::BackendNotFound(name)) if name == "ytgrab-definitely-missing-binary"
        );
    }
}
