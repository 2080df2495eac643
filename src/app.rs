use crate::downloader::{self, DownloadError, MediaBackend};
use crate::file_utils;
use crate::logger::Logger;
use crate::sources::youtube::{self, UrlKind};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Exit status when the destination directory cannot be created or accessed
pub const EXIT_DIRECTORY_UNAVAILABLE: i32 = 1;
pub const EXIT_OK: i32 = 0;

/// The answers collected from the user for one run
#[derive(Debug, Clone)]
pub struct Session {
    pub directory: PathBuf,
    pub url: String,
    pub audio_only: bool,
    pub limit: Option<NonZeroU32>,
}

#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub success: bool,
    pub directory_available: bool,
    pub elapsed: Duration,
}

impl RunReport {
    fn directory_unavailable() -> Self {
        Self {
            success: false,
            directory_available: false,
            elapsed: Duration::ZERO,
        }
    }

    /// Only an unusable destination changes the exit status; download
    /// failures are reported in the log.
    pub fn exit_code(&self) -> i32 {
        if self.directory_available {
            EXIT_OK
        } else {
            EXIT_DIRECTORY_UNAVAILABLE
        }
    }
}

/// Make sure the destination exists before anything else is asked.
///
/// On failure the returned report carries the exit status to stop with.
pub fn prepare_destination(directory: &Path, logger: &Logger) -> Result<(), RunReport> {
    if file_utils::verify_directory(directory, logger) {
        Ok(())
    } else {
        Err(RunReport::directory_unavailable())
    }
}

/// Classify the URL, dispatch to the matching download and log the summary.
pub fn run(session: &Session, backend: &dyn MediaBackend, logger: &Logger) -> RunReport {
    logger.info("Iniciando processo de download...");

    if !youtube::is_youtube_url(&session.url) {
        logger.warn(&format!(
            "A URL não parece ser do YouTube, tentando mesmo assim: {}",
            session.url
        ));
    }

    let started = Instant::now();
    let result = match youtube::classify(&session.url) {
        UrlKind::Playlist => downloader::download_playlist(
            backend,
            logger,
            &session.url,
            &session.directory,
            session.audio_only,
            session.limit,
        ),
        UrlKind::Video => downloader::download_video(
            backend,
            logger,
            &session.url,
            &session.directory,
            session.audio_only,
        ),
    };
    let report = RunReport {
        success: result.is_ok(),
        directory_available: !matches!(result, Err(DownloadError::DirectoryUnavailable(_))),
        elapsed: started.elapsed(),
    };

    if report.success {
        logger.info(&format!(
            "Processo concluído com sucesso em {:.1} segundos!",
            report.elapsed.as_secs_f64()
        ));
    } else {
        logger.error("Ocorreram erros durante o download!");
    }

    report
}
