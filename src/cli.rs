use crate::downloader::DEFAULT_YTDLP;
use crate::logger::{Level, LogConfig};
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DIRECTORY: &str = "/mnt/server/downloads";

pub const ENV_DEFAULT_DIR: &str = "YTGRAB_DEFAULT_DIR";
pub const ENV_YTDLP: &str = "YTGRAB_YTDLP";
pub const ENV_LOG_LEVEL: &str = "YTGRAB_LOG_LEVEL";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Every flag is optional: anything left out is asked interactively.
#[derive(Parser, Debug)]
#[command(name = "ytgrab")]
#[command(version)]
#[command(about = "Download a YouTube video or playlist with yt-dlp")]
pub struct Cli {
    /// Destination directory (skips the directory prompt)
    #[arg(long, short = 'd')]
    pub dir: Option<String>,

    /// Video or playlist URL (skips the URL prompt)
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// Extract audio only: yes/no (skips the audio prompt)
    #[arg(long, short = 'a', value_name = "yes|no", value_parser = BoolishValueParser::new())]
    pub audio_only: Option<bool>,

    /// Maximum playlist items, 0 for all (skips the limit prompt)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Disable colored console output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

/// Runtime configuration resolved from CLI flags and the environment
#[derive(Clone, Debug)]
pub struct Settings {
    pub default_dir: PathBuf,
    pub ytdlp_program: String,
    pub log_level: Level,
    pub color: bool,
    /// Problems found before the logger exists; logged as warnings once it does
    pub deferred_warnings: Vec<String>,
}

impl Settings {
    pub fn from_env(cli: &Cli) -> Self {
        Self::from_lookup(cli, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(cli: &Cli, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut deferred_warnings = Vec::new();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = match non_empty(ENV_LOG_LEVEL) {
            Some(raw) => raw.parse::<Level>().unwrap_or_else(|e| {
                deferred_warnings.push(format!("{} ignorado: {}", ENV_LOG_LEVEL, e));
                Level::Debug
            }),
            None => Level::Debug,
        };

        Self {
            default_dir: non_empty(ENV_DEFAULT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY)),
            ytdlp_program: non_empty(ENV_YTDLP).unwrap_or_else(|| DEFAULT_YTDLP.to_string()),
            log_level,
            color: !cli.no_color && lookup(ENV_NO_COLOR).is_none(),
            deferred_warnings,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            min_level: self.log_level,
            console: true,
            color: self.color,
        }
    }
}
