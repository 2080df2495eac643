use chrono::Local;
use crossterm::style::{style, Color, Stylize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    fn color(&self) -> Color {
        match self {
            Level::Debug => Color::DarkGrey,
            Level::Info => Color::Green,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
            Level::Critical => Color::Magenta,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Which records are kept and where they go besides the log file.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub min_level: Level,
    pub console: bool,
    pub color: bool,
}

#[derive(Default)]
struct FileSink {
    writer: Option<LineWriter<File>>,
    /// Set after the first failed write so a broken sink is reported once
    warned: bool,
}

/// Writes every record to stdout (colored by level) and to an append-only
/// log file, both as `timestamp - LEVEL - message`.
///
/// The file is opened on the first record that arrives once its directory
/// exists, so a logger can be built before the destination is created.
#[derive(Clone)]
pub struct Logger {
    config: LogConfig,
    file_path: PathBuf,
    file: Arc<Mutex<FileSink>>,
}

impl Logger {
    pub fn new(config: LogConfig, file_path: impl AsRef<Path>) -> Self {
        Self {
            config,
            file_path: file_path.as_ref().to_path_buf(),
            file: Arc::new(Mutex::new(FileSink::default())),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn debug(&self, message: &str) {
        self.output(Level::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.output(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.output(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.output(Level::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.output(Level::Critical, message);
    }

    /// Logs one ERROR record carrying the error and its whole cause chain.
    pub fn error_detail(&self, message: &str, err: &(dyn Error + 'static)) {
        let mut rendered = format!("{}: {}", message, err);
        let mut source = err.source();
        while let Some(cause) = source {
            rendered.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        self.output(Level::Error, &rendered);
    }

    fn output(&self, level: Level, message: &str) {
        if level < self.config.min_level {
            return;
        }

        let line = format!(
            "{} - {} - {}",
            Local::now().format(TIMESTAMP_FORMAT),
            level.name(),
            message
        );

        if self.config.console {
            if self.config.color {
                println!("{}", style(&line).with(level.color()));
            } else {
                println!("{}", line);
            }
        }

        self.write_file(&line);
    }

    fn write_file(&self, line: &str) {
        let mut sink = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if sink.writer.is_none() {
            // Parent directory may not exist yet; retry on the next record.
            let opened = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path);
            if let Ok(file) = opened {
                sink.writer = Some(LineWriter::new(file));
            }
        }

        let written = match sink.writer.as_mut() {
            Some(writer) => writeln!(writer, "{}", line),
            None => return,
        };

        if let Err(e) = written {
            if !sink.warned {
                sink.warned = true;
                eprintln!(
                    "{} - {} - Falha ao gravar no arquivo de log {}: {}",
                    Local::now().format(TIMESTAMP_FORMAT),
                    Level::Warning.name(),
                    self.file_path.display(),
                    e
                );
            }
        }
    }
}
