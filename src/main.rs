mod sources {
    pub mod youtube;
}
mod app;
mod cli;
mod downloader;
mod file_utils;
mod logger;
mod options;
mod prompt;

use crate::{
    app::Session,
    cli::{Cli, Settings},
    downloader::YtDlp,
    logger::Logger,
    prompt::Prompter,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;

const RULE_WIDTH: usize = 50;

fn print_banner() {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!(" YouTube Playlist Downloader ");
    println!(" ytgrab {}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_farewell() {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Obrigado por usar o YouTube Playlist Downloader!");
    println!("{}\n", "=".repeat(RULE_WIDTH));
}

/// Ask whatever the command line did not already answer.
fn collect_session<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
    logger: &Logger,
    directory: PathBuf,
) -> anyhow::Result<Session> {
    let url = match cli.url.as_deref() {
        Some(url) => url.trim().to_string(),
        None => prompter.url()?,
    };
    let audio_only = match cli.audio_only {
        Some(audio_only) => audio_only,
        None => prompter.audio_only()?,
    };
    let limit = match cli.limit {
        Some(n) => NonZeroU32::new(n),
        None => prompter.limit()?.resolve(logger),
    };

    Ok(Session {
        directory,
        url,
        audio_only,
        limit,
    })
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env(&cli);

    print_banner();

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    let directory = match cli.dir.as_deref() {
        Some(dir) => file_utils::expand_home(dir),
        None => prompter.directory(&settings.default_dir)?,
    };

    let log_path = file_utils::log_file_path(&directory);
    let logger = Logger::new(settings.log_config(), &log_path);
    for warning in &settings.deferred_warnings {
        logger.warn(warning);
    }

    if let Err(report) = app::prepare_destination(&directory, &logger) {
        println!("Erro ao acessar o diretório de downloads. Verifique permissões.");
        std::process::exit(report.exit_code());
    }

    let answers = collect_session(&cli, &mut prompter, &logger, directory);

    let session = match answers {
        Ok(session) => session,
        Err(e) => {
            logger.critical(&format!("Não foi possível ler a entrada: {:#}", e));
            return Err(e);
        }
    };

    println!();
    let backend = YtDlp::new(settings.ytdlp_program.as_str());
    let report = app::run(&session, &backend, &logger);

    println!("\nLogs detalhados salvos em: {}", logger.file_path().display());
    print_farewell();

    std::process::exit(report.exit_code());
}
