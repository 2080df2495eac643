use crate::file_utils;
use crate::logger::Logger;
use anyhow::Context;
use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Answer to the "how many videos" prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitInput {
    Unlimited,
    Limited(NonZeroU32),
    /// Not a usable count; treated as unlimited after a warning
    Invalid(String),
}

impl LimitInput {
    pub fn resolve(self, logger: &Logger) -> Option<NonZeroU32> {
        match self {
            LimitInput::Unlimited => None,
            LimitInput::Limited(n) => Some(n),
            LimitInput::Invalid(raw) => {
                logger.warn(&format!(
                    "Valor inválido para limite ('{}'). Baixando todos os vídeos.",
                    raw
                ));
                None
            }
        }
    }
}

/// Empty input and `0` both mean "everything". Counts beyond `u32::MAX`
/// saturate, since no playlist gets that long.
pub fn parse_limit(raw: &str) -> LimitInput {
    let raw = raw.trim();
    if raw.is_empty() {
        return LimitInput::Unlimited;
    }

    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return LimitInput::Invalid(raw.to_string());
    }

    // Only overflow can fail here.
    let count = digits
        .parse::<u64>()
        .map_or(u32::MAX, |n| u32::try_from(n).unwrap_or(u32::MAX));
    NonZeroU32::new(count).map_or(LimitInput::Unlimited, LimitInput::Limited)
}

/// Asks the interactive questions in order over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("failed to read answer from stdin")?;
        Ok(line.trim().to_string())
    }

    pub fn directory(&mut self, default: &Path) -> anyhow::Result<PathBuf> {
        let answer = self.ask(&format!(
            "Informe o diretório onde salvar os arquivos (padrão: {}): ",
            default.display()
        ))?;
        if answer.is_empty() {
            Ok(default.to_path_buf())
        } else {
            Ok(file_utils::expand_home(&answer))
        }
    }

    pub fn url(&mut self) -> anyhow::Result<String> {
        self.ask("Cole a URL do vídeo ou da playlist do YouTube: ")
    }

    /// Only `s` (sim) means yes.
    pub fn audio_only(&mut self) -> anyhow::Result<bool> {
        let answer = self.ask("Baixar somente áudio? (s/n): ")?;
        Ok(answer.to_lowercase() == "s")
    }

    pub fn limit(&mut self) -> anyhow::Result<LimitInput> {
        let answer = self.ask("Limite de vídeos (deixe em branco para todos): ")?;
        Ok(parse_limit(&answer))
    }
}
