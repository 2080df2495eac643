use serde::Serialize;
use std::ffi::OsString;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Title capped at 200 characters, extension as served
pub const TITLE_TEMPLATE: &str = "%(title).200s.%(ext)s";
/// Playlist items land under a folder named after the playlist
pub const PLAYLIST_TEMPLATE: &str = "%(playlist_title)s/%(title).200s.%(ext)s";

pub const AUDIO_FORMAT: &str = "bestaudio/best";
pub const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";
pub const MERGE_OUTPUT_FORMAT: &str = "mp4";

pub const AUDIO_CODEC: &str = "mp3";
/// Bitrate in kbps
pub const AUDIO_QUALITY: &str = "192";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key")]
pub enum PostProcessor {
    #[serde(rename = "FFmpegExtractAudio")]
    ExtractAudio {
        preferred_codec: String,
        preferred_quality: String,
    },
}

impl PostProcessor {
    pub fn extract_audio() -> Self {
        PostProcessor::ExtractAudio {
            preferred_codec: AUDIO_CODEC.to_string(),
            preferred_quality: AUDIO_QUALITY.to_string(),
        }
    }

    fn args(&self) -> Vec<OsString> {
        match self {
            PostProcessor::ExtractAudio {
                preferred_codec,
                preferred_quality,
            } => vec![
                "--extract-audio".into(),
                "--audio-format".into(),
                preferred_codec.into(),
                "--audio-quality".into(),
                format!("{}K", preferred_quality).into(),
            ],
        }
    }
}

/// Everything yt-dlp needs to know for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOptions {
    pub output_template: PathBuf,
    pub format: String,
    pub merge_output_format: String,
    pub no_check_certificate: bool,
    pub no_playlist: bool,
    pub playlist_end: Option<NonZeroU32>,
    pub postprocessors: Vec<PostProcessor>,
}

impl DownloadOptions {
    pub fn new(directory: &Path, audio_only: bool) -> Self {
        let format = if audio_only { AUDIO_FORMAT } else { VIDEO_FORMAT };
        let postprocessors = if audio_only {
            vec![PostProcessor::extract_audio()]
        } else {
            Vec::new()
        };

        Self {
            output_template: directory.join(TITLE_TEMPLATE),
            format: format.to_string(),
            merge_output_format: MERGE_OUTPUT_FORMAT.to_string(),
            no_check_certificate: true,
            no_playlist: false,
            playlist_end: None,
            postprocessors,
        }
    }

    /// Options for one video; a playlist carried in the URL is ignored.
    pub fn single_video(directory: &Path, audio_only: bool) -> Self {
        Self {
            no_playlist: true,
            ..Self::new(directory, audio_only)
        }
    }

    /// Options for a playlist, optionally stopping after `limit` items from the start.
    pub fn playlist(directory: &Path, audio_only: bool, limit: Option<NonZeroU32>) -> Self {
        Self {
            output_template: directory.join(PLAYLIST_TEMPLATE),
            playlist_end: limit,
            ..Self::new(directory, audio_only)
        }
    }

    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--output".into(),
            self.output_template.clone().into_os_string(),
            "--format".into(),
            self.format.clone().into(),
            "--merge-output-format".into(),
            self.merge_output_format.clone().into(),
        ];

        if self.no_check_certificate {
            args.push("--no-check-certificates".into());
        }
        if self.no_playlist {
            args.push("--no-playlist".into());
        }
        if let Some(end) = self.playlist_end {
            args.push("--playlist-end".into());
            args.push(end.to_string().into());
        }
        for postprocessor in &self.postprocessors {
            args.extend(postprocessor.args());
        }

        args
    }
}
