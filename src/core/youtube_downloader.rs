//! YouTube Downloader Module
//!
//! Turns a free-text query into a transcoded audio file by running `yt-dlp`
//! (which in turn needs `ffmpeg` for the audio extraction step). The first
//! ranked search result is taken as-is; there is no disambiguation beyond the
//! query string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::core::error_handling::FetchError;
use crate::core::models::{AppError, AppResult};
use crate::utils::file_utils::append_extension;

/// Keep at most this much of yt-dlp's stderr in error messages
const STDERR_TAIL_CHARS: usize = 500;

/// Fetcher boundary: query in, audio file out
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the best match for `query` to `<output_stem>.<ext>`.
    ///
    /// Returns the path of the produced file. `Ok` guarantees the file existed
    /// when the fetch finished.
    async fn fetch(&self, query: &str, output_stem: &Path) -> Result<PathBuf, FetchError>;
}

/// YouTube downloader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeDownloaderConfig {
    /// yt-dlp executable, looked up on PATH when relative
    pub binary: PathBuf,
    /// Search key such as `ytsearch1`
    pub search_prefix: String,
    pub format_selector: String,
    /// Target audio container, also the output extension
    pub audio_format: String,
    pub audio_quality_kbps: u32,
    pub extra_args: Vec<String>,
}

impl Default for YoutubeDownloaderConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl YoutubeDownloaderConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            binary: config.fetch.ytdlp_path.clone(),
            search_prefix: config.fetch.search_prefix.clone(),
            format_selector: config.fetch.format_selector.clone(),
            audio_format: config.output.audio_format.clone(),
            audio_quality_kbps: config.output.audio_quality_kbps,
            extra_args: config.fetch.extra_args.clone(),
        }
    }
}

/// [`AudioFetcher`] backed by the yt-dlp command line tool
pub struct YoutubeDownloader {
    config: YoutubeDownloaderConfig,
}

impl YoutubeDownloader {
    pub fn new(config: YoutubeDownloaderConfig) -> Self {
        Self { config }
    }

    /// `ytsearch1:<query>`
    pub fn search_url(&self, query: &str) -> String {
        format!("{}:{}", self.config.search_prefix, query)
    }

    /// yt-dlp arguments for one download
    pub fn build_args(&self, query: &str, output_stem: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.config.format_selector.clone(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            self.config.audio_format.clone(),
            "--audio-quality".to_string(),
            format!("{}K", self.config.audio_quality_kbps),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "-o".to_string(),
            output_template(output_stem),
        ];
        args.extend(self.config.extra_args.iter().cloned());
        // "--" keeps a query starting with '-' from being read as an option
        args.push("--".to_string());
        args.push(self.search_url(query));
        args
    }

    fn binary_name(&self) -> String {
        self.config.binary.display().to_string()
    }
}

#[async_trait]
impl AudioFetcher for YoutubeDownloader {
    async fn fetch(&self, query: &str, output_stem: &Path) -> Result<PathBuf, FetchError> {
        let expected = append_extension(output_stem, &self.config.audio_format);
        info!("🔍 Searching for: {}", self.search_url(query));

        let output = tokio::process::Command::new(&self.config.binary)
            .args(self.build_args(query, output_stem))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| FetchError::Spawn {
                binary: self.binary_name(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!("yt-dlp: {}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::ToolFailed {
                binary: self.binary_name(),
                status: output.status.to_string(),
                stderr: tail(stderr.trim(), STDERR_TAIL_CHARS),
            });
        }

        let exists = tokio::fs::try_exists(&expected)
            .await
            .map_err(|source| FetchError::Io {
                path: expected.clone(),
                source,
            })?;

        if exists {
            info!("✅ Successfully downloaded: {}", expected.display());
            Ok(expected)
        } else {
            Err(FetchError::OutputMissing { path: expected })
        }
    }
}

/// yt-dlp `-o` template for a stem; `%` must be doubled to stay literal
pub fn output_template(output_stem: &Path) -> String {
    format!(
        "{}.%(ext)s",
        output_stem.to_string_lossy().replace('%', "%%")
    )
}

/// Last `max_chars` characters of `text`
fn tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        text.to_string()
    } else {
        let skipped: String = text.chars().skip(count - max_chars).collect();
        format!("...{}", skipped)
    }
}

/// Whether `tool_name args` runs and exits successfully
pub async fn check_tool_availability(tool_name: &Path, args: &[&str]) -> AppResult<bool> {
    let output = tokio::process::Command::new(tool_name)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) => Ok(output.status.success()),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(false),
            _ => {
                warn!("Failed to check {}: {}", tool_name.display(), e);
                Err(AppError::System(format!(
                    "Failed to check {}: {}",
                    tool_name.display(),
                    e
                )))
            }
        },
    }
}
