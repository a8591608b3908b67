//! Application configuration management
//!
//! `AppConfig` is built once at startup and passed explicitly to every
//! component. Sources, lowest priority first: struct defaults, a TOML file,
//! `AUDIO_BATCH__*` environment variables, then command-line overrides applied
//! by the binary.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `AUDIO_BATCH__OUTPUT__DIRECTORY`
pub const ENV_PREFIX: &str = "AUDIO_BATCH";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "AUDIO_BATCH_CONFIG";

/// Main application configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
    pub metadata: MetadataConfig,
    pub throttle: ThrottleConfig,
    pub ui: UiConfig,
}

/// Where the song list comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Two-column table (track, artist), no header row
    pub path: PathBuf,
}

/// Where audio files go and in which format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    /// Target container, also the file extension ("mp3")
    pub audio_format: String,
    /// Constant bitrate target in kbps
    pub audio_quality_kbps: u32,
}

/// yt-dlp invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub ytdlp_path: PathBuf,
    /// yt-dlp search key; `ytsearch1` takes the first ranked result
    pub search_prefix: String,
    pub format_selector: String,
    /// Passed to yt-dlp before the search URL
    pub extra_args: Vec<String>,
}

/// Placeholders used when the input has no value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub unknown_artist: String,
    pub unknown_album: String,
}

/// Fixed pauses used to pace requests against the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Pause between a successful download and tagging
    pub post_download_delay_ms: u64,
    /// Pause after every row
    pub inter_row_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_progress: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("songs.xlsx"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("downloaded_songs"),
            audio_format: "mp3".to_string(),
            audio_quality_kbps: 192,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: PathBuf::from("yt-dlp"),
            search_prefix: "ytsearch1".to_string(),
            format_selector: "bestaudio/best".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            unknown_artist: "Unknown Artist".to_string(),
            unknown_album: "Unknown Album".to_string(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            post_download_delay_ms: 1000,
            inter_row_delay_ms: 500,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

impl ThrottleConfig {
    pub fn post_download_delay(&self) -> Duration {
        Duration::from_millis(self.post_download_delay_ms)
    }

    pub fn inter_row_delay(&self) -> Duration {
        Duration::from_millis(self.inter_row_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// An explicit path must exist; the default locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_sources(Some(path), true),
            None => {
                let path = Self::resolve_config_path();
                Self::from_sources(path.as_deref(), false)
            }
        }
    }

    /// Build from an optional file plus environment overrides
    pub fn from_sources(file: Option<&Path>, required: bool) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = file {
            tracing::debug!("Reading configuration from: {:?}", path);
            builder = builder.add_source(::config::File::from(path).required(required));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .with_context(|| "Failed to read configuration sources")?
            .try_deserialize()
            .with_context(|| "Failed to parse configuration")?;

        Ok(config)
    }

    /// `AUDIO_BATCH_CONFIG`, else `config.toml` in the platform config dir
    pub fn resolve_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::get_config_path().ok()
    }

    /// Get the path to the default configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "audiobatch", "audio-batch-downloader")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Export configuration as JSON string
    pub fn export(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Failed to export configuration")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.input.path.as_os_str().is_empty() {
            anyhow::bail!("Input path must not be empty");
        }

        if self.output.directory.as_os_str().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }

        let format = self.output.audio_format.as_str();
        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            anyhow::bail!("Invalid audio format: {:?}", format);
        }

        if self.output.audio_quality_kbps == 0 || self.output.audio_quality_kbps > 512 {
            anyhow::bail!("Audio quality should be between 1 and 512 kbps");
        }

        if self.fetch.ytdlp_path.as_os_str().is_empty() {
            anyhow::bail!("yt-dlp path must not be empty");
        }

        if self.fetch.search_prefix.trim().is_empty() {
            anyhow::bail!("Search prefix must not be empty");
        }

        if self.fetch.format_selector.trim().is_empty() {
            anyhow::bail!("Format selector must not be empty");
        }

        Ok(())
    }
}
