//! Configuration unit tests
//!
//! Covers defaults, file/environment layering, validation and export.

#[cfg(test)]
mod tests {
    use super::super::config::AppConfig;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Serializes tests that read or write process environment
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.input.path, PathBuf::from("songs.xlsx"));
        assert_eq!(config.output.directory, PathBuf::from("downloaded_songs"));
        assert_eq!(config.output.audio_format, "mp3");
        assert_eq!(config.output.audio_quality_kbps, 192);
        assert_eq!(config.fetch.ytdlp_path, PathBuf::from("yt-dlp"));
        assert_eq!(config.fetch.search_prefix, "ytsearch1");
        assert_eq!(config.metadata.unknown_artist, "Unknown Artist");
        assert_eq!(config.metadata.unknown_album, "Unknown Album");
        assert_eq!(config.throttle.post_download_delay_ms, 1000);
        assert_eq!(config.throttle.inter_row_delay_ms, 500);
        assert!(config.ui.show_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = ENV_LOCK.lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[input]
path = "playlist.csv"

[output]
directory = "music"

[throttle]
inter_row_delay_ms = 0

[fetch]
extra_args = ["--cookies", "cookies.txt"]
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.input.path, PathBuf::from("playlist.csv"));
        assert_eq!(config.output.directory, PathBuf::from("music"));
        assert_eq!(config.throttle.inter_row_delay_ms, 0);
        assert_eq!(config.fetch.extra_args, vec!["--cookies", "cookies.txt"]);
        // untouched sections keep their defaults
        assert_eq!(config.output.audio_format, "mp3");
        assert_eq!(config.throttle.post_download_delay_ms, 1000);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let _guard = ENV_LOCK.lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        assert!(AppConfig::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_optional_missing_file_uses_defaults() {
        let _guard = ENV_LOCK.lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let config = AppConfig::from_sources(Some(path.as_path()), false).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("downloaded_songs"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[throttle]\ninter_row_delay_ms = 250\n").unwrap();

        std::env::set_var("AUDIO_BATCH__THROTTLE__INTER_ROW_DELAY_MS", "42");
        let result = AppConfig::load(Some(path.as_path()));
        std::env::remove_var("AUDIO_BATCH__THROTTLE__INTER_ROW_DELAY_MS");

        assert_eq!(result.unwrap().throttle.inter_row_delay_ms, 42);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.output.audio_format = "m p3".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.output.audio_quality_kbps = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.output.directory = PathBuf::new();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.fetch.search_prefix = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_throttle_durations() {
        let config = AppConfig::default();
        assert_eq!(config.throttle.post_download_delay().as_millis(), 1000);
        assert_eq!(config.throttle.inter_row_delay().as_millis(), 500);
    }

    #[test]
    fn test_export_json() {
        let exported = AppConfig::default().export().unwrap();
        let value: serde_json::Value = serde_json::from_str(&exported).unwrap();

        assert_eq!(value["output"]["audio_format"], "mp3");
        assert_eq!(value["metadata"]["unknown_album"], "Unknown Album");
    }
}
