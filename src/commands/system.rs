//! External tool checks

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::core::config::AppConfig;
use crate::core::models::AppResult;
use crate::core::youtube_downloader::check_tool_availability;

/// Availability of one external program
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: PathBuf,
    pub available: bool,
}

/// Check that yt-dlp and ffmpeg can be launched
pub async fn check_tools(config: &AppConfig) -> AppResult<Vec<ToolStatus>> {
    let ytdlp = check_tool("yt-dlp", &config.fetch.ytdlp_path, &["--version"]).await?;
    let ffmpeg = check_tool("ffmpeg", Path::new("ffmpeg"), &["-version"]).await?;
    Ok(vec![ytdlp, ffmpeg])
}

async fn check_tool(name: &str, path: &Path, args: &[&str]) -> AppResult<ToolStatus> {
    info!("🔧 Checking {} availability", name);

    match check_tool_availability(path, args).await {
        Ok(available) => {
            if available {
                info!("✅ {} is available", name);
            } else {
                warn!("⚠️ {} is not available", name);
            }
            Ok(ToolStatus {
                name: name.to_string(),
                path: path.to_path_buf(),
                available,
            })
        }
        Err(e) => {
            error!("❌ Failed to check {}: {}", name, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_ytdlp_is_reported() {
        let mut config = AppConfig::default();
        config.fetch.ytdlp_path = PathBuf::from("/nonexistent/bin/yt-dlp");

        let statuses = check_tools(&config).await.unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "yt-dlp");
        assert!(!statuses[0].available);
    }
}
