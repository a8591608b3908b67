//! Configuration command

use tracing::info;

use crate::core::config::AppConfig;
use crate::core::models::{AppError, AppResult};

/// Effective configuration as pretty JSON
pub fn export_config(config: &AppConfig) -> AppResult<String> {
    info!("💾 Exporting effective configuration");
    config
        .export()
        .map_err(|e| AppError::Config(e.to_string()))
}
