//! Batch Driver - processes the song list row by row
//!
//! Rows run strictly one after another. Per row:
//!
//! 1. sanitize title/artist into a search query and an output path
//! 2. skip the row if `<output>.<ext>` already exists (this is what makes a
//!    rerun resume where the last one stopped)
//! 3. fetch; on failure log and move on
//! 4. wait, re-check the file, then write title/artist/album
//! 5. wait before the next row, whatever happened
//!
//! Component errors come back as values and are collapsed into a
//! [`RowStatus`] here, so one bad row never stops the batch.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::config::{AppConfig, MetadataConfig, ThrottleConfig};
use crate::core::error_handling::{RowError, TagError};
use crate::core::models::{
    AppError, AppResult, BatchReport, MetadataRecord, Row, RowOutcome, RowStatus, TrackPlan,
};
use crate::core::progress_tracker::ProgressTracker;
use crate::core::tag_writer::TagWriter;
use crate::core::youtube_downloader::AudioFetcher;
use crate::utils::file_utils::{append_extension, ensure_dir_exists, sanitize_filename};

/// Settings the driver needs, taken from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    /// Audio extension without the dot
    pub audio_format: String,
    pub metadata: MetadataConfig,
    pub throttle: ThrottleConfig,
}

impl BatchConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            audio_format: config.output.audio_format.clone(),
            metadata: config.metadata.clone(),
            throttle: config.throttle.clone(),
        }
    }

    /// Derive query and output paths for a row.
    ///
    /// An artist that is blank or sanitizes to nothing counts as absent.
    pub fn plan_row(&self, row: &Row) -> Result<TrackPlan, RowError> {
        let title = sanitize_filename(&row.track);
        if title.is_empty() {
            return Err(RowError::EmptyTrack {
                row_number: row.row_number,
            });
        }

        let artist = row
            .artist
            .as_deref()
            .map(sanitize_filename)
            .filter(|a| !a.is_empty());

        let (query, file_name) = match &artist {
            Some(artist) => (format!("{} {}", title, artist), format!("{} - {}", artist, title)),
            None => (title.clone(), title.clone()),
        };

        let output_stem = self.output_dir.join(file_name);
        let output_file = append_extension(&output_stem, &self.audio_format);

        Ok(TrackPlan {
            title,
            artist,
            query,
            output_stem,
            output_file,
        })
    }
}

pub struct BatchManager {
    config: BatchConfig,
    fetcher: Arc<dyn AudioFetcher>,
    tag_writer: Arc<dyn TagWriter>,
}

impl BatchManager {
    pub fn new(
        config: BatchConfig,
        fetcher: Arc<dyn AudioFetcher>,
        tag_writer: Arc<dyn TagWriter>,
    ) -> Self {
        Self {
            config,
            fetcher,
            tag_writer,
        }
    }

    /// Derive query and output paths for a row
    pub fn plan_row(&self, row: &Row) -> Result<TrackPlan, RowError> {
        self.config.plan_row(row)
    }

    /// Metadata written for a planned track
    pub fn metadata_for(&self, plan: &TrackPlan) -> MetadataRecord {
        MetadataRecord {
            title: plan.title.clone(),
            artist: plan
                .artist
                .clone()
                .unwrap_or_else(|| self.config.metadata.unknown_artist.clone()),
            album: self.config.metadata.unknown_album.clone(),
        }
    }

    /// Process every row once, in order.
    ///
    /// Only failing to create the output directory is fatal.
    pub async fn run(&self, rows: &[Row], progress: &mut ProgressTracker) -> AppResult<BatchReport> {
        ensure_dir_exists(&self.config.output_dir).map_err(|e| AppError::System(e.to_string()))?;

        info!(
            "🚀 Processing {} rows into {}",
            rows.len(),
            self.config.output_dir.display()
        );

        progress.start();
        let mut report = BatchReport::default();

        for row in rows {
            let outcome = self.process_row(row).await;
            log_outcome(&outcome);
            progress.advance(outcome.status);
            report.outcomes.push(outcome);

            tokio::time::sleep(self.config.throttle.inter_row_delay()).await;
        }

        progress.finish(&report);
        info!("📊 Batch finished: {}", report.summary());

        Ok(report)
    }

    /// Run one row to a terminal state
    pub async fn process_row(&self, row: &Row) -> RowOutcome {
        let plan = match self.plan_row(row) {
            Ok(plan) => plan,
            Err(e) => {
                return RowOutcome {
                    row_number: row.row_number,
                    query: row.track.clone(),
                    output_file: None,
                    status: RowStatus::RowError,
                    error_message: Some(e.to_string()),
                }
            }
        };

        match self.download_and_tag(row, &plan).await {
            Ok(outcome) => outcome,
            Err(e) => RowOutcome::failed(&plan, row.row_number, RowStatus::RowError, e),
        }
    }

    async fn download_and_tag(&self, row: &Row, plan: &TrackPlan) -> Result<RowOutcome, RowError> {
        if self.output_exists(plan).await? {
            info!("⏭️ Skipping (already exists): {}", plan.output_file.display());
            return Ok(RowOutcome::succeeded(plan, row.row_number, RowStatus::Skipped));
        }

        info!("🎵 Processing: {}", plan.query);

        if let Err(e) = self.fetcher.fetch(&plan.query, &plan.output_stem).await {
            debug!(category = ?e.category(), "fetch failed for row {}", row.row_number);
            return Ok(RowOutcome::failed(
                plan,
                row.row_number,
                RowStatus::DownloadFailed,
                e,
            ));
        }

        tokio::time::sleep(self.config.throttle.post_download_delay()).await;

        // the fetcher saw the file, but check again before touching it
        if !self.output_exists(plan).await? {
            let e = TagError::FileMissing {
                path: plan.output_file.clone(),
            };
            return Ok(RowOutcome::failed(plan, row.row_number, RowStatus::TagFailed, e));
        }

        let record = self.metadata_for(plan);
        match self.tag_writer.write_tags(&plan.output_file, &record) {
            Ok(()) => {
                info!("🏷️ Metadata embedded for {}", plan.output_file.display());
                Ok(RowOutcome::succeeded(plan, row.row_number, RowStatus::Completed))
            }
            Err(e) => {
                debug!(category = ?e.category(), "tagging failed for row {}", row.row_number);
                Ok(RowOutcome::failed(plan, row.row_number, RowStatus::TagFailed, e))
            }
        }
    }

    async fn output_exists(&self, plan: &TrackPlan) -> Result<bool, RowError> {
        tokio::fs::try_exists(&plan.output_file)
            .await
            .map_err(|source| RowError::Io {
                path: plan.output_file.clone(),
                source,
            })
    }
}

/// One human-readable line per finished row
fn log_outcome(outcome: &RowOutcome) {
    let message = outcome.error_message.as_deref().unwrap_or_default();
    match outcome.status {
        RowStatus::Completed | RowStatus::Skipped => {}
        RowStatus::DownloadFailed => {
            warn!("❌ Failed to download: {} ({})", outcome.query, message)
        }
        RowStatus::TagFailed => {
            warn!("⚠️ Error embedding metadata for {}: {}", outcome.query, message)
        }
        RowStatus::RowError => error!(
            "❌ Error processing row {} {:?}: {}",
            outcome.row_number, outcome.query, message
        ),
    }
}
