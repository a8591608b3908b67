//! Audio Batch Downloader - command line entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use audio_batch_downloader::{
    commands::{check_tools, export_config, preview_import_data, run_batch},
    utils::logging,
    AppConfig, NAME, VERSION,
};

/// Download a song list as tagged audio files.
#[derive(Parser)]
#[command(name = "audio-batch-downloader", version, about)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true, env = "AUDIO_BATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Song list: two columns (track, artist), no header row.
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,

    /// Directory the audio files are written to.
    #[arg(long, short, global = true)]
    output_dir: Option<PathBuf>,

    /// Debug logging.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and tag every row of the song list (default).
    Run,

    /// Show the query and target file for each row without downloading.
    Preview {
        /// Only read this many rows.
        #[arg(long)]
        max_rows: Option<usize>,

        /// Print the preview as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check that yt-dlp and ffmpeg can be launched.
    Check,

    /// Print the effective configuration.
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    info!("🚀 {} v{}", NAME, VERSION);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            run_batch(&config)
                .await
                .context("Batch run aborted")?;
        }

        Commands::Preview { max_rows, json } => {
            let preview = preview_import_data(&config, max_rows)
                .await
                .context("Failed to preview song list")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!(
                    "{} rows ({}, {})",
                    preview.statistics.parsed_rows,
                    config.input.path.display(),
                    preview.statistics.detected_encoding
                );
                for row in &preview.rows {
                    match (&row.query, &row.output_file) {
                        (Some(query), Some(output)) => println!(
                            "  {:>4}  {:<40} -> {}",
                            row.row_number,
                            query,
                            output.display()
                        ),
                        _ => println!(
                            "  {:>4}  skipped: {}",
                            row.row_number,
                            row.error.as_deref().unwrap_or("unusable row")
                        ),
                    }
                }
            }
        }

        Commands::Check => {
            let statuses = check_tools(&config).await?;
            for status in &statuses {
                let state = if status.available { "ok" } else { "missing" };
                println!("{:<8} {:<8} {}", status.name, state, status.path.display());
            }
            if statuses.iter().any(|s| !s.available) {
                anyhow::bail!("Required tools are missing");
            }
        }

        Commands::ShowConfig => {
            println!("{}", export_config(&config)?);
        }
    }

    Ok(())
}

/// Defaults < file < environment < command line
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(input) = &cli.input {
        config.input.path = input.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_subcommand_is_run() {
        let cli = Cli::try_parse_from(["audio-batch-downloader", "--input", "songs.csv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("songs.csv")));
    }

    #[test]
    fn test_preview_flags() {
        let cli =
            Cli::try_parse_from(["audio-batch-downloader", "preview", "--max-rows", "5", "-v"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Preview {
                max_rows: Some(5),
                json: false
            })
        ));
    }
}
