use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::encoder::{QrCodeEncoder, QrEncoder};
use crate::file_utils::FileManager;
use crate::generation::{BatchGenerator, BatchReport};
use crate::record_parser::count_well_formed;

// @module: Application controller for batch QR generation

/// Name of the issues log written next to the generated files
pub const ISSUES_LOG_FILE: &str = "qrbatch.issues.log";

/// Main application controller for batch generation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Generator shared by every run of this controller
    generator: BatchGenerator,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_encoder(config, Arc::new(QrCodeEncoder::new()))
    }

    // @method: Create a controller around a specific encoder
    pub fn with_encoder(config: Config, encoder: Arc<dyn QrEncoder>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let generator = BatchGenerator::new(encoder, config.generation.clone())
            .context("Failed to create generator")?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a record list from a file path, or from stdin when the path is `-`
    pub fn read_records(source: &str) -> Result<String> {
        if source == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read records from stdin")?;
            Ok(buffer)
        } else {
            FileManager::read_to_string(source)
        }
    }

    /// Generate every record into `output_dir`, with a progress bar
    pub fn run(
        &self,
        record_list: &str,
        output_dir: &Path,
        file_extension: &str,
    ) -> Result<BatchReport> {
        let start_time = std::time::Instant::now();
        let output_folder = output_dir
            .to_str()
            .with_context(|| format!("Output folder is not valid UTF-8: {:?}", output_dir))?;
        info!("Found {} records", count_well_formed(record_list));

        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] \
                 {pos}/{len} records ({percent}%) {msg} {eta}",
            )
            .or_else(|_| {
                ProgressStyle::default_bar().template(
                    "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}",
                )
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Generating");

        let pb = progress_bar.clone();
        let result = self.generator.generate_with_progress(
            record_list,
            output_folder,
            file_extension,
            move |completed, total| {
                pb.set_length(total as u64);
                pb.set_position(completed as u64);
            },
        );
        progress_bar.finish_and_clear();

        let report = result?;

        if report.has_issues() && self.config.generation.write_issues_log {
            let log_path = output_dir.join(ISSUES_LOG_FILE);
            match self.write_issues_log(&report, &log_path) {
                Ok(()) => info!("Issues written to {}", log_path.display()),
                Err(e) => warn!("Failed to write issues log: {}", e),
            }
        }

        info!(
            "{} ({}) in {}",
            report.summary,
            report.counts(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(report)
    }

    /// Append failed paths and malformed lines to the issues log, one timestamped line each
    fn write_issues_log(&self, report: &BatchReport, file_path: &Path) -> Result<()> {
        FileManager::append_to_log_file(
            file_path,
            &format!("Folder: {} | {}", report.output_folder.display(), report.counts()),
        )?;

        for path in report.failures.paths() {
            FileManager::append_to_log_file(file_path, &format!("[FAILED] {}", path.display()))?;
        }
        for line in &report.malformed {
            let entry = format!("[MALFORMED] line {}: {}", line.sequence_index + 1, line.error);
            FileManager::append_to_log_file(file_path, &entry)?;
        }
        if report.cancelled > 0 {
            let entry = format!("[CANCELLED] {} records", report.cancelled);
            FileManager::append_to_log_file(file_path, &entry)?;
        }

        Ok(())
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
