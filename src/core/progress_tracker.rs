//! Overall batch progress display
//!
//! One progress bar for the whole run (current/total, rate, ETA). While the
//! bar is active, log lines are printed above it instead of through it.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::models::{BatchReport, RowStatus};
use crate::utils::logging;

const BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})";

pub const DEFAULT_MESSAGE: &str = "Downloading songs";

pub struct ProgressTracker {
    bar: ProgressBar,
    failures: u64,
}

impl ProgressTracker {
    /// Bar drawn on stderr
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(DEFAULT_MESSAGE);
        Self { bar, failures: 0 }
    }

    /// Tracker that counts but never draws
    pub fn hidden(total: usize) -> Self {
        let tracker = Self::new(total);
        tracker.bar.set_draw_target(ProgressDrawTarget::hidden());
        tracker
    }

    pub fn for_config(total: usize, show_progress: bool) -> Self {
        if show_progress {
            Self::new(total)
        } else {
            Self::hidden(total)
        }
    }

    /// Start drawing and route log output above the bar
    pub fn start(&self) {
        logging::attach_progress_bar(&self.bar);
        self.bar.tick();
    }

    /// Count one finished row
    pub fn advance(&mut self, status: RowStatus) {
        if status.is_failure() {
            self.failures += 1;
            self.bar
                .set_message(format!("{} ({} failed)", DEFAULT_MESSAGE, self.failures));
        }
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Leave the final state on screen and stop routing logs through the bar
    pub fn finish(&self, report: &BatchReport) {
        self.bar.finish_with_message(format!("Done: {}", report.summary()));
        logging::detach_progress_bar();
    }
}
