//! File-level progress reporting for pipeline runs

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Progress reporter over the files of one run
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        Self { progress_bar: None }
    }

    /// Set up progress reporting for the given number of files
    pub fn setup_progress(&mut self, total_files: usize) {
        let pb = ProgressBar::new(total_files as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        pb.set_message("Processing workbooks");

        debug!("Progress bar initialized for {} files", total_files);
        self.progress_bar = Some(pb);
    }

    /// Record one file finished (processed, failed, or skipped)
    pub fn increment(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
