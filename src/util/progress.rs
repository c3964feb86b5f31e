//! Progress indicator for runs over several test files.
//!
//! The bar counts files, not tests: a file's test count is unknown until it
//! has been read. It draws on stderr and only when stderr is a terminal, so
//! the summary line on stdout stays clean for scripts.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Check if we should show progress indicators.
///
/// Progress is shown only for multi-file runs on an interactive stderr, and
/// never alongside verbose logging or JSON output.
#[must_use]
pub fn should_show_progress(sources: usize, verbose: u8, json: bool) -> bool {
    sources > 1 && verbose == 0 && !json && stderr().is_terminal()
}

/// Create a determinate progress bar over `total` files.
#[must_use]
pub fn create_progress_bar(total: u64, show: bool) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if show {
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// Per-file progress for one run.
pub struct SourceProgress {
    bar: ProgressBar,
    showing: bool,
}

impl SourceProgress {
    #[must_use]
    pub fn new(total: usize, show: bool) -> Self {
        Self {
            bar: create_progress_bar(total as u64, show),
            showing: show,
        }
    }

    /// Progress that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(0, false)
    }

    /// Announce the file about to be read.
    pub fn start(&self, source: &str) {
        self.bar.set_message(source.to_string());
    }

    /// Mark the current file as done.
    pub fn finish_source(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[must_use]
    pub const fn is_showing(&self) -> bool {
        self.showing
    }

    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
