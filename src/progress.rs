//! Fetch progress for registry prefetch
//!
//! One bar per prefetch run. Each finished fetch advances it; failed fetches
//! are counted and shown in the message so a slow run with a dead registry
//! is visible before the solver reports it.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.cyan} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Counts reported once a prefetch run is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchSummary {
    pub fetched: usize,
    pub failed: usize,
}

/// Tracks fetches against one registry
pub struct FetchProgress {
    bar: ProgressBar,
    fetched: AtomicUsize,
    failed: AtomicUsize,
}

impl FetchProgress {
    /// Track `total` fetches from `registry`; a hidden bar still counts
    pub fn new(visible: bool, total: usize, registry: &str) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(total as u64);
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .map(|style| style.progress_chars("█▓▒░"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_prefix(format!("Fetching from {}", registry));

        Self {
            bar,
            fetched: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// A package's releases arrived
    pub fn fetched(&self, name: &str) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
        self.advance(name);
    }

    /// A package's fetch failed
    pub fn failed(&self, name: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.advance(name);
    }

    fn advance(&self, name: &str) {
        self.bar.inc(1);
        match self.failed.load(Ordering::Relaxed) {
            0 => self.bar.set_message(name.to_string()),
            failed => self.bar.set_message(format!("{} ({} failed)", name, failed)),
        }
    }

    /// Current counts
    pub fn summary(&self) -> FetchSummary {
        FetchSummary {
            fetched: self.fetched.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Clear the bar and return the final counts
    pub fn finish(self) -> FetchSummary {
        self.bar.finish_and_clear();
        self.summary()
    }
}
