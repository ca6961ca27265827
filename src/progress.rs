//! Progress reporting for the collection pipeline.
//!
//! The pipeline announces each [`Phase`] through the [`Progress`] trait and
//! never touches the terminal itself.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK_INTERVAL_MS: u64 = 100;
const HEARTS: [&str; 5] = ["💛 ", "💙 ", "💜 ", "💚 ", "✔ "];

/// A step of the pipeline, announced before the step starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ReadingManifest,
    ReadingTree,
    FetchingMaintainers,
    FetchingDownloads,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::ReadingManifest => write!(
                f,
                "Reading {} from metadata in {}...",
                "direct dependencies".cyan(),
                "package.json".magenta()
            ),
            Phase::ReadingTree => write!(
                f,
                "Reading {} from package tree in {}...",
                "dependencies".cyan(),
                "node_modules".magenta()
            ),
            Phase::FetchingMaintainers => write!(
                f,
                "Fetching package {} from {}...",
                "maintainers".cyan(),
                "npm".red()
            ),
            Phase::FetchingDownloads => write!(
                f,
                "Fetching package {} from {}...",
                "download counts".cyan(),
                "npm".red()
            ),
        }
    }
}

pub trait Progress: Send + Sync {
    /// Announce the phase that is about to run.
    fn phase(&self, phase: Phase);

    /// Clear the indicator. Called once, before anything is printed.
    fn done(&self);
}

/// Animated spinner on stderr.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner}{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&HEARTS),
        );
        bar.set_message(format!(
            "Getting ready to {} to {}...",
            "give thanks".cyan(),
            "maintainers".magenta()
        ));
        bar.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
        Self { bar }
    }
}

impl Progress for Spinner {
    fn phase(&self, phase: Phase) {
        log::debug!(target: "thanks::progress", "{:?}", phase);
        self.bar.set_message(phase.to_string());
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}

/// Reports nothing. Used for `--quiet`, JSON output and tests.
pub struct Silent;

impl Progress for Silent {
    fn phase(&self, phase: Phase) {
        log::debug!(target: "thanks::progress", "{:?}", phase);
    }

    fn done(&self) {}
}
