//! # Progress Reporting
//!
//! Batch operations report `(completed, total)` after every finished unit of
//! work. Calls come from a single dispatcher, so `completed` never decreases
//! and reporters need no ordering logic of their own.

use std::io::{self, Write};

/// Bar width in characters
const BAR_LENGTH: usize = 40;

const BAR_FILL: char = '█';
const BAR_EMPTY: char = '-';

/// Receives completion counts from a running batch
pub trait ProgressReporter: Send + Sync {
    fn report(&self, completed: usize, total: usize);
}

/// Reporter that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _completed: usize, _total: usize) {}
}

/// Render one progress line, e.g. `\rFetching playlists: |████----| 50.0% Complete`.
///
/// Returns `None` for an empty batch. The line gets a trailing newline once
/// `completed == total` so the next output starts on a fresh line.
pub fn render_progress_bar(completed: usize, total: usize, prefix: &str, suffix: &str) -> Option<String> {
    if total == 0 {
        return None;
    }

    let completed = completed.min(total);
    let percent = 100.0 * completed as f64 / total as f64;
    let filled = BAR_LENGTH * completed / total;

    let bar: String = std::iter::repeat(BAR_FILL)
        .take(filled)
        .chain(std::iter::repeat(BAR_EMPTY).take(BAR_LENGTH - filled))
        .collect();

    let mut line = format!("\r{} |{}| {:.1}% {}", prefix, bar, percent, suffix);
    if completed == total {
        line.push('\n');
    }
    Some(line)
}

/// Writes a redrawn progress bar to stdout on every update
#[derive(Debug, Clone)]
pub struct ConsoleProgress {
    prefix: String,
    suffix: String,
}

impl ConsoleProgress {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: "Complete".to_string(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, completed: usize, total: usize) {
        if let Some(line) = render_progress_bar(completed, total, &self.prefix, &self.suffix) {
            let mut stdout = io::stdout().lock();
            // Progress output is best effort
            let _ = stdout.write_all(line.as_bytes());
            let _ = stdout.flush();
        }
    }
}

/// Creates a labelled reporter for each batch an operation starts
pub trait ProgressFactory: Send + Sync {
    fn create(&self, label: &str) -> Box<dyn ProgressReporter>;
}

impl ProgressFactory for NoopProgress {
    fn create(&self, _label: &str) -> Box<dyn ProgressReporter> {
        Box::new(NoopProgress)
    }
}

/// Factory for [`ConsoleProgress`] bars prefixed with the batch label
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgressFactory;

impl ProgressFactory for ConsoleProgressFactory {
    fn create(&self, label: &str) -> Box<dyn ProgressReporter> {
        Box::new(ConsoleProgress::new(label))
    }
}
