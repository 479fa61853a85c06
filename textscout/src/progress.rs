use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::metrics::{ProgressSnapshot, ScanCounters};

/// Default refresh interval for the progress line
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Receives progress snapshots from a running reporter
pub trait ProgressSink: Send + Sync {
    fn start(&self, _total_files: u64) {}
    fn update(&self, snapshot: &ProgressSnapshot);
    fn finish(&self, _snapshot: &ProgressSnapshot) {}
}

/// Runs a periodic progress observer alongside a scan.
///
/// The observer thread samples [`ScanCounters`] on a fixed interval and is
/// stopped by dropping a channel sender when the scan returns. It is joined
/// before `run` returns.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    interval: Duration,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl ProgressReporter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs `work` while an observer thread reports on `counters`.
    ///
    /// The sink sees `start`, zero or more `update`s, then a final `finish`
    /// taken after `work` has returned.
    pub fn run<T, F>(&self, counters: &ScanCounters, sink: &dyn ProgressSink, work: F) -> T
    where
        F: FnOnce() -> T,
    {
        sink.start(counters.total_files());
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.interval;

        let result = thread::scope(|scope| {
            scope.spawn(move || observe(counters, sink, stop_rx, interval));
            let result = work();
            drop(stop_tx);
            result
        });

        sink.finish(&counters.snapshot());
        result
    }
}

fn observe(
    counters: &ScanCounters,
    sink: &dyn ProgressSink,
    stop_rx: Receiver<()>,
    interval: Duration,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                let snapshot = counters.snapshot();
                sink.update(&snapshot);
                if snapshot.files_processed >= snapshot.total_files {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Renders a snapshot as a single status line
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "Progress: {:.1}% ({}/{}) | Elapsed: {:.1}s | Speed: {:.1} files/s | ETA: {}",
        snapshot.percent,
        snapshot.files_processed,
        snapshot.total_files,
        snapshot.elapsed.as_secs_f64(),
        snapshot.rate,
        humantime::format_duration(Duration::from_secs(snapshot.eta.as_secs())),
    )
}

/// Draws one overwritten progress line on stderr.
///
/// Drawing is suppressed automatically when stderr is not a terminal.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// A sink that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style =
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn start(&self, total_files: u64) {
        self.bar.set_length(total_files);
        self.bar.set_position(0);
    }

    fn update(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(snapshot.files_processed);
        self.bar.set_message(format_progress(snapshot));
    }

    fn finish(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(snapshot.files_processed);
        self.bar.finish_with_message(format_progress(snapshot));
    }
}
