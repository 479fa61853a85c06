use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared progress counters for one scan.
///
/// The scanning worker is the only writer; any number of observers may read.
/// Clones share the same counters. A fresh instance is created per scan.
#[derive(Debug, Clone)]
pub struct ScanCounters {
    files_processed: Arc<AtomicU64>,
    total_files: Arc<AtomicU64>,
    started: Instant,
}

impl ScanCounters {
    /// Creates counters for a scan over `total_files` files, starting the clock now
    pub fn new(total_files: u64) -> Self {
        Self {
            files_processed: Arc::new(AtomicU64::new(0)),
            total_files: Arc::new(AtomicU64::new(total_files)),
            started: Instant::now(),
        }
    }

    /// Records one finished file, matched or not
    pub fn record_file_processed(&self) -> u64 {
        self.files_processed.fetch_add(1, Ordering::Release) + 1
    }

    pub fn files_processed(&self) -> u64 {
        self.files_processed.load(Ordering::Acquire)
    }

    pub fn total_files(&self) -> u64 {
        self.total_files.load(Ordering::Acquire)
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_complete(&self) -> bool {
        self.files_processed() >= self.total_files()
    }

    /// Takes a consistent-enough snapshot for progress display
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::compute(self.files_processed(), self.total_files(), self.elapsed())
    }
}

/// Point-in-time view of scan progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub files_processed: u64,
    pub total_files: u64,
    /// 0..=100
    pub percent: f64,
    pub elapsed: Duration,
    /// Files per second, 0 when no time has passed yet
    pub rate: f64,
    /// Estimated time left, zero when the rate is still unknown
    pub eta: Duration,
}

impl ProgressSnapshot {
    pub fn compute(files_processed: u64, total_files: u64, elapsed: Duration) -> Self {
        let percent = if total_files > 0 {
            (files_processed as f64 / total_files as f64) * 100.0
        } else {
            100.0
        };

        let elapsed_secs = elapsed.as_secs_f64();
        let rate = if elapsed_secs > f64::EPSILON {
            files_processed as f64 / elapsed_secs
        } else {
            0.0
        };

        let remaining = total_files.saturating_sub(files_processed);
        let eta = if rate > f64::EPSILON {
            Duration::from_secs_f64(remaining as f64 / rate)
        } else {
            Duration::ZERO
        };

        Self {
            files_processed,
            total_files,
            percent,
            elapsed,
            rate,
            eta,
        }
    }
}
