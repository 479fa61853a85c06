use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::scanner::ContentScanner;
use crate::cancel::CancellationToken;
use crate::config::ScanRequest;
use crate::enumerate::enumerate;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanCounters;
use crate::progress::{ProgressReporter, ProgressSink, DEFAULT_PROGRESS_INTERVAL};
use crate::results::{aggregate, bytes_to_gb, ScanSummary};

/// Optional knobs for a scan. The defaults run silently with no way to cancel.
pub struct ScanOptions<'a> {
    /// Checked between files; cancelling ends the scan with `Cancelled`
    pub cancel: CancellationToken,
    /// When set, a reporter thread feeds this sink while the scan runs
    pub progress: Option<&'a dyn ProgressSink>,
    pub progress_interval: Duration,
}

impl Default for ScanOptions<'_> {
    fn default() -> Self {
        Self {
            cancel: CancellationToken::new(),
            progress: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl<'a> ScanOptions<'a> {
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, sink: &'a dyn ProgressSink, interval: Duration) -> Self {
        self.progress = Some(sink);
        self.progress_interval = interval;
        self
    }
}

/// Convenience entry point taking the raw request parts
pub fn scan_directory<I, S>(
    search_string: &str,
    root_path: &Path,
    extensions: I,
) -> ScanResult<ScanSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let request = ScanRequest::new(search_string, root_path, extensions)?;
    run_scan(&request)
}

/// Runs a scan synchronously with no progress reporting
pub fn run_scan(request: &ScanRequest) -> ScanResult<ScanSummary> {
    run_scan_with(request, ScanOptions::default())
}

/// Enumerates, scans and aggregates a single request.
///
/// Fails with `RootNotFound` before any scanning if the root is unusable,
/// and with `NoFilesFound` (carrying a zero-count summary) when no file
/// passes the extension filter.
pub fn run_scan_with(request: &ScanRequest, options: ScanOptions<'_>) -> ScanResult<ScanSummary> {
    if request.search_string.is_empty() {
        return Err(ScanError::invalid_request("Search string is required"));
    }
    if request.root_path.as_os_str().is_empty() {
        return Err(ScanError::invalid_request("Search location is required"));
    }
    if request.extensions.is_empty() {
        return Err(ScanError::invalid_request("At least one extension is required"));
    }

    info!(
        "Starting search for '{}' in {}",
        request.search_string,
        request.root_path.display()
    );

    let enumeration = enumerate(
        &request.root_path,
        &request.extensions,
        &request.ignore_patterns,
    )?;

    if enumeration.is_empty() {
        info!(
            "No files found with extensions: {}",
            request.extensions.join(", ")
        );
        return Err(ScanError::no_files_found(ScanSummary::empty(request)));
    }

    info!(
        "Searching {} files, ~{:.2} GB",
        enumeration.len(),
        bytes_to_gb(enumeration.total_size_bytes)
    );

    let scanner = ContentScanner::new(request.search_string.as_str());
    let counters = ScanCounters::new(enumeration.len() as u64);
    let scan = || scanner.scan(&enumeration.entries, &counters, &options.cancel);

    let outcomes = match options.progress {
        Some(sink) => {
            debug!("Starting progress reporter");
            ProgressReporter::new(options.progress_interval).run(&counters, sink, scan)?
        }
        None => scan()?,
    };

    let summary = aggregate(request, &enumeration, outcomes, counters.elapsed());
    info!(
        "Search complete. Found '{}' in {} of {} files in {:.2}s",
        summary.search_string,
        summary.matches_found,
        summary.files_searched,
        summary.elapsed_seconds
    );

    Ok(summary)
}
