pub mod cancel;
pub mod config;
pub mod enumerate;
pub mod errors;
pub mod filters;
pub mod location;
pub mod metrics;
pub mod progress;
pub mod results;
pub mod search;

pub use cancel::CancellationToken;
pub use config::{ScanConfig, ScanRequest};
pub use enumerate::{enumerate, Enumeration};
pub use errors::{ScanError, ScanResult};
pub use location::{location_stats, LocationStats};
pub use metrics::{ProgressSnapshot, ScanCounters};
pub use progress::{ProgressReporter, ProgressSink, TerminalProgress};
pub use results::{FileEntry, FileOutcome, MatchRecord, ScanSummary};
pub use search::{run_scan, run_scan_with, scan_directory, ContentScanner, ScanOptions};
