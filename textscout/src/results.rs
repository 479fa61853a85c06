use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ScanRequest;
use crate::enumerate::Enumeration;

/// Number of characters kept in a match preview
pub const PREVIEW_CHARS: usize = 100;
const PREVIEW_ELLIPSIS: &str = "...";
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// A file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub absolute_path: PathBuf,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Size on disk, or 0 when it could not be read
    pub size_bytes: u64,
}

/// The first matching line found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "file")]
    pub relative_path: PathBuf,
    #[serde(rename = "full_path")]
    pub absolute_path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    pub preview: String,
    pub full_line: String,
}

impl MatchRecord {
    pub fn new(entry: &FileEntry, line_number: usize, line: &str) -> Self {
        let full_line = line.trim().to_string();
        Self {
            relative_path: entry.relative_path.clone(),
            absolute_path: entry.absolute_path.clone(),
            line_number,
            preview: preview_text(&full_line),
            full_line,
        }
    }
}

/// Truncates a line to [`PREVIEW_CHARS`] characters, appending `...` when
/// anything was cut off
pub fn preview_text(line: &str) -> String {
    match line.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &line[..cut], PREVIEW_ELLIPSIS),
        None => line.to_string(),
    }
}

/// What happened to a single file during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Matched(MatchRecord),
    NoMatch,
    /// The file could not be opened or read; it still counts as processed
    Skipped {
        relative_path: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn as_match(&self) -> Option<&MatchRecord> {
        match self {
            FileOutcome::Matched(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped { .. })
    }
}

/// Aggregate result of one scan. Built once by [`aggregate`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub search_string: String,
    #[serde(rename = "search_location")]
    pub root_path: PathBuf,
    #[serde(rename = "file_extensions")]
    pub extensions: Vec<String>,
    pub files_searched: usize,
    /// Files that were counted but could not be read
    pub files_skipped: usize,
    pub total_data_bytes: u64,
    pub total_data_gb: f64,
    pub matches_found: usize,
    #[serde(rename = "search_time_seconds")]
    pub elapsed_seconds: f64,
    pub files_per_second: f64,
    pub matches: Vec<MatchRecord>,
}

impl ScanSummary {
    /// A summary for a scan that had nothing to search
    pub fn empty(request: &ScanRequest) -> Self {
        Self {
            search_string: request.search_string.clone(),
            root_path: request.root_path.clone(),
            extensions: request.extensions.clone(),
            files_searched: 0,
            files_skipped: 0,
            total_data_bytes: 0,
            total_data_gb: 0.0,
            matches_found: 0,
            elapsed_seconds: 0.0,
            files_per_second: 0.0,
            matches: Vec::new(),
        }
    }
}

/// Combines enumeration output, per-file outcomes and timing into a summary.
///
/// Matches keep the order in which the files were enumerated.
pub fn aggregate(
    request: &ScanRequest,
    enumeration: &Enumeration,
    outcomes: Vec<FileOutcome>,
    elapsed: Duration,
) -> ScanSummary {
    let files_searched = enumeration.entries.len();
    let files_skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
    let matches: Vec<MatchRecord> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            FileOutcome::Matched(m) => Some(m),
            _ => None,
        })
        .collect();

    let elapsed_secs = elapsed.as_secs_f64();
    let files_per_second = if elapsed_secs > f64::EPSILON {
        files_searched as f64 / elapsed_secs
    } else {
        0.0
    };

    ScanSummary {
        search_string: request.search_string.clone(),
        root_path: request.root_path.clone(),
        extensions: request.extensions.clone(),
        files_searched,
        files_skipped,
        total_data_bytes: enumeration.total_size_bytes,
        total_data_gb: bytes_to_gb(enumeration.total_size_bytes),
        matches_found: matches.len(),
        elapsed_seconds: round2(elapsed_secs),
        files_per_second: round2(files_per_second),
        matches,
    }
}

/// Converts a byte count to gigabytes (1024³), rounded to two decimals
pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
