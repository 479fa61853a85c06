use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::{trace, warn};

use crate::cancel::CancellationToken;
use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanCounters;
use crate::results::{FileEntry, FileOutcome, MatchRecord};

const BUFFER_CAPACITY: usize = 65536;
const LINE_CAPACITY: usize = 256;

/// Decodes one line, replacing invalid UTF-8 instead of failing
fn decode_line<'a>(bytes: &'a [u8], path: &Path) -> Cow<'a, str> {
    let cow = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = cow {
        trace!("Invalid UTF-8 replaced in file: {}", path.display());
    }
    cow
}

/// Reads one line into `buf` without its terminator. `\n`, `\r\n` and a
/// lone `\r` all end a line. Returns the number of bytes consumed, 0 at EOF.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut read = 0;
    loop {
        let (terminator, used) = {
            let available = match reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read);
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    buf.extend_from_slice(&available[..i]);
                    (Some(available[i]), i + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (None, available.len())
                }
            }
        };
        reader.consume(used);
        read += used;

        match terminator {
            Some(b'\r') => {
                // The `\n` of a `\r\n` pair may sit at the start of the next buffer
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                    read += 1;
                }
                return Ok(read);
            }
            Some(_) => return Ok(read),
            None => {}
        }
    }
}

/// Streams files line by line looking for the first literal occurrence of a
/// search string
#[derive(Debug, Clone)]
pub struct ContentScanner {
    search_string: String,
}

impl ContentScanner {
    pub fn new(search_string: impl Into<String>) -> Self {
        Self {
            search_string: search_string.into(),
        }
    }

    pub fn search_string(&self) -> &str {
        &self.search_string
    }

    /// Returns the first matching line of a file, or `None` if the string
    /// never occurs. Reading stops at the first match.
    pub fn find_first_match(&self, entry: &FileEntry) -> ScanResult<Option<MatchRecord>> {
        let path = entry.absolute_path.as_path();
        let file = File::open(path).map_err(|e| ScanError::file_access(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut buffer = Vec::with_capacity(LINE_CAPACITY);
        let mut line_number = 0;

        loop {
            buffer.clear();
            let read =
                read_line(&mut reader, &mut buffer).map_err(|e| ScanError::file_access(path, e))?;
            if read == 0 {
                return Ok(None);
            }
            line_number += 1;

            let line = decode_line(&buffer, path);
            if line.contains(self.search_string.as_str()) {
                return Ok(Some(MatchRecord::new(entry, line_number, &line)));
            }
        }
    }

    /// Scans one file. Read errors are logged and turned into
    /// [`FileOutcome::Skipped`] instead of being returned.
    pub fn scan_file(&self, entry: &FileEntry) -> FileOutcome {
        trace!("Processing file: {}", entry.absolute_path.display());
        match self.find_first_match(entry) {
            Ok(Some(record)) => FileOutcome::Matched(record),
            Ok(None) => FileOutcome::NoMatch,
            Err(e) => {
                warn!("{}", e);
                FileOutcome::Skipped {
                    relative_path: entry.relative_path.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Scans every entry in order, bumping `counters` after each file.
    ///
    /// The token is checked before each file; once it is cancelled the scan
    /// stops with [`ScanError::Cancelled`].
    pub fn scan(
        &self,
        entries: &[FileEntry],
        counters: &ScanCounters,
        cancel: &CancellationToken,
    ) -> ScanResult<Vec<FileOutcome>> {
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled {
                    files_processed: counters.files_processed(),
                });
            }
            outcomes.push(self.scan_file(entry));
            counters.record_file_processed();
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn entry_for(dir: &Path, name: &str) -> FileEntry {
        let absolute_path = dir.join(name);
        let size_bytes = fs::metadata(&absolute_path).map(|m| m.len()).unwrap_or(0);
        FileEntry {
            absolute_path,
            relative_path: PathBuf::from(name),
            size_bytes,
        }
    }

    #[test]
    fn test_first_match_only() {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join("data.txt")).unwrap();
        for i in 1..=1000 {
            if i % 100 == 0 {
                writeln!(file, "row {} contains secret_token", i).unwrap();
            } else {
                writeln!(file, "row {} is clean", i).unwrap();
            }
        }
        drop(file);

        let scanner = ContentScanner::new("secret_token");
        let record = scanner
            .find_first_match(&entry_for(dir.path(), "data.txt"))
            .unwrap()
            .expect("match expected");
        assert_eq!(record.line_number, 100);
        assert_eq!(record.full_line, "row 100 contains secret_token");
    }

    #[test]
    fn test_case_sensitive_literal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "Secret\nSECRET\nse.ret\nsecret\n").unwrap();

        let scanner = ContentScanner::new("secret");
        let record = scanner
            .find_first_match(&entry_for(dir.path(), "a.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(record.line_number, 4);

        // No regex semantics
        let scanner = ContentScanner::new("se.ret");
        let record = scanner
            .find_first_match(&entry_for(dir.path(), "a.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(record.line_number, 3);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("win.csv"), "id,name\r\n1,alpha\r\n2,needle").unwrap();

        let record = ContentScanner::new("needle")
            .find_first_match(&entry_for(dir.path(), "win.csv"))
            .unwrap()
            .unwrap();
        assert_eq!(record.line_number, 3);
        assert_eq!(record.full_line, "2,needle");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let mut bytes = b"first line\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b' ']);
        bytes.extend_from_slice(b"needle after garbage\n");
        fs::write(dir.path().join("bin.txt"), bytes).unwrap();

        let record = ContentScanner::new("needle")
            .find_first_match(&entry_for(dir.path(), "bin.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(record.line_number, 2);
        assert!(record.full_line.ends_with("needle after garbage"));
        assert!(record.full_line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_no_match_and_empty_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plain.txt"), "nothing here\n").unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        let scanner = ContentScanner::new("needle");
        assert_eq!(
            scanner.scan_file(&entry_for(dir.path(), "plain.txt")),
            FileOutcome::NoMatch
        );
        assert_eq!(
            scanner.scan_file(&entry_for(dir.path(), "empty.txt")),
            FileOutcome::NoMatch
        );
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempdir().unwrap();
        let scanner = ContentScanner::new("needle");
        let outcome = scanner.scan_file(&entry_for(dir.path(), "vanished.txt"));
        match outcome {
            FileOutcome::Skipped {
                relative_path,
                reason,
            } => {
                assert_eq!(relative_path, PathBuf::from("vanished.txt"));
                assert!(reason.contains("vanished.txt"));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_counts_every_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "needle\n").unwrap();
        fs::write(dir.path().join("b.txt"), "hay\n").unwrap();
        let entries = vec![
            entry_for(dir.path(), "a.txt"),
            entry_for(dir.path(), "missing.txt"),
            entry_for(dir.path(), "b.txt"),
        ];

        let counters = ScanCounters::new(entries.len() as u64);
        let outcomes = ContentScanner::new("needle")
            .scan(&entries, &counters, &CancellationToken::new())
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].as_match().is_some());
        assert!(outcomes[1].is_skipped());
        assert_eq!(outcomes[2], FileOutcome::NoMatch);
        assert_eq!(counters.files_processed(), 3);
        assert!(counters.is_complete());
    }

    #[test]
    fn test_scan_stops_when_cancelled() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "needle\n").unwrap();
        let entries = vec![entry_for(dir.path(), "a.txt")];

        let token = CancellationToken::new();
        token.cancel();
        let counters = ScanCounters::new(1);
        let err = ContentScanner::new("needle")
            .scan(&entries, &counters, &token)
            .unwrap_err();
        assert!(matches!(err, ScanError::Cancelled { files_processed: 0 }));
    }

    #[test]
    fn test_lone_carriage_return_ends_line() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mac.txt"), "header\rrow one\rfindme here\r").unwrap();

        let record = ContentScanner::new("findme")
            .find_first_match(&entry_for(dir.path(), "mac.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(record.line_number, 3);
        assert_eq!(record.full_line, "findme here");
    }

    #[test]
    fn test_read_line_terminators() {
        let mut reader = BufReader::with_capacity(4, &b"ab\r\ncd\r\ref\ngh"[..]);
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        while read_line(&mut reader, &mut buf).unwrap() > 0 {
            lines.push(String::from_utf8(buf.clone()).unwrap());
            buf.clear();
        }
        assert_eq!(lines, vec!["ab", "cd", "", "ef", "gh"]);
    }
}
