use ignore::{DirEntry, WalkBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ScanError, ScanResult};
use crate::filters::{compile_ignore_patterns, has_valid_extension, should_ignore};
use crate::results::FileEntry;

/// Files selected for a scan, in traversal order, plus their combined size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub entries: Vec<FileEntry>,
    pub total_size_bytes: u64,
}

impl Enumeration {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fails with `RootNotFound` unless `root` is an existing directory
pub fn ensure_root(root: &Path) -> ScanResult<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ScanError::root_not_found(root))
    }
}

/// Walks `root` recursively and yields every regular file.
///
/// Hidden files and `.gitignore` rules are not honoured: an audit has to see
/// everything. Entries are sorted by name within each directory so the order
/// is stable for an unchanged tree.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    walker.build().filter_map(|entry| match entry {
        Ok(entry) if is_regular_file(&entry) => Some(entry.into_path()),
        Ok(_) => None,
        Err(e) => {
            warn!("Skipping unreadable directory entry: {}", e);
            None
        }
    })
}

fn is_regular_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        // Symlinks count when they point at a file
        Some(ft) if ft.is_symlink() => fs::metadata(entry.path()).is_ok_and(|m| m.is_file()),
        _ => false,
    }
}

/// Reads a file's size, logging and returning 0 when it cannot be read
pub(crate) fn file_size_or_zero(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            warn!("Could not read size of {}: {}", path.display(), e);
            0
        }
    }
}

/// Collects every file under `root` whose name ends with one of `extensions`
/// (case-insensitive) and is not excluded by `ignore_patterns`.
///
/// Files whose size cannot be read are still returned and count as 0 bytes.
pub fn enumerate(
    root: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
) -> ScanResult<Enumeration> {
    ensure_root(root)?;
    debug!(
        "Scanning for files in {} with extensions: {:?}",
        root.display(),
        extensions
    );

    let ignore_patterns = compile_ignore_patterns(ignore_patterns);
    let mut enumeration = Enumeration::default();

    for absolute_path in walk_files(root) {
        if !has_valid_extension(&absolute_path, extensions) {
            continue;
        }
        let relative_path = absolute_path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute_path.clone());
        if should_ignore(&relative_path, &ignore_patterns) {
            continue;
        }

        let size_bytes = file_size_or_zero(&absolute_path);
        enumeration.total_size_bytes += size_bytes;
        enumeration.entries.push(FileEntry {
            absolute_path,
            relative_path,
            size_bytes,
        });
    }

    debug!(
        "Found {} files ({} bytes) to search",
        enumeration.len(),
        enumeration.total_size_bytes
    );
    Ok(enumeration)
}
