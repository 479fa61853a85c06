use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::enumerate::{ensure_root, file_size_or_zero, walk_files};
use crate::errors::ScanResult;
use crate::filters::{default_extensions, extension_key};
use crate::results::bytes_to_gb;

/// Overview of a search location, independent of any search string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    #[serde(rename = "search_location")]
    pub root_path: PathBuf,
    pub total_files: usize,
    pub total_size_bytes: u64,
    pub total_size_gb: f64,
    /// Lower-cased extension (with dot, `""` for none) to file count
    pub file_types: BTreeMap<String, usize>,
    pub supported_extensions: Vec<String>,
}

/// Counts every regular file under `root`, whatever its extension
pub fn location_stats(root: &Path) -> ScanResult<LocationStats> {
    ensure_root(root)?;

    let mut total_files = 0;
    let mut total_size_bytes = 0;
    let mut file_types: BTreeMap<String, usize> = BTreeMap::new();

    for path in walk_files(root) {
        total_files += 1;
        *file_types.entry(extension_key(&path)).or_default() += 1;
        total_size_bytes += file_size_or_zero(&path);
    }

    debug!(
        "Location {} holds {} files ({} bytes)",
        root.display(),
        total_files,
        total_size_bytes
    );

    Ok(LocationStats {
        root_path: root.to_path_buf(),
        total_files,
        total_size_bytes,
        total_size_gb: bytes_to_gb(total_size_bytes),
        file_types,
        supported_extensions: default_extensions(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_location_stats_counts_all_types() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "1234").unwrap();
        fs::write(dir.path().join("b.TXT"), "12").unwrap();
        fs::write(dir.path().join("sub/c.log"), "1").unwrap();
        fs::write(dir.path().join("sub/README"), "123").unwrap();

        let stats = location_stats(dir.path()).unwrap();
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.total_size_bytes, 10);
        assert_eq!(stats.total_size_gb, 0.0);
        assert_eq!(stats.file_types.get(".txt"), Some(&2));
        assert_eq!(stats.file_types.get(".log"), Some(&1));
        assert_eq!(stats.file_types.get(""), Some(&1));
        assert_eq!(stats.supported_extensions, vec![".txt", ".csv", ".sql"]);
    }

    #[test]
    fn test_location_stats_missing_root() {
        let dir = tempdir().unwrap();
        let err = location_stats(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound(_)));
    }
}
