use glob::Pattern;
use std::path::Path;

/// Extensions searched when the caller supplies none
pub const DEFAULT_EXTENSIONS: &[&str] = &[".txt", ".csv", ".sql"];

/// Returns the default extension set as owned strings
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Normalizes a single extension: trims it, lower-cases it and makes sure it
/// starts with a dot. Returns `None` for blank input.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}

/// Normalizes a list of extensions, dropping blanks and duplicates.
/// Falls back to [`DEFAULT_EXTENSIONS`] when nothing usable is left.
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for ext in extensions {
        if let Some(ext) = normalize_extension(ext.as_ref()) {
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
    }

    if normalized.is_empty() {
        default_extensions()
    } else {
        normalized
    }
}

/// Splits a comma separated extension list such as `"txt, .CSV,sql"`
pub fn parse_extension_list(input: &str) -> Vec<String> {
    normalize_extensions(input.split(','))
}

/// Checks whether the file name ends with any of the (normalized) extensions.
/// The comparison is case-insensitive.
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Compiles glob ignore patterns, skipping any that fail to parse
pub fn compile_ignore_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("Ignoring invalid ignore pattern '{}': {}", p, e);
                None
            }
        })
        .collect()
}

/// Checks a path (relative to the scan root) against compiled ignore patterns
pub fn should_ignore(relative_path: &Path, ignore_patterns: &[Pattern]) -> bool {
    if ignore_patterns.is_empty() {
        return false;
    }
    let normalized_path = relative_path.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|p| p.matches(&normalized_path))
}

/// Lower-cased extension of a file name including the leading dot, or an
/// empty string when the name has none
pub fn extension_key(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("txt"), Some(".txt".to_string()));
        assert_eq!(normalize_extension(".CSV"), Some(".csv".to_string()));
        assert_eq!(normalize_extension("  sql "), Some(".sql".to_string()));
        assert_eq!(normalize_extension("'log'"), Some(".log".to_string()));
        assert_eq!(normalize_extension(""), None);
        assert_eq!(normalize_extension("   "), None);
        assert_eq!(normalize_extension("."), None);
    }

    #[test]
    fn test_normalize_extensions_defaults() {
        let none: Vec<String> = vec![];
        assert_eq!(normalize_extensions(none), default_extensions());
        assert_eq!(normalize_extensions([" ", ""]), default_extensions());
        assert_eq!(
            normalize_extensions(["TXT", "txt", ".log"]),
            vec![".txt".to_string(), ".log".to_string()]
        );
    }

    #[test]
    fn test_parse_extension_list() {
        assert_eq!(
            parse_extension_list("txt, .CSV,sql"),
            vec![".txt".to_string(), ".csv".to_string(), ".sql".to_string()]
        );
        assert_eq!(parse_extension_list(""), default_extensions());
    }

    #[test]
    fn test_has_valid_extension() {
        let extensions = vec![".txt".to_string(), ".tar.gz".to_string()];
        assert!(has_valid_extension(Path::new("a.txt"), &extensions));
        assert!(has_valid_extension(Path::new("dir/B.TXT"), &extensions));
        assert!(has_valid_extension(Path::new("dump.tar.gz"), &extensions));
        assert!(!has_valid_extension(Path::new("a.csv"), &extensions));
        assert!(!has_valid_extension(Path::new("atxt"), &extensions));
        assert!(!has_valid_extension(Path::new("notes"), &extensions));
    }

    #[test]
    fn test_should_ignore() {
        let patterns = compile_ignore_patterns(&[
            "archive/**".to_string(),
            "**/*.bak.txt".to_string(),
            "[".to_string(),
        ]);
        assert_eq!(patterns.len(), 2);

        assert!(should_ignore(Path::new("archive/old.txt"), &patterns));
        assert!(should_ignore(Path::new("x/y/file.bak.txt"), &patterns));
        assert!(!should_ignore(Path::new("current/new.txt"), &patterns));
        assert!(!should_ignore(Path::new("archive.txt"), &[]));
    }

    #[test]
    fn test_extension_key() {
        assert_eq!(extension_key(Path::new("a/b/Data.CSV")), ".csv");
        assert_eq!(extension_key(Path::new("README")), "");
        assert_eq!(extension_key(Path::new("dump.tar.gz")), ".gz");
    }
}
