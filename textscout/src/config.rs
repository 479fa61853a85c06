use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ScanError, ScanResult};
use crate::filters::{default_extensions, normalize_extensions};

/// A validated request for a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Literal text to look for (case-sensitive)
    pub search_string: String,
    /// Directory to scan recursively
    pub root_path: PathBuf,
    /// Normalized extensions, each starting with `.`; never empty
    pub extensions: Vec<String>,
    /// Glob patterns, relative to `root_path`, of files to leave out
    pub ignore_patterns: Vec<String>,
}

impl ScanRequest {
    /// Builds a request, rejecting an empty search string or root path.
    /// Extensions are normalized and the default set is used when none remain.
    pub fn new<I, S>(
        search_string: impl Into<String>,
        root_path: impl Into<PathBuf>,
        extensions: I,
    ) -> ScanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let search_string = search_string.into();
        let root_path = root_path.into();

        if search_string.is_empty() {
            return Err(ScanError::invalid_request("Search string is required"));
        }
        if root_path.as_os_str().is_empty() {
            return Err(ScanError::invalid_request("Search location is required"));
        }

        Ok(Self {
            search_string,
            root_path,
            extensions: normalize_extensions(extensions),
            ignore_patterns: Vec::new(),
        })
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to scan
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// File extensions to include (e.g. [".txt", "csv"])
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to ignore (glob syntax, relative to the root)
    /// Examples:
    /// - "archive/**": Ignore everything under archive/
    /// - "**/*.bak.txt": Ignore backup copies anywhere
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Whether to draw a progress line while scanning
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// How often the progress line is refreshed, in milliseconds
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_show_progress() -> bool {
    true
}

fn default_progress_interval_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            show_progress: default_show_progress(),
            progress_interval_ms: default_progress_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

/// Overrides supplied on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub extensions: Option<Vec<String>>,
    pub ignore_patterns: Vec<String>,
    pub no_progress: bool,
    pub log_level: Option<String>,
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> ScanResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an optional file.
    /// An explicitly named file must exist.
    pub fn load_from(config_path: Option<&Path>) -> ScanResult<Self> {
        let mut builder = ConfigBuilder::builder();

        // Global then local, so the local file wins
        let default_files = [
            dirs::config_dir().map(|p| p.join("textscout/config.yaml")),
            Some(PathBuf::from(".textscout.yaml")),
        ];
        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ScanError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(extensions) = cli.extensions {
            self.extensions = extensions;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.no_progress {
            self.show_progress = false;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    /// Builds a validated scan request for the given search string
    pub fn to_request(&self, search_string: impl Into<String>) -> ScanResult<ScanRequest> {
        Ok(
            ScanRequest::new(search_string, self.root_path.clone(), &self.extensions)?
                .with_ignore_patterns(self.ignore_patterns.clone()),
        )
    }
}
