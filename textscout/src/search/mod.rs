pub mod engine;
pub mod scanner;

pub use engine::{run_scan, run_scan_with, scan_directory, ScanOptions};
pub use scanner::ContentScanner;
