use colored::Colorize;
use itertools::Itertools;
use serde_json::json;
use textscout::{LocationStats, ScanRequest, ScanSummary};

const RULE_WIDTH: usize = 60;

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Prints what is about to be searched
pub fn print_search_header(request: &ScanRequest) {
    println!("Search for: '{}'", request.search_string);
    println!("Search location: '{}'", request.root_path.display());
    println!("File types: {}", request.extensions.join(", "));
    if !request.ignore_patterns.is_empty() {
        println!("Ignoring: {}", request.ignore_patterns.join(", "));
    }
    println!("{}", rule('-'));
}

pub fn print_search_results(summary: &ScanSummary) {
    println!("\n{}", rule('='));
    println!("SEARCH RESULTS:");
    println!("{}", rule('='));

    if summary.matches.is_empty() {
        println!(
            "{} String '{}' not found in any files.",
            "✗".red(),
            summary.search_string
        );
    } else {
        println!(
            "{} Found '{}' in {} files:",
            "✓".green(),
            summary.search_string,
            summary.matches_found
        );
        println!("{}", rule('-'));
        for record in &summary.matches {
            println!(
                "  • File: {}",
                record.relative_path.display().to_string().blue()
            );
            println!("    Line: {}", record.line_number.to_string().green());
            println!("    Preview: {}", record.preview);
            println!();
        }
    }

    println!("\nSUMMARY:");
    println!("• Files searched: {}", summary.files_searched);
    if summary.files_skipped > 0 {
        println!(
            "• Files unreadable: {}",
            summary.files_skipped.to_string().yellow()
        );
    }
    println!("• Total data: {:.2} GB", summary.total_data_gb);
    println!("• Files with matches: {}", summary.matches_found);
    println!("• Search time: {:.2} seconds", summary.elapsed_seconds);
    println!("• Speed: {:.2} files/s", summary.files_per_second);
}

/// JSON body for a scan that had nothing to search
pub fn no_files_json(extensions: &str, summary: &ScanSummary) -> String {
    let body = json!({
        "error": format!("No files found with extensions: {}", extensions),
        "search_string": summary.search_string,
        "search_location": summary.root_path,
        "files_searched": summary.files_searched,
        "matches_found": summary.matches_found,
    });
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
}

pub fn print_location_stats(stats: &LocationStats) {
    println!("Search location: {}", stats.root_path.display());
    println!("• Total files: {}", stats.total_files);
    println!("• Total size: {:.2} GB", stats.total_size_gb);
    if !stats.file_types.is_empty() {
        let types = stats
            .file_types
            .iter()
            .map(|(ext, count)| {
                let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
                format!("{} {}", ext, count)
            })
            .join(", ");
        println!("• File types: {}", types);
    }
    println!(
        "• Supported extensions: {}",
        stats.supported_extensions.join(", ")
    );
}
