mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use textscout::{
    config::CliOverrides, filters::parse_extension_list, location_stats, run_scan_with,
    ScanConfig, ScanError, ScanOptions, TerminalProgress,
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ScanError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchArgs {
    /// Text to search for (exact, case-sensitive)
    #[arg(short = 'p', long = "pattern")]
    search_string: String,

    /// Root directory to search in
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// File extensions to include (e.g. txt,csv,sql)
    #[arg(short = 'e', long)]
    extensions: Option<String>,

    /// Patterns to ignore (glob format, relative to the root)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Don't draw the progress line
    #[arg(long)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search files for a string
    Search(Box<CliSearchArgs>),

    /// Show file statistics for a search location
    Status {
        /// Directory to inspect
        #[arg(short = 'd', long)]
        root: Option<PathBuf>,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let config = ScanConfig::load_from(cli.config.as_deref())?.merge_with_cli(
                CliOverrides {
                    root_path: args.root.clone(),
                    extensions: args.extensions.as_deref().map(parse_extension_list),
                    ignore_patterns: args.ignore.clone(),
                    no_progress: args.no_progress || args.json,
                    log_level: cli.log_level,
                },
            );
            init_logging(&config.log_level);
            tracing::debug!("Effective configuration: {:?}", config);

            let request = config.to_request(args.search_string.trim())?;
            if !args.json {
                output::print_search_header(&request);
            }

            let progress = TerminalProgress::new();
            let mut options = ScanOptions::default();
            if config.show_progress {
                options = options.with_progress(&progress, config.progress_interval());
            }

            match run_scan_with(&request, options) {
                Ok(summary) => {
                    if args.json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        output::print_search_results(&summary);
                    }
                    Ok(())
                }
                Err(ScanError::NoFilesFound {
                    extensions,
                    summary,
                }) => {
                    if args.json {
                        println!("{}", output::no_files_json(&extensions, &summary));
                    }
                    Err(ScanError::NoFilesFound {
                        extensions,
                        summary,
                    })
                }
                Err(e) => Err(e),
            }
        }
        Commands::Status { root, json } => {
            let config = ScanConfig::load_from(cli.config.as_deref())?.merge_with_cli(
                CliOverrides {
                    root_path: root,
                    log_level: cli.log_level,
                    ..CliOverrides::default()
                },
            );
            init_logging(&config.log_level);

            let stats = location_stats(&config.root_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                output::print_location_stats(&stats);
            }
            Ok(())
        }
    }
}
