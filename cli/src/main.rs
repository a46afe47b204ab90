//! ods2csv CLI - OpenDocument Spreadsheet to CSV conversion tool
//!
//! Converts a single ODS document (file or stdin) to CSV, or a whole
//! directory of them in batch mode.

use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use ods2csv::batch::{BatchOptions, DEFAULT_INCLUDE};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// OpenDocument Spreadsheet to CSV conversion
#[derive(Parser)]
#[command(
    name = "ods2csv",
    author = "iyulab",
    version,
    about = "Convert ODS spreadsheets to CSV",
    long_about = "ods2csv - Streaming OpenDocument Spreadsheet to CSV conversion.\n\n\
                  Without a subcommand, converts one document: INPUT (default: stdin)\n\
                  to OUTPUT (default: stdout)."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input ODS file (default: stdin)
    input: Option<PathBuf>,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every matching ODS file in a directory
    Batch {
        /// Source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Destination directory (default: source directory)
        #[arg(long)]
        to_dir: Option<PathBuf>,

        /// Files to convert, as globs relative to the source directory
        #[arg(long = "include", default_value = DEFAULT_INCLUDE)]
        includes: Vec<String>,

        /// Files to skip even when included
        #[arg(long = "exclude")]
        excludes: Vec<String>,

        /// Convert even when the CSV file is newer than the ODS file
        #[arg(short, long)]
        force: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "ods2csv=warn",
        1 => "ods2csv=info",
        _ => "ods2csv=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when the command ran but some work failed.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        None => {
            convert_single(cli.input, cli.output)?;
            Ok(true)
        }

        Some(Commands::Batch {
            dir,
            to_dir,
            includes,
            excludes,
            force,
            json,
        }) => {
            let mut options = BatchOptions::new(dir)
                .with_includes(includes)
                .with_force(force);
            if let Some(to_dir) = to_dir {
                options = options.with_dest_dir(to_dir);
            }
            for pattern in excludes {
                options = options.with_exclude(pattern);
            }

            let pb = create_spinner("Converting spreadsheets...");
            let report = ods2csv::convert_dir(&options);
            pb.finish_and_clear();
            let report = report?;

            if json {
                println!("{}", report.to_json(true)?);
            } else {
                for failure in &report.failures {
                    eprintln!(
                        "{} {}: {}",
                        "✗".red().bold(),
                        failure.path.display(),
                        failure.message
                    );
                }
                if report.is_success() {
                    println!("{} {}", "✓".green().bold(), report.summary());
                } else {
                    eprintln!("{}: {}", "Error".red().bold(), report.summary());
                }
            }

            Ok(report.is_success())
        }

        Some(Commands::Version) => {
            print_version();
            Ok(true)
        }
    }
}

fn convert_single(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (input, output) {
        (Some(input), Some(output)) => {
            ods2csv::convert_file(&input, &output)?;
        }
        (Some(input), None) => {
            let file = io::BufReader::new(File::open(input)?);
            let mut handle = io::BufWriter::new(io::stdout().lock());
            ods2csv::convert_seekable(file, &mut handle)?;
            handle.flush()?;
        }
        (None, Some(output)) => {
            let mut csv = Vec::new();
            ods2csv::convert(io::stdin().lock(), &mut csv)?;
            std::fs::write(output, csv)?;
        }
        (None, None) => {
            let mut handle = io::BufWriter::new(io::stdout().lock());
            ods2csv::convert(io::stdin().lock(), &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn print_version() {
    println!("{} {}", "ods2csv".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Streaming OpenDocument Spreadsheet to CSV conversion");
    println!();
    println!("Repository: https://github.com/iyulab/ods2csv");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
