mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "extrato",
    version,
    about = "Layout identification and row extraction for ECAD royalty statements"
)]
struct Cli {
    /// Custom layout signature file (replaces the built-in set)
    #[arg(long, global = true, value_name = "FILE", env = "EXTRATO_SIGNATURES")]
    signatures: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the layout of a statement PDF
    Identify {
        /// Path to PDF file
        input_file: PathBuf,
    },
    /// Extract the records of one statement PDF
    Extract {
        /// Path to PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the records to a JSON file (extension becomes .json)
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Lines searched around a data line for a missing ISRC
        #[arg(long, value_name = "LINES")]
        window: Option<usize>,
    },
    /// Extract several PDFs in parallel and consolidate the results
    Batch {
        /// Paths to PDF files
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Directory for per-file, consolidated and summary JSON
        #[arg(long, value_name = "DIR", default_value = "extrato-out")]
        out_dir: PathBuf,

        /// Lines searched around a data line for a missing ISRC
        #[arg(long, value_name = "LINES")]
        window: Option<usize>,
    },
    /// Inspect and validate layout signatures
    Layouts {
        #[command(subcommand)]
        action: LayoutsAction,
    },
}

#[derive(Subcommand)]
enum LayoutsAction {
    /// List the active layout signatures in match order
    List,
    /// Validate a custom signature file
    Validate {
        /// Path to JSON signature file
        file: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let signatures = cli.signatures.as_deref();
    let result = match cli.command {
        Commands::Identify { input_file } => commands::identify::run(&input_file, signatures),
        Commands::Extract {
            input_file,
            output,
            out,
            window,
        } => commands::extract::run(&input_file, signatures, &output, out, window),
        Commands::Batch {
            input_files,
            out_dir,
            window,
        } => commands::batch::run(&input_files, signatures, &out_dir, window),
        Commands::Layouts { action } => match action {
            LayoutsAction::List => commands::layouts::list(signatures),
            LayoutsAction::Validate { file } => commands::layouts::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
