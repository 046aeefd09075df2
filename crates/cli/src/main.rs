mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// sigcap telemetry toolchain.
#[derive(Parser)]
#[command(name = "sigcap", version, about = "sigcap telemetry filtering and CSV export")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a capture directory into a CSV file
    Export {
        /// Directory holding .txt/.json capture files
        input_dir: PathBuf,
        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
        /// Filter specification: inline JSON or a path to a JSON file
        #[arg(long)]
        filter: Option<String>,
        /// Cap on exported LTE cells per record
        #[arg(long)]
        max_lte: Option<usize>,
        /// Cap on exported NR cells per record
        #[arg(long)]
        max_nr: Option<usize>,
        /// Cap on exported Wi-Fi APs per band class
        #[arg(long)]
        max_wifi: Option<usize>,
        /// Keep records whose operator cannot be resolved
        #[arg(long)]
        include_invalid_op: bool,
    },

    /// Print the records of a capture directory matching a filter
    Filter {
        /// Directory holding .txt/.json capture files
        input_dir: PathBuf,
        /// Filter specification: inline JSON or a path to a JSON file
        #[arg(long)]
        filter: String,
        /// Print the records that do NOT match instead
        #[arg(long)]
        reverse: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input_dir,
            out,
            filter,
            max_lte,
            max_nr,
            max_wifi,
            include_invalid_op,
        } => {
            commands::export::cmd_export(
                &input_dir,
                &out,
                filter.as_deref(),
                max_lte,
                max_nr,
                max_wifi,
                include_invalid_op,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Filter {
            input_dir,
            filter,
            reverse,
        } => {
            commands::filter::cmd_filter(&input_dir, &filter, reverse, cli.output, cli.quiet);
        }
    }
}

/// Report an error in the requested output format.
pub(crate) fn report_error(message: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&err_json).unwrap_or_default()
            );
        }
        OutputFormat::Text => eprintln!("error: {}", message),
    }
}
