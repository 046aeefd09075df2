use std::path::Path;
use std::process;

use sigcap_filter::{filter_array, FilterSpec};
use sigcap_loader::{load_batches, LoaderError, DEFAULT_BATCH_SIZE};

use crate::commands::resolve_filter_arg;
use crate::{report_error, OutputFormat};

enum CmdError {
    Loader(LoaderError),
    Filter(sigcap_filter::FilterError),
}

impl From<LoaderError> for CmdError {
    fn from(e: LoaderError) -> Self {
        CmdError::Loader(e)
    }
}

pub(crate) fn cmd_filter(
    input_dir: &Path,
    filter: &str,
    reverse: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let decoded = resolve_filter_arg(filter, output, quiet);
    let spec = match FilterSpec::from_json(&decoded) {
        Ok(spec) => spec,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let mut total = 0usize;
    let result = load_batches(input_dir, DEFAULT_BATCH_SIZE, |batch| {
        let matched =
            filter_array(&spec, &batch.records, reverse).map_err(CmdError::Filter)?;
        total += matched.len();
        for record in matched {
            match output {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string(record).unwrap_or_default()
                ),
                OutputFormat::Text => println!("{}", summarize(record)),
            }
        }
        Ok::<(), CmdError>(())
    });

    match result {
        Ok(()) => {
            if !quiet {
                match output {
                    OutputFormat::Json => {}
                    OutputFormat::Text => println!("{} record(s) matched", total),
                }
            }
        }
        Err(CmdError::Loader(e)) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
        Err(CmdError::Filter(e)) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

/// One-line text rendering of a matched record.
fn summarize(record: &serde_json::Value) -> String {
    let timestamp = record
        .get("datetimeIso")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("-");
    let device = record
        .get("deviceName")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("-");
    format!("{} {}", timestamp, device)
}
