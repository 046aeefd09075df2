//! CSV export of sigcap telemetry records.
//!
//! Builds on the batch loader and the filter evaluator: records stream
//! in batches from a capture directory, an optional filter selects the
//! rows, and each record flattens to a fixed-width CSV row. Export is
//! two-pass because the header width depends on the largest cell and
//! AP counts seen anywhere in the input.

pub mod band;
pub mod flatten;
pub mod record;
pub mod wifi;

use std::fs::File;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sigcap_filter::{filter_array, FilterSpec};
use sigcap_loader::{load_batches, LoaderError, DEFAULT_BATCH_SIZE};

pub use flatten::{flatten_record, header, ColumnMaxima};

/// All errors that can be returned by the export pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Filter(#[from] sigcap_filter::FilterError),

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// Knobs for a CSV export run.
#[derive(Debug, Default)]
pub struct ExportOptions {
    /// Filter applied to every batch before flattening.
    pub filter: Option<FilterSpec>,
    /// Caps on the variable-arity column groups.
    pub max_lte: Option<usize>,
    pub max_nr: Option<usize>,
    pub max_wifi: Option<usize>,
    /// Keep records whose operator cannot be resolved.
    pub include_invalid_operator: bool,
}

/// What an export run produced.
#[derive(Debug)]
pub struct ExportSummary {
    pub rows: usize,
    pub maxima: ColumnMaxima,
}

/// Export a capture directory to CSV.
///
/// Pass one walks every batch to establish [`ColumnMaxima`]; pass two
/// walks them again, flattening each surviving record into the writer.
/// Progress lines go to stdout unless `quiet` is set.
pub fn export_csv(
    input_dir: &Path,
    output_path: &Path,
    options: &ExportOptions,
    quiet: bool,
) -> Result<ExportSummary, ExportError> {
    let mut maxima = ColumnMaxima::default();
    load_batches(input_dir, DEFAULT_BATCH_SIZE, |batch| {
        let records = select(&batch.records, options, quiet)?;
        for record in records {
            maxima.observe(record);
        }
        Ok::<(), ExportError>(())
    })?;
    maxima.clamp(options.max_lte, options.max_nr, options.max_wifi);

    let file = File::create(output_path).map_err(|source| ExportError::Create {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(header(&maxima))?;

    let mut rows = 0usize;
    load_batches(input_dir, DEFAULT_BATCH_SIZE, |batch| {
        let records = select(&batch.records, options, quiet)?;
        for record in records {
            if skip_invalid_operator(record, options) {
                continue;
            }
            writer.write_record(flatten_record(record, &maxima))?;
            rows += 1;
        }
        Ok::<(), ExportError>(())
    })?;
    writer.flush().map_err(|source| ExportError::Create {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(ExportSummary { rows, maxima })
}

/// Apply the batch filter, reporting sizes unless quiet.
fn select<'a>(
    records: &'a [Value],
    options: &ExportOptions,
    quiet: bool,
) -> Result<Vec<&'a Value>, ExportError> {
    if !quiet {
        println!("processing {} records", records.len());
    }
    let selected = match &options.filter {
        Some(spec) => {
            let matched = filter_array(spec, records, false)?;
            if !quiet {
                println!("{} records after filter", matched.len());
            }
            matched
        }
        None => records.iter().collect(),
    };
    Ok(selected)
}

fn skip_invalid_operator(record: &Value, options: &ExportOptions) -> bool {
    if options.include_invalid_operator {
        return false;
    }
    let has_any_name = ["opName", "simName", "carrierName"]
        .iter()
        .any(|key| record.get(*key).is_some());
    !has_any_name || record::operator_name(record) == "Unknown"
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
