use std::path::Path;
use std::process;

use sigcap_export::{export_csv, ExportOptions};
use sigcap_filter::FilterSpec;

use crate::commands::resolve_filter_arg;
use crate::{report_error, OutputFormat};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_export(
    input_dir: &Path,
    out: &Path,
    filter: Option<&str>,
    max_lte: Option<usize>,
    max_nr: Option<usize>,
    max_wifi: Option<usize>,
    include_invalid_op: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let filter = filter.map(|arg| {
        let decoded = resolve_filter_arg(arg, output, quiet);
        match FilterSpec::from_json(&decoded) {
            Ok(spec) => spec,
            Err(e) => {
                report_error(&e.to_string(), output, quiet);
                process::exit(1);
            }
        }
    });

    let options = ExportOptions {
        filter,
        max_lte,
        max_nr,
        max_wifi,
        include_invalid_operator: include_invalid_op,
    };

    match export_csv(input_dir, out, &options, quiet) {
        Ok(summary) => {
            if !quiet {
                match output {
                    OutputFormat::Json => {
                        let json_output = serde_json::json!({
                            "rows": summary.rows,
                            "output": out.display().to_string(),
                        });
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&json_output).unwrap_or_default()
                        );
                    }
                    OutputFormat::Text => {
                        println!("wrote {} row(s) to {}", summary.rows, out.display());
                    }
                }
            }
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}
