pub(crate) mod export;
pub(crate) mod filter;

use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

/// Resolve a `--filter` argument to a decoded JSON value.
///
/// An argument naming an existing file is read and parsed; anything
/// else is parsed as inline JSON.
pub(crate) fn resolve_filter_arg(
    arg: &str,
    output: OutputFormat,
    quiet: bool,
) -> serde_json::Value {
    let path = Path::new(arg);
    let text = if path.is_file() {
        match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                report_error(
                    &format!("cannot read filter file {}: {}", path.display(), e),
                    output,
                    quiet,
                );
                process::exit(1);
            }
        }
    } else {
        arg.to_string()
    };

    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            report_error(&format!("invalid filter JSON: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
