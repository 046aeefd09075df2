//! Batched loading of sigcap capture files.
//!
//! A capture directory holds `.txt` / `.json` files, each containing a
//! single JSON object or an array of objects. The loader walks the
//! directory recursively, decodes every matching file, and hands the
//! accumulated records to a callback in bounded batches so arbitrarily
//! large capture sets never sit in memory at once.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub use error::LoaderError;

/// Flush threshold for accumulated records. A batch can exceed this by
/// the size of the file that crossed it; files are never split.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// One batch of decoded records plus the files that contributed them.
#[derive(Debug)]
pub struct Batch {
    pub files: Vec<PathBuf>,
    pub records: Vec<Value>,
}

/// Walk `input_dir`, decode every `.txt` / `.json` file, and invoke
/// `callback` once per accumulated batch.
///
/// The callback runs when the record count reaches `batch_size` and
/// once more for any remainder. Record order follows sorted path order
/// within each directory, subdirectories after their siblings' files
/// have been visited in sort order. A callback error aborts the walk.
pub fn load_batches<F, E>(input_dir: &Path, batch_size: usize, mut callback: F) -> Result<(), E>
where
    F: FnMut(Batch) -> Result<(), E>,
    E: From<LoaderError>,
{
    let mut files = Vec::new();
    collect_capture_files(input_dir, &mut files)?;

    let mut batch_files = Vec::new();
    let mut batch_records = Vec::new();
    for path in files {
        let text = fs::read_to_string(&path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;
        let decoded: Value =
            serde_json::from_str(&text).map_err(|source| LoaderError::Json {
                path: path.clone(),
                source,
            })?;

        batch_files.push(path);
        match decoded {
            Value::Array(items) => batch_records.extend(items),
            other => batch_records.push(other),
        }

        if batch_records.len() >= batch_size {
            callback(Batch {
                files: std::mem::take(&mut batch_files),
                records: std::mem::take(&mut batch_records),
            })?;
        }
    }

    if !batch_records.is_empty() {
        callback(Batch {
            files: batch_files,
            records: batch_records,
        })?;
    }
    Ok(())
}

fn collect_capture_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoaderError> {
    let entries = fs::read_dir(dir).map_err(|source| LoaderError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| LoaderError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    let mut subdirs = Vec::new();
    for path in paths {
        if path.is_dir() {
            subdirs.push(path);
        } else if is_capture_file(&path) {
            out.push(path);
        }
    }
    for subdir in subdirs {
        collect_capture_files(&subdir, out)?;
    }
    Ok(())
}

fn is_capture_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("txt") | Some("json")
    )
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_extensions() {
        assert!(is_capture_file(Path::new("a/b.json")));
        assert!(is_capture_file(Path::new("a/b.txt")));
        assert!(!is_capture_file(Path::new("a/b.csv")));
        assert!(!is_capture_file(Path::new("a/b")));
    }
}
