/// All errors that can be returned while loading record batches.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// A directory or file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// A capture file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },
}
