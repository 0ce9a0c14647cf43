use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Unknown dataset identifier: '{0}'")]
    UnknownDataset(String),

    #[error("Failed to open dataset file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset CSV: {0}")]
    Csv(#[from] csv::Error),
}
