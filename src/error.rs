use std::path::PathBuf;
use thiserror::Error;

/// Failures at the input boundary. Building, comparing and formatting never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a valid declaration syntax tree: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no construct named \"{0}\" in either input")]
    ConstructNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
