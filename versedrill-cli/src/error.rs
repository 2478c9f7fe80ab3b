use std::path::PathBuf;
use thiserror::Error;
use versedrill_core::{CoreError, ErrorKind};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read lyrics from {path}: {source}")]
    ReadLyrics {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Process exit status for this failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(err) => match err.kind() {
                ErrorKind::Conflict => 2,
                ErrorKind::NotFound => 3,
                ErrorKind::Validation => 4,
                ErrorKind::Storage | ErrorKind::Config => 1,
            },
            Self::ReadLyrics { .. } | Self::Output(_) => 1,
            Self::Interrupted => 130,
        }
    }
}
