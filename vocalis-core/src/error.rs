use std::path::PathBuf;

use thiserror::Error;

/// All errors produced by vocalis-core.
#[derive(Debug, Error)]
pub enum VocalisError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("backing track is {actual_secs:.2} s long, need at least {requested_secs:.2} s")]
    BackingTooShort {
        requested_secs: f64,
        actual_secs: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VocalisError>;
