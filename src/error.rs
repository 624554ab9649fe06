use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures surfaced by the parser. Only input I/O, encoding problems, and
/// invalid user-supplied format templates are hard errors; irregularities in
/// the data itself (unbalanced quotes, ragged rows, odd numerics) are absorbed
/// into the typed result instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Reading input file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Failed to decode text with encoding {0}")]
    Decode(&'static str),

    #[error("Invalid date format template")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
