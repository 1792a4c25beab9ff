use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcgError {
    #[error("cannot open {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bad sample on line {line}: {text:?}")]
    BadSample { line: usize, text: String },
}

pub type Result<T> = std::result::Result<T, EcgError>;
