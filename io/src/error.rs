use thiserror::Error;

/// Failures of the PCD container layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("header field must have a value: {0:?}")]
    MissingValue(String),
    #[error("{0} entry count mismatches FIELDS")]
    ArityMismatch(&'static str),
    #[error("unknown data format: {0:?}")]
    UnknownDataFormat(String),
    #[error("invalid token: {0:?}")]
    InvalidToken(String),
    #[error("unsupported field layout: kind {kind:?} with size {size}")]
    UnsupportedField { kind: &'static str, size: usize },
    #[error("body too short: expected {expected} bytes, got {actual}")]
    BodyTooShort { expected: usize, actual: usize },
    #[error("wrong uncompressed size: expected {expected}, got {actual}")]
    UncompressedSize { expected: usize, actual: usize },
    #[error("lzf: {0}")]
    Lzf(#[from] crate::lzf::LzfError),
}
