use std::path::PathBuf;

use thiserror::Error;

use crate::bencode::BencodeError;
use crate::fastresume::FastresumeError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session directory or aggregate file does not exist.
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A sidecar file the family requires is absent.
    #[error("missing sidecar: {}", .0.display())]
    MissingSidecar(PathBuf),

    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    #[error("info hash mismatch: descriptor {expected}, record {found}")]
    InfoHashMismatch { expected: String, found: String },

    #[error("fastresume error: {0}")]
    Fastresume(#[from] FastresumeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
