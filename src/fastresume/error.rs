use thiserror::Error;

use crate::bencode::BencodeError;
use crate::metainfo::MetainfoError;

/// Errors raised while encoding, decoding or writing fastresume records.
#[derive(Debug, Error)]
pub enum FastresumeError {
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    #[error("invalid info hash: {0}")]
    InfoHash(#[from] MetainfoError),

    /// The record holds a value the target client cannot load.
    #[error("unencodable record: {0}")]
    Unencodable(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
