use std::path::PathBuf;

use thiserror::Error;

use crate::fastresume::FastresumeError;
use crate::metainfo::MetainfoError;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The source directory or aggregate file is missing.
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The destination directory cannot be created or written.
    #[error("destination not writable: {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed encoded data for one torrent, or for the source as a whole
    /// when `id` is empty.
    #[error("{id}: decode error: {source}")]
    Decode {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A descriptor without its session record, or the other way round.
    #[error("{id}: missing counterpart {}", path.display())]
    MissingCounterpart { id: String, path: PathBuf },

    #[error("{id}: io error on {}: {source}", path.display())]
    Io {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{id}: cannot encode fastresume: {source}")]
    Encode {
        id: String,
        #[source]
        source: FastresumeError,
    },
}

impl ImportError {
    /// Whether the error aborts the whole run rather than one torrent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::SourceNotFound(_) | ImportError::DestinationUnwritable { .. }
        )
    }

    pub(crate) fn metainfo(id: &str, path: PathBuf, err: MetainfoError) -> Self {
        match err {
            MetainfoError::Io(source) => ImportError::Io {
                id: id.to_string(),
                path,
                source,
            },
            other => ImportError::Decode {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn session(id: &str, path: PathBuf, err: SessionError) -> Self {
        match err {
            SessionError::NotFound(path) => ImportError::SourceNotFound(path),
            SessionError::MissingSidecar(path) => ImportError::MissingCounterpart {
                id: id.to_string(),
                path,
            },
            SessionError::Io(source) => ImportError::Io {
                id: id.to_string(),
                path,
                source,
            },
            other => ImportError::Decode {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub(crate) fn fastresume(id: &str, path: PathBuf, err: FastresumeError) -> Self {
        match err {
            FastresumeError::Io(source) => ImportError::Io {
                id: id.to_string(),
                path,
                source,
            },
            source => ImportError::Encode {
                id: id.to_string(),
                source,
            },
        }
    }

    pub(crate) fn io(id: &str, path: PathBuf, source: std::io::Error) -> Self {
        ImportError::Io {
            id: id.to_string(),
            path,
            source,
        }
    }
}
