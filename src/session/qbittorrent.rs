use std::path::PathBuf;

use bytes::Bytes;

use super::error::SessionError;
use super::record::SourceFamily;
use super::{SessionSource, SourceEntry, SourceState};
use crate::constants::{FASTRESUME_EXT, TORRENT_EXT};
use crate::fastresume::FastresumeRecord;
use crate::metainfo::Metainfo;

/// A qBittorrent `BT_backup` directory.
///
/// Records are already in the target format, so they are only validated and
/// then copied byte for byte.
#[derive(Debug, Clone)]
pub struct QBittorrentSource {
    backup_dir: PathBuf,
}

impl QBittorrentSource {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }
}

impl SessionSource for QBittorrentSource {
    /// Path of the entry's fastresume file.
    type Payload = PathBuf;

    fn family(&self) -> SourceFamily {
        SourceFamily::QBittorrent
    }

    fn discover(&self) -> Result<Vec<SourceEntry<PathBuf>>, SessionError> {
        if !self.backup_dir.is_dir() {
            return Err(SessionError::NotFound(self.backup_dir.clone()));
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.backup_dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FASTRESUME_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(SourceEntry {
                id: stem.to_lowercase(),
                torrent_path: self.backup_dir.join(format!("{stem}.{TORRENT_EXT}")),
                payload: path.clone(),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn load(
        &self,
        entry: &SourceEntry<PathBuf>,
        torrent: &Metainfo,
    ) -> Result<SourceState, SessionError> {
        let data = std::fs::read(&entry.payload)?;
        let record = FastresumeRecord::from_bytes(&data)?;

        if record.info_hash != torrent.info_hash {
            return Err(SessionError::InfoHashMismatch {
                expected: torrent.info_hash.to_hex(),
                found: record.info_hash.to_hex(),
            });
        }

        Ok(SourceState::Native(Bytes::from(data)))
    }
}
