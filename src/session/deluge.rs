use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::error::SessionError;
use super::record::{SourceFamily, SourceSessionRecord, TrackerState};
use super::{SessionSource, SourceEntry, SourceState};
use crate::bencode::{decode, Value};
use crate::constants::{DELUGE_AGGREGATE_FILE, TORRENT_EXT};
use crate::fastresume::PieceMap;
use crate::metainfo::Metainfo;

/// Deluge's state directory.
///
/// Deluge keeps one aggregate `torrents.fastresume` whose values are
/// themselves bencoded libtorrent resume dictionaries, next to one
/// `<id>.torrent` per torrent. Decoding happens in two stages: [`discover`]
/// splits the aggregate into raw blobs, [`load`] decodes a single blob.
///
/// [`discover`]: SessionSource::discover
/// [`load`]: SessionSource::load
#[derive(Debug, Clone)]
pub struct DelugeSource {
    state_dir: PathBuf,
}

/// The still-encoded resume blob of one entry, or `None` when the aggregate
/// held something other than a byte string for it.
pub type DelugeBlob = Option<Bytes>;

impl DelugeSource {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.state_dir.join(DELUGE_AGGREGATE_FILE)
    }
}

impl SessionSource for DelugeSource {
    type Payload = DelugeBlob;

    fn family(&self) -> SourceFamily {
        SourceFamily::Deluge
    }

    fn discover(&self) -> Result<Vec<SourceEntry<DelugeBlob>>, SessionError> {
        let path = self.aggregate_path();
        if !path.is_file() {
            return Err(SessionError::NotFound(path));
        }

        let aggregate = decode(&std::fs::read(&path)?)?
            .into_dict()
            .ok_or(SessionError::InvalidField(DELUGE_AGGREGATE_FILE))?;

        let mut entries = Vec::with_capacity(aggregate.len());
        for (key, value) in aggregate {
            let Ok(raw_id) = std::str::from_utf8(&key) else {
                tracing::warn!(key = %hex::encode(&key), "skipping non-utf8 identifier");
                continue;
            };
            entries.push(SourceEntry {
                id: raw_id.to_lowercase(),
                torrent_path: torrent_path(&self.state_dir, raw_id),
                payload: value.as_bytes().cloned(),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!(count = entries.len(), path = %path.display(), "decoded deluge aggregate");
        Ok(entries)
    }

    fn load(
        &self,
        entry: &SourceEntry<DelugeBlob>,
        _torrent: &Metainfo,
    ) -> Result<SourceState, SessionError> {
        let blob = entry
            .payload
            .as_ref()
            .ok_or(SessionError::InvalidField("resume blob"))?;
        let resume = decode(blob)?;
        let record = resume_to_record(&entry.id, &resume)?;
        Ok(SourceState::Session(record))
    }
}

fn torrent_path(state_dir: &Path, raw_id: &str) -> PathBuf {
    state_dir.join(format!("{raw_id}.{TORRENT_EXT}"))
}

/// Converts one decoded libtorrent resume dictionary.
fn resume_to_record(id: &str, resume: &Value) -> Result<SourceSessionRecord, SessionError> {
    if resume.as_dict().is_none() {
        return Err(SessionError::InvalidField("resume blob"));
    }

    let save_path = resume
        .str(b"save_path")
        .ok_or(SessionError::InvalidField("save_path"))?;
    let int = |key: &[u8]| resume.int(key).unwrap_or(0);

    let mut record = SourceSessionRecord::new(id, SourceFamily::Deluge, save_path);
    record.total_uploaded = int(b"total_uploaded");
    record.total_downloaded = int(b"total_downloaded");
    record.added_time = int(b"added_time");
    record.completed_time = int(b"completed_time");
    record.active_time = int(b"active_time");
    record.seeding_time = int(b"seeding_time");
    record.last_activity = int(b"last_upload").max(int(b"last_download"));
    record.paused = int(b"paused") != 0;
    record.mapped_files = resume.str_list(b"mapped_files").unwrap_or_default();

    // Deluge has no per-tracker switch: every listed tracker is live.
    record.trackers = resume
        .get(b"trackers")
        .and_then(Value::as_list)
        .map(|tiers| {
            tiers
                .iter()
                .filter_map(Value::as_list)
                .flatten()
                .filter_map(|url| url.as_str().map(TrackerState::enabled))
                .collect()
        })
        .unwrap_or_default();

    record.pieces = resume
        .bytes(b"pieces")
        .map(|bytes| PieceMap::from_resume_bytes(bytes));

    record.file_priority = resume
        .get(b"file_priority")
        .and_then(Value::as_list)
        .and_then(|list| list.iter().map(Value::as_integer).collect());

    Ok(record)
}
