use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::error::SessionError;
use super::record::{SourceFamily, SourceSessionRecord, TrackerState};
use super::{SessionSource, SourceEntry, SourceState};
use crate::bencode::{decode, Value};
use crate::constants::{
    DEFAULT_FILE_PRIORITY, HIGH_FILE_PRIORITY, RTORRENT_RESUME_SUFFIX, RTORRENT_SESSION_SUFFIX,
    TORRENT_EXT,
};
use crate::fastresume::PieceMap;
use crate::metainfo::Metainfo;

/// rTorrent's session directory.
///
/// Every `<name>.torrent` is accompanied by two sidecars:
/// `<name>.torrent.rtorrent` with the session counters and
/// `<name>.torrent.libtorrent_resume` with tracker state and completion.
/// Both are required; the counters are the only record of when and where
/// the torrent was downloaded.
#[derive(Debug, Clone)]
pub struct RTorrentSource {
    session_dir: PathBuf,
}

impl RTorrentSource {
    pub fn new(session_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: session_dir.into(),
        }
    }
}

impl SessionSource for RTorrentSource {
    type Payload = ();

    fn family(&self) -> SourceFamily {
        SourceFamily::RTorrent
    }

    fn discover(&self) -> Result<Vec<SourceEntry<()>>, SessionError> {
        if !self.session_dir.is_dir() {
            return Err(SessionError::NotFound(self.session_dir.clone()));
        }

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.session_dir)? {
            let path = dir_entry?.path();
            let is_torrent = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TORRENT_EXT));
            if !is_torrent || !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping non-utf8 file name");
                continue;
            };
            entries.push(SourceEntry {
                id: stem.to_lowercase(),
                torrent_path: path.clone(),
                payload: (),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn load(&self, entry: &SourceEntry<()>, torrent: &Metainfo) -> Result<SourceState, SessionError> {
        let session = read_sidecar(&entry.torrent_path, RTORRENT_SESSION_SUFFIX)?;
        let resume = read_sidecar(&entry.torrent_path, RTORRENT_RESUME_SUFFIX)?;
        let record = sidecars_to_record(&entry.id, &session, &resume, torrent)?;
        Ok(SourceState::Session(record))
    }
}

fn sidecar_path(torrent_path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(torrent_path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_sidecar(torrent_path: &Path, suffix: &str) -> Result<Value, SessionError> {
    let path = sidecar_path(torrent_path, suffix);
    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SessionError::MissingSidecar(path));
        }
        Err(e) => return Err(e.into()),
    };
    let value = decode(&data)?;
    if value.as_dict().is_none() {
        return Err(SessionError::InvalidField("sidecar root"));
    }
    Ok(value)
}

fn sidecars_to_record(
    id: &str,
    session: &Value,
    resume: &Value,
    torrent: &Metainfo,
) -> Result<SourceSessionRecord, SessionError> {
    let directory = session
        .str(b"directory")
        .ok_or(SessionError::InvalidField("directory"))?;
    let save_path = if torrent.info.is_multi_file() {
        strip_content_root(directory, &torrent.info.name)
    } else {
        directory.to_string()
    };

    let custom = session.get(b"custom");
    let custom_time = |key: &[u8]| parse_decimal(custom.and_then(|c| c.str(key)));

    let mut record = SourceSessionRecord::new(id, SourceFamily::RTorrent, save_path);
    record.added_time = match custom_time(b"addtime") {
        0 => session.int(b"timestamp.started").unwrap_or(0),
        added => added,
    };
    record.active_time = custom_time(b"seedingtime");
    record.completed_time = session.int(b"timestamp.finished").unwrap_or(0);
    record.last_activity = session.int(b"state_changed").unwrap_or(0);
    record.total_uploaded = session.int(b"total_uploaded").unwrap_or(0);
    record.total_downloaded = session.int(b"total_downloaded").unwrap_or(0);
    record.paused = session.int(b"state") == Some(0);
    record.label = session
        .str(b"custom1")
        .filter(|label| !label.is_empty())
        .map(decode_label);

    record.trackers = tracker_states(resume, torrent);
    record.pieces = completion(resume, torrent.info.piece_count());
    record.file_priority = resume
        .get(b"files")
        .and_then(Value::as_list)
        .and_then(|files| {
            files
                .iter()
                .map(|f| f.int(b"priority").map(map_priority))
                .collect()
        });

    Ok(record)
}

/// Parses rTorrent's newline-terminated decimal strings; anything unusable is 0.
fn parse_decimal(raw: Option<&str>) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => 0,
        Some(s) => s.parse().unwrap_or_else(|_| {
            tracing::debug!(value = s, "malformed decimal in rtorrent session, using 0");
            0
        }),
    }
}

/// Drops the torrent's own directory from rTorrent's content path.
fn strip_content_root(directory: &str, name: &str) -> String {
    let path = Path::new(directory);
    match (path.file_name(), path.parent()) {
        (Some(last), Some(parent)) if last == name && !parent.as_os_str().is_empty() => {
            parent.to_string_lossy().into_owned()
        }
        _ => {
            tracing::debug!(directory, name, "content path does not end with torrent name");
            directory.to_string()
        }
    }
}

/// ruTorrent stores labels percent-encoded.
fn decode_label(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|label| label.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Tracker states ordered as the descriptor lists them, then any extra ones.
fn tracker_states(resume: &Value, torrent: &Metainfo) -> Vec<TrackerState> {
    let Some(map) = resume.get(b"trackers").and_then(Value::as_dict) else {
        return Vec::new();
    };

    let state_of = |url: &str| {
        map.get(url.as_bytes())
            .map(|state| state.int(b"enabled").unwrap_or(1) != 0)
    };

    let mut states: Vec<TrackerState> = torrent
        .trackers()
        .into_iter()
        .filter_map(|url| {
            state_of(&url).map(|enabled| TrackerState { url, enabled })
        })
        .collect();

    for key in map.keys() {
        let Ok(url) = std::str::from_utf8(key) else {
            continue;
        };
        if states.iter().any(|s| s.url == url) {
            continue;
        }
        if let Some(enabled) = state_of(url) {
            states.push(TrackerState {
                url: url.to_string(),
                enabled,
            });
        }
    }

    states
}

/// Reads the `bitfield` key: a piece count when complete, packed bits otherwise.
fn completion(resume: &Value, piece_count: usize) -> Option<PieceMap> {
    match resume.get(b"bitfield")? {
        Value::Integer(n) if *n >= 0 && *n as usize == piece_count => {
            Some(PieceMap::full(piece_count))
        }
        Value::Bytes(bits) => PieceMap::from_packed_bits(bits, piece_count),
        other => {
            tracing::debug!(?other, piece_count, "unusable rtorrent bitfield");
            None
        }
    }
}

fn map_priority(priority: i64) -> i64 {
    match priority {
        0 => 0,
        2 => HIGH_FILE_PRIORITY,
        _ => DEFAULT_FILE_PRIORITY,
    }
}
