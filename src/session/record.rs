use std::fmt;

use crate::fastresume::PieceMap;

/// The client family a record was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFamily {
    Deluge,
    RTorrent,
    QBittorrent,
}

impl SourceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFamily::Deluge => "deluge",
            SourceFamily::RTorrent => "rtorrent",
            SourceFamily::QBittorrent => "qbittorrent",
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracker URL and whether the source client had it enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    pub url: String,
    pub enabled: bool,
}

impl TrackerState {
    pub fn enabled(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            enabled: true,
        }
    }
}

/// Source client state for one torrent, normalized across families.
///
/// Timestamps are unix seconds, durations are seconds. Optional maps are
/// `None` when the source had nothing usable; the builder then derives them
/// from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSessionRecord {
    pub id: String,
    pub family: SourceFamily,
    /// Directory the content lives in (the parent, never the content root).
    pub save_path: String,
    pub trackers: Vec<TrackerState>,
    pub total_uploaded: i64,
    pub total_downloaded: i64,
    pub added_time: i64,
    pub completed_time: i64,
    pub last_activity: i64,
    pub active_time: i64,
    pub seeding_time: i64,
    /// Category/label assigned in the source client.
    pub label: Option<String>,
    pub pieces: Option<PieceMap>,
    pub file_priority: Option<Vec<i64>>,
    pub mapped_files: Vec<String>,
    pub paused: bool,
}

impl SourceSessionRecord {
    pub fn new(id: impl Into<String>, family: SourceFamily, save_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            family,
            save_path: save_path.into(),
            trackers: Vec::new(),
            total_uploaded: 0,
            total_downloaded: 0,
            added_time: 0,
            completed_time: 0,
            last_activity: 0,
            active_time: 0,
            seeding_time: 0,
            label: None,
            pieces: None,
            file_priority: None,
            mapped_files: Vec::new(),
            paused: false,
        }
    }
}
