use super::layout::ContentLayout;
use super::pieces::PieceMap;
use super::record::FastresumeRecord;
use crate::constants::{
    DEFAULT_FILE_PRIORITY, DHT_PSEUDO_SCHEME, LIBTORRENT_VERSION, MAX_FILE_PRIORITY,
    SECONDS_PER_MINUTE,
};
use crate::metainfo::Metainfo;
use crate::session::{SourceSessionRecord, TrackerState};

/// Settings applied to every record a builder produces.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Tags added to every migrated torrent.
    pub tags: Vec<String>,
    /// Leave `qBt-category` empty instead of carrying the source label.
    pub without_labels: bool,
    /// Leave `qBt-tags` empty.
    pub without_tags: bool,
    pub libtorrent_version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            without_labels: false,
            without_tags: false,
            libtorrent_version: LIBTORRENT_VERSION.to_string(),
        }
    }
}

/// Per-record inputs that are not part of the source state.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext {
    /// Current unix time, in the builder's clock.
    pub now: i64,
    pub queue_position: i64,
}

/// Turns a normalized source record plus its descriptor into a fastresume
/// record.
///
/// Building is pure: the same inputs always give the same record. Every
/// source family goes through this one builder.
#[derive(Debug, Clone, Default)]
pub struct FastresumeBuilder {
    options: BuildOptions,
}

impl FastresumeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(
        &self,
        source: &SourceSessionRecord,
        torrent: &Metainfo,
        ctx: BuildContext,
    ) -> FastresumeRecord {
        let info = &torrent.info;
        let piece_count = info.piece_count();
        let file_count = info.files.len();

        let pieces = match &source.pieces {
            Some(map) if map.len() == piece_count => map.clone(),
            other => {
                if let Some(map) = other {
                    tracing::debug!(
                        id = %source.id,
                        got = map.len(),
                        piece_count,
                        "source piece map has wrong size, marking all pieces complete"
                    );
                }
                PieceMap::full(piece_count)
            }
        };

        let file_priority = match &source.file_priority {
            Some(list)
                if list.len() == file_count
                    && list.iter().all(|p| (0..=MAX_FILE_PRIORITY).contains(p)) =>
            {
                list.clone()
            }
            _ => vec![DEFAULT_FILE_PRIORITY; file_count],
        };

        let mapped_files = if source.mapped_files.len() == file_count {
            source.mapped_files.clone()
        } else {
            Vec::new()
        };

        let layout = ContentLayout::for_file_count(file_count);
        let complete = pieces.is_complete();

        let finished_time = if source.completed_time > 0 && ctx.now >= source.completed_time {
            (ctx.now - source.completed_time) / SECONDS_PER_MINUTE
        } else {
            0
        };

        let added_time = if source.added_time > 0 {
            source.added_time
        } else {
            ctx.now
        };

        let mut record = FastresumeRecord::new(torrent.info_hash);
        record.active_time = source.active_time;
        record.added_time = added_time;
        record.completed_time = source.completed_time;
        record.file_priority = file_priority;
        record.finished_time = finished_time;
        record.last_seen_complete = ctx.now;
        record.last_upload = source.last_activity;
        record.libtorrent_version = self.options.libtorrent_version.clone();
        record.mapped_files = mapped_files;
        record.paused = source.paused;
        record.pieces = pieces;
        record.queue_position = ctx.queue_position;
        record.save_path = source.save_path.clone();
        record.seeding_time = source.seeding_time;
        record.total_downloaded = source.total_downloaded;
        record.total_uploaded = source.total_uploaded;
        record.trackers = filter_trackers(&source.trackers);

        record.qbt.content_layout = layout;
        record.qbt.has_root_folder = layout.has_root_folder();
        record.qbt.save_path = source.save_path.clone();
        record.qbt.seed_status = complete;
        if !self.options.without_labels {
            record.qbt.category = source.label.clone().unwrap_or_default();
        }
        if !self.options.without_tags {
            record.qbt.tags = self.options.tags.clone();
        }

        record
    }
}

/// Enabled, non-DHT trackers, deduplicated, one per tier.
pub fn filter_trackers(trackers: &[TrackerState]) -> Vec<Vec<String>> {
    let mut tiers: Vec<Vec<String>> = Vec::new();
    for tracker in trackers {
        let url = tracker.url.trim();
        if !tracker.enabled || url.is_empty() || url.starts_with(DHT_PSEUDO_SCHEME) {
            continue;
        }
        if tiers.iter().any(|tier| tier[0] == url) {
            continue;
        }
        tiers.push(vec![url.to_string()]);
    }
    tiers
}
