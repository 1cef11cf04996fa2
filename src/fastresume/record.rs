use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::error::FastresumeError;
use super::layout::ContentLayout;
use super::pieces::PieceMap;
use crate::bencode::{decode, encode, encode_to, DictBuilder, Value};
use crate::constants::{
    ALLOCATION_SPARSE, DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_UPLOADS, FILE_FORMAT, FILE_VERSION,
    LIBTORRENT_VERSION, MAX_FILE_PRIORITY, RATE_LIMIT_UNLIMITED, RATIO_LIMIT_UNSET,
    SEEDING_TIME_LIMIT_UNSET,
};
use crate::metainfo::InfoHash;

/// A libtorrent resume record with qBittorrent's `qBt-` extension keys.
///
/// Field names mirror the on-disk keys. Integer flags on disk are exposed as
/// `bool`s and written back as `0`/`1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastresumeRecord {
    pub active_time: i64,
    pub added_time: i64,
    pub allocation: String,
    pub apply_ip_filter: bool,
    pub auto_managed: bool,
    pub completed_time: i64,
    pub disable_dht: bool,
    pub disable_lsd: bool,
    pub disable_pex: bool,
    pub download_rate_limit: i64,
    pub file_format: String,
    pub file_version: i64,
    pub file_priority: Vec<i64>,
    /// Minutes since the download completed.
    pub finished_time: i64,
    pub http_seeds: Vec<String>,
    pub info_hash: InfoHash,
    pub last_download: i64,
    pub last_seen_complete: i64,
    pub last_upload: i64,
    pub libtorrent_version: String,
    /// Renamed file paths; written only when non-empty.
    pub mapped_files: Vec<String>,
    pub max_connections: i64,
    pub max_uploads: i64,
    pub num_complete: i64,
    pub num_downloaded: i64,
    pub num_incomplete: i64,
    pub paused: bool,
    pub peers: Bytes,
    pub peers6: Bytes,
    pub pieces: PieceMap,
    pub queue_position: i64,
    pub save_path: String,
    pub seed_mode: bool,
    pub seeding_time: i64,
    pub sequential_download: bool,
    pub share_mode: bool,
    pub stop_when_ready: bool,
    pub super_seeding: bool,
    pub total_downloaded: i64,
    pub total_uploaded: i64,
    /// One tracker per tier.
    pub trackers: Vec<Vec<String>>,
    pub upload_rate_limit: i64,
    pub url_list: Vec<String>,
    pub qbt: QbtFields,
}

/// qBittorrent's own keys, all prefixed with `qBt-` on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QbtFields {
    pub category: String,
    pub content_layout: ContentLayout,
    pub first_last_piece_priority: bool,
    pub has_root_folder: bool,
    pub name: String,
    pub ratio_limit: i64,
    pub save_path: String,
    pub seed_status: bool,
    pub seeding_time_limit: i64,
    pub tags: Vec<String>,
    pub temp_path_disabled: bool,
}

impl Default for QbtFields {
    fn default() -> Self {
        Self {
            category: String::new(),
            content_layout: ContentLayout::Original,
            first_last_piece_priority: false,
            has_root_folder: true,
            name: String::new(),
            ratio_limit: RATIO_LIMIT_UNSET,
            save_path: String::new(),
            seed_status: false,
            seeding_time_limit: SEEDING_TIME_LIMIT_UNSET,
            tags: Vec::new(),
            temp_path_disabled: false,
        }
    }
}

impl FastresumeRecord {
    /// A record holding qBittorrent's defaults for a freshly added torrent.
    pub fn new(info_hash: InfoHash) -> Self {
        Self {
            active_time: 0,
            added_time: 0,
            allocation: ALLOCATION_SPARSE.to_string(),
            apply_ip_filter: true,
            auto_managed: false,
            completed_time: 0,
            disable_dht: false,
            disable_lsd: false,
            disable_pex: false,
            download_rate_limit: RATE_LIMIT_UNLIMITED,
            file_format: FILE_FORMAT.to_string(),
            file_version: FILE_VERSION,
            file_priority: Vec::new(),
            finished_time: 0,
            http_seeds: Vec::new(),
            info_hash,
            last_download: 0,
            last_seen_complete: 0,
            last_upload: 0,
            libtorrent_version: LIBTORRENT_VERSION.to_string(),
            mapped_files: Vec::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_uploads: DEFAULT_MAX_UPLOADS,
            num_complete: 0,
            num_downloaded: 0,
            num_incomplete: 0,
            paused: false,
            peers: Bytes::new(),
            peers6: Bytes::new(),
            pieces: PieceMap::empty(0),
            queue_position: 0,
            save_path: String::new(),
            seed_mode: false,
            seeding_time: 0,
            sequential_download: false,
            share_mode: false,
            stop_when_ready: false,
            super_seeding: false,
            total_downloaded: 0,
            total_uploaded: 0,
            trackers: Vec::new(),
            upload_rate_limit: RATE_LIMIT_UNLIMITED,
            url_list: Vec::new(),
            qbt: QbtFields::default(),
        }
    }

    /// Converts the record into its bencode dictionary.
    ///
    /// # Errors
    ///
    /// [`FastresumeError::Unencodable`] when the save path is empty, a file
    /// priority is outside `0..=7`, or a tracker tier is empty.
    pub fn to_value(&self) -> Result<Value, FastresumeError> {
        if self.save_path.is_empty() {
            return Err(FastresumeError::Unencodable("save_path"));
        }
        if self
            .file_priority
            .iter()
            .any(|p| !(0..=MAX_FILE_PRIORITY).contains(p))
        {
            return Err(FastresumeError::Unencodable("file_priority"));
        }
        if self.trackers.iter().any(|tier| tier.is_empty()) {
            return Err(FastresumeError::Unencodable("trackers"));
        }

        let trackers = self
            .trackers
            .iter()
            .map(|tier| Value::List(tier.iter().map(|url| Value::string(url)).collect()))
            .collect::<Vec<_>>();
        let priorities = self
            .file_priority
            .iter()
            .map(|&p| Value::Integer(p))
            .collect::<Vec<_>>();

        let mut dict = DictBuilder::new()
            .int("active_time", self.active_time)
            .int("added_time", self.added_time)
            .str("allocation", &self.allocation)
            .int("apply_ip_filter", flag(self.apply_ip_filter))
            .int("auto_managed", flag(self.auto_managed))
            .int("completed_time", self.completed_time)
            .int("disable_dht", flag(self.disable_dht))
            .int("disable_lsd", flag(self.disable_lsd))
            .int("disable_pex", flag(self.disable_pex))
            .int("download_rate_limit", self.download_rate_limit)
            .str("file-format", &self.file_format)
            .int("file-version", self.file_version)
            .value("file_priority", Value::List(priorities))
            .int("finished_time", self.finished_time)
            .str_list("httpseeds", &self.http_seeds)
            .bytes("info-hash", self.info_hash.as_bytes())
            .int("last_download", self.last_download)
            .int("last_seen_complete", self.last_seen_complete)
            .int("last_upload", self.last_upload)
            .str("libtorrent-version", &self.libtorrent_version)
            .int("max_connections", self.max_connections)
            .int("max_uploads", self.max_uploads)
            .int("num_complete", self.num_complete)
            .int("num_downloaded", self.num_downloaded)
            .int("num_incomplete", self.num_incomplete)
            .int("paused", flag(self.paused))
            .bytes("peers", &self.peers)
            .bytes("peers6", &self.peers6)
            .bytes("pieces", self.pieces.as_bytes())
            .int("queue_position", self.queue_position)
            .str("save_path", &self.save_path)
            .int("seed_mode", flag(self.seed_mode))
            .int("seeding_time", self.seeding_time)
            .int("sequential_download", flag(self.sequential_download))
            .int("share_mode", flag(self.share_mode))
            .int("stop_when_ready", flag(self.stop_when_ready))
            .int("super_seeding", flag(self.super_seeding))
            .int("total_downloaded", self.total_downloaded)
            .int("total_uploaded", self.total_uploaded)
            .value("trackers", Value::List(trackers))
            .int("upload_rate_limit", self.upload_rate_limit)
            .str_list("url-list", &self.url_list)
            .str("qBt-category", &self.qbt.category)
            .str("qBt-contentLayout", self.qbt.content_layout.as_str())
            .int(
                "qBt-firstLastPiecePriority",
                flag(self.qbt.first_last_piece_priority),
            )
            .int("qBt-hasRootFolder", flag(self.qbt.has_root_folder))
            .str("qBt-name", &self.qbt.name)
            .int("qBt-ratioLimit", self.qbt.ratio_limit)
            .str("qBt-savePath", &self.qbt.save_path)
            .int("qBt-seedStatus", flag(self.qbt.seed_status))
            .int("qBt-seedingTimeLimit", self.qbt.seeding_time_limit)
            .str_list("qBt-tags", &self.qbt.tags)
            .int("qBt-tempPathDisabled", flag(self.qbt.temp_path_disabled));

        if !self.mapped_files.is_empty() {
            dict = dict.str_list("mapped_files", &self.mapped_files);
        }

        Ok(dict.build())
    }

    /// Encodes the record into its on-disk bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FastresumeError> {
        Ok(encode(&self.to_value()?)?)
    }

    /// Writes the record to `path`, replacing any existing file.
    ///
    /// The data is flushed and synced before this returns. `path` either
    /// keeps its previous contents or holds the complete record.
    pub fn write_to_path(&self, path: &Path) -> Result<(), FastresumeError> {
        let value = self.to_value()?;
        write_atomic(path, |writer| Ok(encode_to(&value, writer)?))
    }

    /// Reads a record from `path`.
    pub fn read_from_path(path: &Path) -> Result<Self, FastresumeError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FastresumeError> {
        Self::from_value(&decode(data)?)
    }

    /// Decodes a record from a bencode dictionary.
    ///
    /// Only `info-hash` is required; every other absent key takes the value
    /// [`FastresumeRecord::new`] would give it. Keys this type does not model
    /// are ignored.
    pub fn from_value(value: &Value) -> Result<Self, FastresumeError> {
        if value.as_dict().is_none() {
            return Err(FastresumeError::InvalidField("root"));
        }

        let info_hash = value
            .bytes(b"info-hash")
            .ok_or(FastresumeError::MissingField("info-hash"))?;
        let defaults = Self::new(InfoHash::from_bytes(info_hash)?);
        let int = |key: &[u8], default: i64| value.int(key).unwrap_or(default);
        let bit = |key: &[u8], default: bool| value.int(key).map_or(default, |v| v != 0);
        let string = |key: &[u8], default: &str| value.str(key).unwrap_or(default).to_string();
        let strings = |key: &[u8]| value.str_list(key).unwrap_or_default();
        let raw = |key: &[u8]| value.bytes(key).cloned().unwrap_or_default();

        let file_priority: Vec<i64> = match value.get(b"file_priority") {
            None => Vec::new(),
            Some(v) => v
                .as_list()
                .and_then(|list| list.iter().map(Value::as_integer).collect())
                .ok_or(FastresumeError::InvalidField("file_priority"))?,
        };

        let trackers: Vec<Vec<String>> = match value.get(b"trackers") {
            None => Vec::new(),
            Some(v) => v
                .as_list()
                .and_then(|tiers| {
                    tiers
                        .iter()
                        .map(|tier| {
                            tier.as_list().map(|urls| {
                                urls.iter()
                                    .filter_map(|u| u.as_str().map(String::from))
                                    .collect::<Vec<_>>()
                            })
                        })
                        .collect()
                })
                .ok_or(FastresumeError::InvalidField("trackers"))?,
        };

        let content_layout = match value.str(b"qBt-contentLayout") {
            Some(layout) => layout.parse::<ContentLayout>()?,
            None => defaults.qbt.content_layout,
        };

        let qbt = QbtFields {
            category: string(b"qBt-category", ""),
            content_layout,
            first_last_piece_priority: bit(b"qBt-firstLastPiecePriority", false),
            has_root_folder: bit(b"qBt-hasRootFolder", content_layout.has_root_folder()),
            name: string(b"qBt-name", ""),
            ratio_limit: int(b"qBt-ratioLimit", defaults.qbt.ratio_limit),
            save_path: string(b"qBt-savePath", ""),
            seed_status: bit(b"qBt-seedStatus", false),
            seeding_time_limit: int(b"qBt-seedingTimeLimit", defaults.qbt.seeding_time_limit),
            tags: strings(b"qBt-tags"),
            temp_path_disabled: bit(b"qBt-tempPathDisabled", false),
        };

        Ok(Self {
            active_time: int(b"active_time", 0),
            added_time: int(b"added_time", 0),
            allocation: string(b"allocation", &defaults.allocation),
            apply_ip_filter: bit(b"apply_ip_filter", defaults.apply_ip_filter),
            auto_managed: bit(b"auto_managed", false),
            completed_time: int(b"completed_time", 0),
            disable_dht: bit(b"disable_dht", false),
            disable_lsd: bit(b"disable_lsd", false),
            disable_pex: bit(b"disable_pex", false),
            download_rate_limit: int(b"download_rate_limit", defaults.download_rate_limit),
            file_format: string(b"file-format", &defaults.file_format),
            file_version: int(b"file-version", defaults.file_version),
            file_priority,
            finished_time: int(b"finished_time", 0),
            http_seeds: strings(b"httpseeds"),
            info_hash: defaults.info_hash,
            last_download: int(b"last_download", 0),
            last_seen_complete: int(b"last_seen_complete", 0),
            last_upload: int(b"last_upload", 0),
            libtorrent_version: string(b"libtorrent-version", &defaults.libtorrent_version),
            mapped_files: strings(b"mapped_files"),
            max_connections: int(b"max_connections", defaults.max_connections),
            max_uploads: int(b"max_uploads", defaults.max_uploads),
            num_complete: int(b"num_complete", 0),
            num_downloaded: int(b"num_downloaded", 0),
            num_incomplete: int(b"num_incomplete", 0),
            paused: bit(b"paused", false),
            peers: raw(b"peers"),
            peers6: raw(b"peers6"),
            pieces: PieceMap::from_resume_bytes(&raw(b"pieces")),
            queue_position: int(b"queue_position", 0),
            save_path: string(b"save_path", ""),
            seed_mode: bit(b"seed_mode", false),
            seeding_time: int(b"seeding_time", 0),
            sequential_download: bit(b"sequential_download", false),
            share_mode: bit(b"share_mode", false),
            stop_when_ready: bit(b"stop_when_ready", false),
            super_seeding: bit(b"super_seeding", false),
            total_downloaded: int(b"total_downloaded", 0),
            total_uploaded: int(b"total_uploaded", 0),
            trackers,
            upload_rate_limit: int(b"upload_rate_limit", defaults.upload_rate_limit),
            url_list: strings(b"url-list"),
            qbt,
        })
    }
}

/// Fills a sibling `.tmp` file through `fill`, syncs it and renames it over
/// `path`. The temporary file is removed on failure.
pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<(), FastresumeError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), FastresumeError>,
{
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = (|| -> Result<(), FastresumeError> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        fill(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn flag(value: bool) -> i64 {
    i64::from(value)
}
