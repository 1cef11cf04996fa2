//! Fixed file names, record defaults and client sentinels.
//!
//! The fastresume values below match what qBittorrent writes for a torrent
//! that was added with default settings, so migrated torrents look native to
//! the target client.

// ============================================================================
// File names and suffixes
// ============================================================================

/// Extension of torrent metainfo files
pub const TORRENT_EXT: &str = "torrent";

/// Extension of fastresume records
pub const FASTRESUME_EXT: &str = "fastresume";

/// Scratch file created and removed to check the destination is writable
pub const WRITE_CHECK_FILE: &str = ".qbmigrate-write-check";

/// Deluge aggregate resume file inside its state directory
pub const DELUGE_AGGREGATE_FILE: &str = "torrents.fastresume";

/// rTorrent session counters sidecar, appended to the `.torrent` file name
pub const RTORRENT_SESSION_SUFFIX: &str = ".rtorrent";

/// rTorrent libtorrent resume sidecar, appended to the `.torrent` file name
pub const RTORRENT_RESUME_SUFFIX: &str = ".libtorrent_resume";

// ============================================================================
// Tracker handling
// ============================================================================

/// URL scheme rTorrent uses for its DHT pseudo-tracker
pub const DHT_PSEUDO_SCHEME: &str = "dht://";

// ============================================================================
// qBittorrent sentinels
// ============================================================================

/// `qBt-ratioLimit` value meaning "no per-torrent limit, follow the global one"
pub const RATIO_LIMIT_UNSET: i64 = -2000;

/// `qBt-seedingTimeLimit` value meaning "no per-torrent limit, follow the global one"
pub const SEEDING_TIME_LIMIT_UNSET: i64 = -2;

/// qBittorrent's "normal" file priority
pub const DEFAULT_FILE_PRIORITY: i64 = 1;

/// qBittorrent's "maximum" file priority
pub const HIGH_FILE_PRIORITY: i64 = 6;

// ============================================================================
// Record defaults
// ============================================================================

/// Value of the `file-format` key
pub const FILE_FORMAT: &str = "libtorrent resume file";

/// Value of the `file-version` key
pub const FILE_VERSION: i64 = 1;

/// libtorrent version stamped into generated records
pub const LIBTORRENT_VERSION: &str = "1.2.14.0";

/// Storage allocation mode
pub const ALLOCATION_SPARSE: &str = "sparse";

/// Rate limit value meaning unlimited
pub const RATE_LIMIT_UNLIMITED: i64 = -1;

/// Default `max_connections` and `max_uploads`
pub const DEFAULT_MAX_CONNECTIONS: i64 = 100;

/// Default `max_uploads`
pub const DEFAULT_MAX_UPLOADS: i64 = 100;

/// Seconds per minute, for `finished_time`
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Highest priority libtorrent accepts for a file
pub const MAX_FILE_PRIORITY: i64 = 7;
