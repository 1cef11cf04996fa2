//! qbmigrate - migrate BitTorrent client state into qBittorrent
//!
//! This library reads the persisted session state of a source BitTorrent
//! client and produces libtorrent/qBittorrent fastresume records, so the
//! torrents resume seeding in qBittorrent without a recheck.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding
//! - [`metainfo`] - Torrent metainfo parsing and info-hash computation
//! - [`session`] - Deluge, rTorrent and qBittorrent session decoders
//! - [`fastresume`] - Fastresume records, the shared builder, encoding
//! - [`import`] - Per-torrent import orchestration
//! - [`constants`] - File names, sentinels and record defaults

pub mod bencode;
pub mod constants;
pub mod fastresume;
pub mod import;
pub mod metainfo;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use bencode::{decode, encode, BencodeError, Value};
pub use fastresume::{
    BuildContext, BuildOptions, ContentLayout, FastresumeBuilder, FastresumeError,
    FastresumeRecord, PieceMap,
};
pub use import::{ImportError, ImportOptions, ImportSummary, Importer, Outcome};
pub use metainfo::{File, Info, InfoHash, Metainfo, MetainfoError};
pub use session::{
    DelugeSource, QBittorrentSource, RTorrentSource, SessionError, SessionSource,
    SourceFamily, SourceSessionRecord, SourceState, TrackerState,
};
