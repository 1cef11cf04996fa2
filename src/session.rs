//! Source client session decoders.
//!
//! Each supported client family persists torrent state differently. A
//! [`SessionSource`] hides those differences behind two steps: list the
//! entries of a session directory, then turn one entry into either a
//! normalized [`SourceSessionRecord`] or, for clients that already speak
//! the target format, the native fastresume bytes.
//!
//! | Family | Source | On-disk layout |
//! |--------|--------|----------------|
//! | A | [`DelugeSource`] | `torrents.fastresume`: id → bencoded resume blob, plus `<id>.torrent` |
//! | B | [`RTorrentSource`] | `<name>.torrent` with `.rtorrent` and `.libtorrent_resume` sidecars |
//! | C | [`QBittorrentSource`] | `<id>.torrent` + `<id>.fastresume` pairs, copied verbatim |
//!
//! Adding a family means implementing [`SessionSource`]; the shared
//! [`FastresumeBuilder`](crate::fastresume::FastresumeBuilder) and the
//! importer stay unchanged.

mod deluge;
mod error;
mod qbittorrent;
mod record;
mod rtorrent;

pub use deluge::DelugeSource;
pub use error::SessionError;
pub use qbittorrent::QBittorrentSource;
pub use record::{SourceFamily, SourceSessionRecord, TrackerState};
pub use rtorrent::RTorrentSource;

use std::path::PathBuf;

use bytes::Bytes;

use crate::metainfo::Metainfo;

/// One torrent found in a source directory, before anything about it has
/// been decoded beyond its identifier.
#[derive(Debug, Clone)]
pub struct SourceEntry<P> {
    /// Lower-case identifier; names the destination files.
    pub id: String,
    /// Where the matching `.torrent` is expected.
    pub torrent_path: PathBuf,
    /// Family-specific data carried from discovery to loading.
    pub payload: P,
}

/// What a source produced for one torrent.
#[derive(Debug, Clone)]
pub enum SourceState {
    /// Normalized state that still needs the fastresume builder.
    Session(SourceSessionRecord),
    /// An already valid fastresume record to copy byte for byte.
    Native(Bytes),
}

/// A client family the importer can migrate from.
pub trait SessionSource {
    type Payload;

    fn family(&self) -> SourceFamily;

    /// Lists every entry in the source, sorted by identifier.
    ///
    /// Fails only when the source as a whole is unusable, e.g. its directory
    /// or aggregate file is missing.
    fn discover(&self) -> Result<Vec<SourceEntry<Self::Payload>>, SessionError>;

    /// Decodes one entry against its already parsed descriptor.
    fn load(
        &self,
        entry: &SourceEntry<Self::Payload>,
        torrent: &Metainfo,
    ) -> Result<SourceState, SessionError>;
}
