//! libtorrent/qBittorrent fastresume records.
//!
//! A fastresume record is everything qBittorrent needs to pick a torrent up
//! without rechecking its data: where the content is, which pieces are
//! complete, per-file priorities, trackers and the session counters.
//!
//! - [`FastresumeRecord`] - typed record with encode/decode and file I/O
//! - [`FastresumeBuilder`] - derives a record from any source family
//! - [`PieceMap`] - one byte per piece completion map
//! - [`ContentLayout`] - `qBt-contentLayout` values
//!
//! # Examples
//!
//! ```
//! use qbmigrate::fastresume::{FastresumeRecord, PieceMap};
//! use qbmigrate::metainfo::InfoHash;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = InfoHash::from_hex("0123456789abcdef0123456789abcdef01234567")?;
//! let mut record = FastresumeRecord::new(hash);
//! record.save_path = "/downloads".to_string();
//! record.pieces = PieceMap::full(4);
//! record.file_priority = vec![1];
//!
//! let bytes = record.to_bytes()?;
//! assert_eq!(FastresumeRecord::from_bytes(&bytes)?, record);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod layout;
mod pieces;
mod record;

pub use builder::{filter_trackers, BuildContext, BuildOptions, FastresumeBuilder};
pub use error::FastresumeError;
pub use layout::ContentLayout;
pub use pieces::PieceMap;
pub use record::{FastresumeRecord, QbtFields};
pub(crate) use record::write_atomic;

#[cfg(test)]
mod tests;
