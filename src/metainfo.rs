//! Torrent metainfo handling ([BEP-3]).
//!
//! A `.torrent` file describes the piece and file layout of a torrent. The
//! migration engine needs four things from it: the file list (to size the
//! priority table and pick a content layout), the piece count (to size the
//! completion map), the tracker list and the info-hash.
//!
//! The info-hash is always recomputed here from the canonical encoding of the
//! `info` dictionary. Session files from other clients are never trusted for
//! it.
//!
//! # Examples
//!
//! ```no_run
//! use qbmigrate::metainfo::Metainfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Metainfo::from_file("example.torrent".as_ref())?;
//!
//! println!("Name: {}", torrent.info.name);
//! println!("Info hash: {}", torrent.info_hash);
//! println!("Pieces: {}", torrent.info.piece_count());
//! println!("Multi-file: {}", torrent.info.is_multi_file());
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod error;
mod info_hash;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::{File, Info, Metainfo};

#[cfg(test)]
mod tests;
