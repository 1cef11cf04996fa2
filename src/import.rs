//! Import orchestration.
//!
//! The [`Importer`] drives one [`SessionSource`](crate::session::SessionSource)
//! through the per-torrent pipeline:
//!
//! ```text
//! Discovered ─┬─> SkippedNoMatch              (no .torrent, missing sidecar)
//!             └─> Matched ─┬─> SkippedExisting (destination already migrated)
//!                          └─> Built ─┬─> Written
//!                                     └─> DryRun
//! ```
//!
//! Errors for one torrent are logged and counted; only errors about the
//! source or destination directory stop the run.
//!
//! # Examples
//!
//! ```no_run
//! use qbmigrate::import::{ImportOptions, Importer};
//! use qbmigrate::session::RTorrentSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ImportOptions::new("/var/lib/qBittorrent/BT_backup")
//!     .dry_run(true)
//!     .tag("from-rtorrent");
//! let summary = Importer::new(RTorrentSource::new("/home/me/.session"), options).run()?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

mod error;
mod importer;
mod options;
mod summary;

pub use error::ImportError;
pub use importer::Importer;
pub use options::ImportOptions;
pub use summary::{ImportSummary, Outcome, TorrentReport};
