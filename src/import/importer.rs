use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use super::error::ImportError;
use super::options::ImportOptions;
use super::summary::{ImportSummary, Outcome};
use crate::constants::{FASTRESUME_EXT, TORRENT_EXT, WRITE_CHECK_FILE};
use crate::fastresume::{write_atomic, BuildContext, FastresumeBuilder, FastresumeRecord};
use crate::metainfo::{InfoHash, Metainfo};
use crate::session::{SessionSource, SourceEntry, SourceState};

/// Migrates every torrent of one source into a qBittorrent backup directory.
///
/// Torrents are processed one at a time, in discovery order.
pub struct Importer<S> {
    source: S,
    options: ImportOptions,
    builder: FastresumeBuilder,
}

/// A torrent ready to be written.
enum Prepared {
    Built(FastresumeRecord),
    Native(Bytes),
}

impl<S: SessionSource> Importer<S> {
    pub fn new(source: S, options: ImportOptions) -> Self {
        let builder = FastresumeBuilder::new(options.build.clone());
        Self {
            source,
            options,
            builder,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Runs the import with the system clock.
    pub fn run(&self) -> Result<ImportSummary, ImportError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.run_at(now)
    }

    /// Runs the import as if the current unix time were `now`.
    pub fn run_at(&self, now: i64) -> Result<ImportSummary, ImportError> {
        let family = self.source.family();
        let entries = self
            .source
            .discover()
            .map_err(|e| ImportError::session("", PathBuf::new(), e))?;

        tracing::info!(
            %family,
            count = entries.len(),
            dest = %self.options.dest_dir.display(),
            dry_run = self.options.dry_run,
            "starting import"
        );

        if !self.options.dry_run {
            self.prepare_destination()?;
        }

        let mut summary = ImportSummary {
            discovered: entries.len(),
            ..Default::default()
        };
        let mut queue_position = 0i64;

        for (index, entry) in entries.iter().enumerate() {
            let ctx = BuildContext {
                now,
                queue_position,
            };
            let outcome = match self.migrate(entry, ctx) {
                Ok(outcome) => outcome,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err @ ImportError::MissingCounterpart { .. }) => {
                    tracing::warn!(id = %entry.id, error = %err, "skipping torrent");
                    Outcome::SkippedNoMatch
                }
                Err(err) => {
                    tracing::warn!(id = %entry.id, error = %err, "failed to migrate torrent");
                    Outcome::Failed
                }
            };
            tracing::debug!(
                id = %entry.id,
                index = index + 1,
                total = entries.len(),
                ?outcome,
                "torrent processed"
            );
            // Every matched entry holds its slot, so reruns keep positions.
            if outcome != Outcome::SkippedNoMatch {
                queue_position += 1;
            }
            summary.record(&entry.id, outcome);
        }

        tracing::info!(
            %family,
            discovered = summary.discovered,
            written = summary.written,
            dry_run = summary.dry_run,
            skipped_no_match = summary.skipped_no_match,
            skipped_existing = summary.skipped_existing,
            failed = summary.failed,
            "import finished: {summary}"
        );

        Ok(summary)
    }

    /// Creates the destination directory and checks that files can be
    /// created in it.
    fn prepare_destination(&self) -> Result<(), ImportError> {
        let dest = &self.options.dest_dir;
        let unwritable = |source: std::io::Error| ImportError::DestinationUnwritable {
            path: dest.clone(),
            source,
        };

        std::fs::create_dir_all(dest).map_err(unwritable)?;
        let check = dest.join(WRITE_CHECK_FILE);
        std::fs::write(&check, b"").map_err(unwritable)?;
        std::fs::remove_file(&check).map_err(unwritable)?;
        Ok(())
    }

    /// Runs one entry through the pipeline.
    fn migrate(
        &self,
        entry: &SourceEntry<S::Payload>,
        ctx: BuildContext,
    ) -> Result<Outcome, ImportError> {
        let id = entry.id.as_str();

        if !entry.torrent_path.is_file() {
            tracing::warn!(
                id,
                path = %entry.torrent_path.display(),
                "no matching torrent file, skipping"
            );
            return Ok(Outcome::SkippedNoMatch);
        }

        let resume_dest = self.dest_path(id, FASTRESUME_EXT);
        if self.options.skip_existing && resume_dest.exists() {
            tracing::info!(id, path = %resume_dest.display(), "already migrated, skipping");
            return Ok(Outcome::SkippedExisting);
        }

        let torrent = Metainfo::from_file(&entry.torrent_path)
            .map_err(|e| ImportError::metainfo(id, entry.torrent_path.clone(), e))?;
        check_identifier(id, &torrent.info_hash);

        let state = self
            .source
            .load(entry, &torrent)
            .map_err(|e| ImportError::session(id, entry.torrent_path.clone(), e))?;

        let prepared = match state {
            SourceState::Session(record) => {
                let fastresume = self.builder.build(&record, &torrent, ctx);
                // Dry runs must fail on the same records a real run would.
                fastresume
                    .to_value()
                    .map_err(|e| ImportError::fastresume(id, resume_dest.clone(), e))?;
                Prepared::Built(fastresume)
            }
            SourceState::Native(bytes) => Prepared::Native(bytes),
        };

        if self.options.dry_run {
            tracing::info!(
                id,
                name = %torrent.info.name,
                info_hash = %torrent.info_hash,
                "would migrate"
            );
            return Ok(Outcome::DryRun);
        }

        let torrent_dest = self.dest_path(id, TORRENT_EXT);
        std::fs::write(&torrent_dest, torrent.raw())
            .map_err(|e| ImportError::io(id, torrent_dest.clone(), e))?;

        // The fastresume goes last: its presence marks the torrent as done.
        let written = match prepared {
            Prepared::Built(record) => record.write_to_path(&resume_dest),
            Prepared::Native(bytes) => {
                write_atomic(&resume_dest, |writer| Ok(writer.write_all(&bytes)?))
            }
        };
        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&torrent_dest) {
                tracing::warn!(
                    id,
                    path = %torrent_dest.display(),
                    error = %cleanup,
                    "could not remove torrent after failed write"
                );
            }
            return Err(ImportError::fastresume(id, resume_dest, e));
        }

        tracing::info!(
            id,
            name = %torrent.info.name,
            path = %resume_dest.display(),
            "migrated"
        );
        Ok(Outcome::Written)
    }

    fn dest_path(&self, id: &str, ext: &str) -> PathBuf {
        dest_file(&self.options.dest_dir, id, ext)
    }
}

fn dest_file(dir: &Path, id: &str, ext: &str) -> PathBuf {
    dir.join(format!("{id}.{ext}"))
}

/// Warns when an identifier that looks like an info-hash disagrees with the
/// recomputed one.
fn check_identifier(id: &str, info_hash: &InfoHash) {
    if let Ok(claimed) = InfoHash::from_hex(id) {
        if &claimed != info_hash {
            tracing::warn!(
                id,
                computed = %info_hash,
                "identifier differs from recomputed info hash"
            );
        }
    }
}
