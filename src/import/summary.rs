use std::fmt;

/// Final state of one torrent in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    DryRun,
    SkippedNoMatch,
    SkippedExisting,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentReport {
    pub id: String,
    pub outcome: Outcome,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub discovered: usize,
    pub written: usize,
    pub dry_run: usize,
    pub skipped_no_match: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub reports: Vec<TorrentReport>,
}

impl ImportSummary {
    pub(crate) fn record(&mut self, id: &str, outcome: Outcome) {
        match outcome {
            Outcome::Written => self.written += 1,
            Outcome::DryRun => self.dry_run += 1,
            Outcome::SkippedNoMatch => self.skipped_no_match += 1,
            Outcome::SkippedExisting => self.skipped_existing += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.reports.push(TorrentReport {
            id: id.to_string(),
            outcome,
        });
    }

    /// Torrents written, or that would have been in a dry run.
    pub fn migrated(&self) -> usize {
        self.written + self.dry_run
    }

    pub fn outcome_of(&self, id: &str) -> Option<Outcome> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.outcome)
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "discovered {}, migrated {}{}, skipped {} without match, {} already present, {} failed",
            self.discovered,
            self.migrated(),
            if self.dry_run > 0 { " (dry run)" } else { "" },
            self.skipped_no_match,
            self.skipped_existing,
            self.failed,
        )
    }
}
