use std::path::PathBuf;

use crate::fastresume::BuildOptions;

/// Settings for one import run.
///
/// ```
/// use qbmigrate::import::ImportOptions;
///
/// let options = ImportOptions::new("/tmp/BT_backup")
///     .dry_run(true)
///     .tag("imported")
///     .without_labels(true);
/// assert!(options.dry_run);
/// assert!(options.skip_existing);
/// assert_eq!(options.build.tags, vec!["imported".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory receiving `<id>.torrent` + `<id>.fastresume` pairs.
    pub dest_dir: PathBuf,
    /// Decode and build everything but write nothing.
    pub dry_run: bool,
    /// Leave torrents that already have a fastresume at the destination
    /// untouched. When off, their records are rebuilt and overwritten.
    pub skip_existing: bool,
    pub build: BuildOptions,
}

impl ImportOptions {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            dry_run: false,
            skip_existing: true,
            build: BuildOptions::default(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.build.tags.push(tag.into());
        self
    }

    pub fn without_labels(mut self, without: bool) -> Self {
        self.build.without_labels = without;
        self
    }

    pub fn without_tags(mut self, without: bool) -> Self {
        self.build.without_tags = without;
        self
    }

    pub fn libtorrent_version(mut self, version: impl Into<String>) -> Self {
        self.build.libtorrent_version = version.into();
        self
    }
}
