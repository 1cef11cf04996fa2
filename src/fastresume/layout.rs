use std::fmt;
use std::str::FromStr;

use super::error::FastresumeError;

/// How downloaded content sits below the save path (`qBt-contentLayout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentLayout {
    /// Keep the torrent's own layout: multi-file content under its root folder.
    #[default]
    Original,
    /// Always create a root folder.
    Subfolder,
    /// Strip the root folder; content sits directly in the save path.
    NoSubfolder,
}

impl ContentLayout {
    /// Layout for a torrent with `file_count` files.
    pub fn for_file_count(file_count: usize) -> Self {
        if file_count > 1 {
            ContentLayout::Original
        } else {
            ContentLayout::NoSubfolder
        }
    }

    pub fn has_root_folder(&self) -> bool {
        !matches!(self, ContentLayout::NoSubfolder)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLayout::Original => "Original",
            ContentLayout::Subfolder => "Subfolder",
            ContentLayout::NoSubfolder => "NoSubfolder",
        }
    }
}

impl FromStr for ContentLayout {
    type Err = FastresumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Original" => Ok(ContentLayout::Original),
            "Subfolder" => Ok(ContentLayout::Subfolder),
            "NoSubfolder" => Ok(ContentLayout::NoSubfolder),
            _ => Err(FastresumeError::InvalidField("qBt-contentLayout")),
        }
    }
}

impl fmt::Display for ContentLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
