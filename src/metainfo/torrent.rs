use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{decode, encode, Value};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// A parsed torrent file.
///
/// Keeps the original file bytes around so the importer can copy the
/// descriptor to its destination without re-encoding it.
#[derive(Debug, Clone)]
pub struct Metainfo {
    /// The info dictionary containing file and piece information.
    pub info: Info,
    /// SHA-1 of the canonically encoded info dictionary.
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Vec<Vec<String>>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
    raw: Bytes,
}

/// The info dictionary from a torrent file.
#[derive(Debug, Clone)]
pub struct Info {
    /// Suggested name for the file or directory.
    pub name: String,
    /// Number of bytes per piece.
    pub piece_length: u64,
    /// SHA1 hash of each piece (20 bytes each).
    pub pieces: Vec<[u8; 20]>,
    /// List of files in the torrent.
    pub files: Vec<File>,
    /// Total size of all files combined.
    pub total_length: u64,
    /// If true, clients should only use trackers in the metainfo (no DHT/PEX).
    pub private: bool,
}

/// A file within a torrent.
///
/// For single-file torrents, there is one file with the torrent name.
/// For multi-file torrents, paths start with the torrent name.
#[derive(Debug, Clone)]
pub struct File {
    /// Path to the file (relative to the save path).
    pub path: PathBuf,
    /// Size of the file in bytes.
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
}

impl Info {
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Whether the torrent declares two or more files.
    ///
    /// This drives the content layout, so a `files` list holding a single
    /// entry is treated like a single-file torrent.
    pub fn is_multi_file(&self) -> bool {
        self.files.len() > 1
    }
}

impl Metainfo {
    /// Reads and parses a `.torrent` file.
    pub fn from_file(path: &Path) -> Result<Self, MetainfoError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parses a torrent file from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode
    /// - Required fields are missing (info, name, pieces, etc.)
    /// - The pieces field length is not a multiple of 20
    /// - The number of piece hashes disagrees with the content length
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let value = decode(data)?;
        let dict = value.as_dict().ok_or(MetainfoError::InvalidField("root"))?;

        let info_value = dict
            .get(b"info".as_slice())
            .ok_or(MetainfoError::MissingField("info"))?;

        let raw_info = encode(info_value)?;
        let info_hash = InfoHash::from_info_bytes(&raw_info);
        let info = parse_info(info_value)?;

        let announce = value.str(b"announce").map(String::from);

        let announce_list = dict
            .get(b"announce-list".as_slice())
            .and_then(|v| v.as_list())
            .map(|list| {
                list.iter()
                    .filter_map(|tier| {
                        tier.as_list().map(|urls| {
                            urls.iter()
                                .filter_map(|u| u.as_str().map(String::from))
                                .collect()
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            info,
            info_hash,
            announce,
            announce_list,
            creation_date: value.int(b"creation date"),
            comment: value.str(b"comment").map(String::from),
            created_by: value.str(b"created by").map(String::from),
            raw: Bytes::copy_from_slice(data),
        })
    }

    /// The torrent file exactly as it was read.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker (from `announce`) comes first, followed by
    /// trackers from `announce-list`. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = Vec::new();

        if let Some(ref announce) = self.announce {
            trackers.push(announce.clone());
        }

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

fn parse_info(value: &Value) -> Result<Info, MetainfoError> {
    let dict = value.as_dict().ok_or(MetainfoError::InvalidField("info"))?;

    let name = value
        .str(b"name")
        .ok_or(MetainfoError::MissingField("name"))?
        .to_string();

    let piece_length = value
        .int(b"piece length")
        .ok_or(MetainfoError::MissingField("piece length"))?;
    if piece_length <= 0 {
        return Err(MetainfoError::InvalidField("piece length"));
    }
    let piece_length = piece_length as u64;

    let pieces_bytes = value
        .bytes(b"pieces")
        .ok_or(MetainfoError::MissingField("pieces"))?;

    if pieces_bytes.len() % 20 != 0 {
        return Err(MetainfoError::InvalidField("pieces"));
    }

    let pieces: Vec<[u8; 20]> = pieces_bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut arr = [0u8; 20];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    let private = value.int(b"private").map(|v| v == 1).unwrap_or(false);

    let (files, total_length) = if let Some(length) = value.int(b"length") {
        if length < 0 {
            return Err(MetainfoError::InvalidField("length"));
        }
        let length = length as u64;
        let file = File {
            path: PathBuf::from(&name),
            length,
            offset: 0,
        };
        (vec![file], length)
    } else if let Some(files_list) = dict.get(b"files".as_slice()).and_then(|v| v.as_list()) {
        let mut files = Vec::with_capacity(files_list.len());
        let mut offset = 0u64;

        for file_value in files_list {
            let length = file_value
                .int(b"length")
                .ok_or(MetainfoError::MissingField("file length"))?;
            if length < 0 {
                return Err(MetainfoError::InvalidField("file length"));
            }
            let length = length as u64;

            let segments = file_value
                .str_list(b"path")
                .ok_or(MetainfoError::MissingField("file path"))?;
            if segments.is_empty() {
                return Err(MetainfoError::InvalidField("file path"));
            }

            let path: PathBuf = std::iter::once(name.clone()).chain(segments).collect();

            files.push(File {
                path,
                length,
                offset,
            });

            offset = offset
                .checked_add(length)
                .ok_or(MetainfoError::InvalidField("files"))?;
        }

        if files.is_empty() {
            return Err(MetainfoError::InvalidField("files"));
        }

        (files, offset)
    } else {
        return Err(MetainfoError::MissingField("length or files"));
    };

    let expected = total_length.div_ceil(piece_length);
    if pieces.len() as u64 != expected {
        return Err(MetainfoError::PieceCountMismatch {
            pieces: pieces.len(),
            expected,
        });
    }

    Ok(Info {
        name,
        piece_length,
        pieces,
        files,
        total_length,
        private,
    })
}
