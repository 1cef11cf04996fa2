//! Fixture builders shared by the unit tests.

use std::path::Path;

use crate::bencode::{encode, DictBuilder, Value};

/// Builds bencoded `.torrent` files for tests.
///
/// With no `file()` calls the torrent is single-file with `length` bytes.
pub struct FakeTorrent {
    name: String,
    length: u64,
    files: Vec<(String, u64)>,
    piece_length: u64,
    trackers: Vec<String>,
    private: bool,
}

impl FakeTorrent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            length: 4 * 16384,
            files: Vec::new(),
            piece_length: 16384,
            trackers: Vec::new(),
            private: false,
        }
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    pub fn file(mut self, path: &str, length: u64) -> Self {
        self.files.push((path.to_string(), length));
        self
    }

    pub fn piece_length(mut self, piece_length: u64) -> Self {
        self.piece_length = piece_length;
        self
    }

    pub fn tracker(mut self, url: &str) -> Self {
        self.trackers.push(url.to_string());
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let total: u64 = if self.files.is_empty() {
            self.length
        } else {
            self.files.iter().map(|(_, len)| len).sum()
        };
        let piece_count = total.div_ceil(self.piece_length) as usize;
        let pieces: Vec<u8> = (0..piece_count * 20).map(|i| (i % 251) as u8).collect();

        let mut info = DictBuilder::new()
            .str("name", &self.name)
            .int("piece length", self.piece_length as i64)
            .bytes("pieces", &pieces);

        if self.files.is_empty() {
            info = info.int("length", self.length as i64);
        } else {
            let files = self
                .files
                .iter()
                .map(|(path, len)| {
                    let segments: Vec<String> = path.split('/').map(String::from).collect();
                    DictBuilder::new()
                        .int("length", *len as i64)
                        .str_list("path", &segments)
                        .build()
                })
                .collect::<Vec<_>>();
            info = info.value("files", Value::List(files));
        }

        if self.private {
            info = info.int("private", 1);
        }

        let mut root = DictBuilder::new().value("info", info.build());
        if let Some(first) = self.trackers.first() {
            root = root.str("announce", first);
            let tiers = self
                .trackers
                .iter()
                .map(|t| Value::List(vec![Value::string(t)]))
                .collect::<Vec<_>>();
            root = root.value("announce-list", Value::List(tiers));
        }

        encode(&root.build()).expect("encode fake torrent")
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write fake torrent");
    }
}
