use super::*;
use crate::bencode::{decode, encode, DictBuilder, Value};
use crate::testing::FakeTorrent;

#[test]
fn test_info_hash_from_hex() {
    let hex = "0123456789abcdef0123456789abcdef01234567";
    let hash = InfoHash::from_hex(hex).unwrap();
    assert_eq!(hash.to_hex(), hex);
    assert_eq!(hash.as_bytes().len(), 20);
}

#[test]
fn test_info_hash_rejects_wrong_length() {
    assert!(InfoHash::from_hex("abcd").is_err());
    assert!(InfoHash::from_hex("zz23456789abcdef0123456789abcdef01234567").is_err());
    assert!(InfoHash::from_bytes(&[0u8; 32]).is_err());
}

#[test]
fn test_parse_single_file() {
    let data = FakeTorrent::new("movie.mkv")
        .length(4 * 16384)
        .tracker("http://tracker.example.com/announce")
        .to_bytes();

    let metainfo = Metainfo::from_bytes(&data).unwrap();

    assert_eq!(metainfo.info.name, "movie.mkv");
    assert_eq!(metainfo.info.piece_count(), 4);
    assert_eq!(metainfo.info.files.len(), 1);
    assert!(!metainfo.info.is_multi_file());
    assert_eq!(
        metainfo.announce.as_deref(),
        Some("http://tracker.example.com/announce")
    );
    assert_eq!(metainfo.raw().as_ref(), data.as_slice());
}

#[test]
fn test_parse_multi_file() {
    let data = FakeTorrent::new("album")
        .file("cd1/track01.flac", 20000)
        .file("cover.jpg", 5000)
        .piece_length(16384)
        .to_bytes();

    let metainfo = Metainfo::from_bytes(&data).unwrap();

    assert!(metainfo.info.is_multi_file());
    assert_eq!(metainfo.info.total_length, 25000);
    assert_eq!(metainfo.info.piece_count(), 2);
    assert_eq!(
        metainfo.info.files[0].path,
        std::path::PathBuf::from("album/cd1/track01.flac")
    );
    assert_eq!(metainfo.info.files[1].offset, 20000);
}

#[test]
fn test_single_entry_files_list_is_not_multi_file() {
    let data = FakeTorrent::new("wrapped").file("only.bin", 100).to_bytes();
    let metainfo = Metainfo::from_bytes(&data).unwrap();
    assert!(!metainfo.info.is_multi_file());
}

#[test]
fn test_info_hash_is_deterministic() {
    let data = FakeTorrent::new("stable").private().to_bytes();
    let first = Metainfo::from_bytes(&data).unwrap();
    let second = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(first.info_hash, second.info_hash);
    assert!(first.info.private);

    let info = decode(&data).unwrap().get(b"info").cloned().unwrap();
    let expected = InfoHash::from_info_bytes(&encode(&info).unwrap());
    assert_eq!(first.info_hash, expected);
}

#[test]
fn test_info_hash_ignores_outer_fields() {
    let plain = FakeTorrent::new("same").to_bytes();
    let tracked = FakeTorrent::new("same")
        .tracker("udp://tracker.example.org:80")
        .to_bytes();

    let a = Metainfo::from_bytes(&plain).unwrap();
    let b = Metainfo::from_bytes(&tracked).unwrap();
    assert_eq!(a.info_hash, b.info_hash);
}

#[test]
fn test_trackers_deduplicated() {
    let data = FakeTorrent::new("t")
        .tracker("http://a/announce")
        .tracker("http://b/announce")
        .tracker("http://a/announce")
        .to_bytes();
    let metainfo = Metainfo::from_bytes(&data).unwrap();
    assert_eq!(
        metainfo.trackers(),
        vec!["http://a/announce".to_string(), "http://b/announce".to_string()]
    );
}

#[test]
fn test_piece_count_mismatch_rejected() {
    let info = DictBuilder::new()
        .str("name", "short")
        .int("piece length", 16384)
        .int("length", 16384 * 3)
        .bytes("pieces", &[0u8; 40])
        .build();
    let data = encode(&DictBuilder::new().value("info", info).build()).unwrap();

    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::PieceCountMismatch {
            pieces: 2,
            expected: 3
        })
    ));
}

#[test]
fn test_total_length_overflow_rejected() {
    let file = |name: &str| {
        DictBuilder::new()
            .int("length", i64::MAX)
            .str_list("path", &[name.to_string()])
            .build()
    };
    let info = DictBuilder::new()
        .str("name", "huge")
        .int("piece length", 16384)
        .bytes("pieces", &[0u8; 20])
        .value("files", Value::List(vec![file("a"), file("b"), file("c")]))
        .build();
    let data = encode(&DictBuilder::new().value("info", info).build()).unwrap();

    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::InvalidField("files"))
    ));
}

#[test]
fn test_missing_info_rejected() {
    let data = encode(&DictBuilder::new().str("announce", "http://x").build()).unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("info"))
    ));
}

#[test]
fn test_zero_piece_length_rejected() {
    let info = DictBuilder::new()
        .str("name", "zero")
        .int("piece length", 0)
        .int("length", 0)
        .bytes("pieces", &[])
        .build();
    let data = encode(&DictBuilder::new().value("info", info).build()).unwrap();
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::InvalidField("piece length"))
    ));
}

#[test]
fn test_garbage_rejected() {
    assert!(matches!(
        Metainfo::from_bytes(b"not bencode"),
        Err(MetainfoError::Bencode(_))
    ));
    assert!(matches!(
        Metainfo::from_bytes(&encode(&Value::Integer(1)).unwrap()),
        Err(MetainfoError::InvalidField("root"))
    ));
}

#[test]
fn test_from_file_missing() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        Metainfo::from_file(&dir.path().join("absent.torrent")),
        Err(MetainfoError::Io(_))
    ));
}
