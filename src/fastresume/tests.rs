use super::*;
use crate::bencode::{decode, encode, DictBuilder, Value};
use crate::constants::{RATIO_LIMIT_UNSET, SEEDING_TIME_LIMIT_UNSET};
use crate::metainfo::{InfoHash, Metainfo};
use crate::session::{SourceFamily, SourceSessionRecord, TrackerState};
use crate::testing::FakeTorrent;
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000;

fn metainfo(fake: FakeTorrent) -> Metainfo {
    Metainfo::from_bytes(&fake.to_bytes()).unwrap()
}

fn source(save_path: &str) -> SourceSessionRecord {
    SourceSessionRecord::new("abc123", SourceFamily::Deluge, save_path)
}

fn ctx() -> BuildContext {
    BuildContext {
        now: NOW,
        queue_position: 0,
    }
}

fn sample_record() -> FastresumeRecord {
    let hash = InfoHash::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap();
    let mut record = FastresumeRecord::new(hash);
    record.save_path = "/data/torrents".to_string();
    record.added_time = 1_600_000_000;
    record.completed_time = 1_600_000_500;
    record.total_uploaded = 42_000;
    record.file_priority = vec![1, 0, 6];
    record.pieces = PieceMap::from_resume_bytes(&[1, 1, 0, 1]);
    record.trackers = vec![
        vec!["http://a.example/announce".to_string()],
        vec!["udp://b.example:80".to_string()],
    ];
    record.mapped_files = vec!["x".to_string(), "y".to_string(), "z".to_string()];
    record.paused = true;
    record.qbt.category = "movies".to_string();
    record.qbt.tags = vec!["imported".to_string()];
    record.qbt.content_layout = ContentLayout::NoSubfolder;
    record.qbt.has_root_folder = false;
    record.qbt.save_path = "/data/torrents".to_string();
    record.qbt.seed_status = true;
    record
}

#[test]
fn test_record_roundtrip() {
    let record = sample_record();
    let bytes = record.to_bytes().unwrap();
    let decoded = FastresumeRecord::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_record_encoding_is_stable() {
    let record = sample_record();
    let first = record.to_bytes().unwrap();
    let again = FastresumeRecord::from_bytes(&first).unwrap().to_bytes().unwrap();
    assert_eq!(first, again);
}

#[test]
fn test_record_wire_keys() {
    let value = sample_record().to_value().unwrap();
    let dict = value.as_dict().unwrap();

    for key in [
        "active_time",
        "added_time",
        "file-format",
        "file_priority",
        "info-hash",
        "libtorrent-version",
        "pieces",
        "qBt-category",
        "qBt-contentLayout",
        "qBt-hasRootFolder",
        "qBt-ratioLimit",
        "qBt-savePath",
        "qBt-seedingTimeLimit",
        "qBt-tags",
        "save_path",
        "trackers",
        "url-list",
    ] {
        assert!(dict.contains_key(key.as_bytes()), "missing key {key}");
    }

    assert_eq!(value.str(b"file-format"), Some("libtorrent resume file"));
    assert_eq!(value.str(b"qBt-contentLayout"), Some("NoSubfolder"));
    assert_eq!(value.int(b"qBt-ratioLimit"), Some(RATIO_LIMIT_UNSET));
    assert_eq!(value.int(b"qBt-seedingTimeLimit"), Some(SEEDING_TIME_LIMIT_UNSET));
    assert_eq!(value.int(b"paused"), Some(1));
    assert_eq!(value.bytes(b"info-hash").map(|b| b.len()), Some(20));
    assert_eq!(
        value.bytes(b"pieces").map(|b| b.as_ref()),
        Some(&[1u8, 1, 0, 1][..])
    );

    let tiers = value.get(b"trackers").and_then(Value::as_list).unwrap();
    assert_eq!(tiers.len(), 2);
    assert!(tiers.iter().all(|tier| tier.as_list().map(Vec::len) == Some(1)));
}

#[test]
fn test_mapped_files_omitted_when_empty() {
    let mut record = sample_record();
    record.mapped_files.clear();
    let value = record.to_value().unwrap();
    assert!(value.get(b"mapped_files").is_none());
}

#[test]
fn test_encode_rejects_empty_save_path() {
    let mut record = sample_record();
    record.save_path.clear();
    assert!(matches!(
        record.to_bytes(),
        Err(FastresumeError::Unencodable("save_path"))
    ));
}

#[test]
fn test_encode_rejects_bad_priority_and_empty_tier() {
    let mut record = sample_record();
    record.file_priority = vec![1, 9];
    assert!(matches!(
        record.to_value(),
        Err(FastresumeError::Unencodable("file_priority"))
    ));

    let mut record = sample_record();
    record.trackers.push(Vec::new());
    assert!(matches!(
        record.to_value(),
        Err(FastresumeError::Unencodable("trackers"))
    ));
}

#[test]
fn test_write_and_read_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abc.fastresume");
    std::fs::write(&path, b"stale contents that are longer than nothing").unwrap();

    let record = sample_record();
    record.write_to_path(&path).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), record.to_bytes().unwrap());
    assert_eq!(FastresumeRecord::read_from_path(&path).unwrap(), record);
}

#[test]
fn test_write_to_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("abc.fastresume");
    assert!(matches!(
        sample_record().write_to_path(&path),
        Err(FastresumeError::Io(_))
    ));
}

#[test]
fn test_from_value_lenient_defaults() {
    let value = DictBuilder::new()
        .bytes("info-hash", &[7u8; 20])
        .str("save_path", "/x")
        .build();
    let record = FastresumeRecord::from_value(&value).unwrap();

    assert_eq!(record.save_path, "/x");
    assert!(record.apply_ip_filter);
    assert_eq!(record.qbt.ratio_limit, RATIO_LIMIT_UNSET);
    assert_eq!(record.qbt.content_layout, ContentLayout::Original);
    assert!(record.trackers.is_empty());
}

#[test]
fn test_from_value_requires_info_hash() {
    let value = DictBuilder::new().str("save_path", "/x").build();
    assert!(matches!(
        FastresumeRecord::from_value(&value),
        Err(FastresumeError::MissingField("info-hash"))
    ));

    let value = DictBuilder::new().bytes("info-hash", &[1u8; 5]).build();
    assert!(matches!(
        FastresumeRecord::from_value(&value),
        Err(FastresumeError::InfoHash(_))
    ));
}

#[test]
fn test_from_value_rejects_unknown_layout() {
    let value = DictBuilder::new()
        .bytes("info-hash", &[7u8; 20])
        .str("qBt-contentLayout", "Sideways")
        .build();
    assert!(matches!(
        FastresumeRecord::from_value(&value),
        Err(FastresumeError::InvalidField("qBt-contentLayout"))
    ));
}

#[test]
fn test_piece_map_packed_bits() {
    let map = PieceMap::from_packed_bits(&[0b1010_0000, 0b1000_0000], 9).unwrap();
    assert_eq!(map.len(), 9);
    assert_eq!(map.as_bytes(), &[1, 0, 1, 0, 0, 0, 0, 0, 1]);
    assert_eq!(map.count(), 3);
    assert!(!map.is_complete());

    assert!(PieceMap::from_packed_bits(&[0xff], 9).is_none());
}

#[test]
fn test_piece_map_full_and_empty() {
    let map = PieceMap::empty(3);
    assert_eq!(map.count(), 0);
    assert!(!map.is_complete());
    assert!(PieceMap::full(3).is_complete());
    assert_eq!(PieceMap::from_resume_bytes(&[0, 5, 1]).as_bytes(), &[0, 1, 1]);
}

#[test]
fn test_content_layout_law() {
    assert_eq!(ContentLayout::for_file_count(1), ContentLayout::NoSubfolder);
    assert_eq!(ContentLayout::for_file_count(2), ContentLayout::Original);
    assert_eq!(ContentLayout::for_file_count(17), ContentLayout::Original);
    assert!(!ContentLayout::NoSubfolder.has_root_folder());
    assert!(ContentLayout::Original.has_root_folder());
    assert_eq!(
        "NoSubfolder".parse::<ContentLayout>().unwrap(),
        ContentLayout::NoSubfolder
    );
}

#[test]
fn test_build_single_file() {
    let torrent = metainfo(FakeTorrent::new("movie.mkv").length(4 * 16384));
    let record = FastresumeBuilder::default().build(&source("/data"), &torrent, ctx());

    assert_eq!(record.info_hash, torrent.info_hash);
    assert_eq!(record.pieces.as_bytes(), &[1, 1, 1, 1]);
    assert_eq!(record.file_priority, vec![1]);
    assert_eq!(record.qbt.content_layout, ContentLayout::NoSubfolder);
    assert!(!record.qbt.has_root_folder);
    assert!(record.qbt.seed_status);
    assert_eq!(record.save_path, "/data");
    assert_eq!(record.qbt.save_path, "/data");
    assert_eq!(record.qbt.ratio_limit, RATIO_LIMIT_UNSET);
    assert_eq!(record.qbt.seeding_time_limit, SEEDING_TIME_LIMIT_UNSET);
    assert_eq!(record.last_seen_complete, NOW);
}

#[test]
fn test_build_multi_file_sizes() {
    let torrent = metainfo(
        FakeTorrent::new("album")
            .file("a.flac", 40000)
            .file("b.flac", 30000)
            .file("cover.jpg", 100),
    );
    let record = FastresumeBuilder::default().build(&source("/music"), &torrent, ctx());

    assert_eq!(record.file_priority.len(), 3);
    assert_eq!(record.pieces.len(), torrent.info.piece_count());
    assert_eq!(record.qbt.content_layout, ContentLayout::Original);
    assert!(record.qbt.has_root_folder);
}

#[test]
fn test_build_keeps_well_sized_source_maps() {
    let torrent = metainfo(FakeTorrent::new("pair").file("a", 16384).file("b", 16384));
    let mut src = source("/d");
    src.pieces = Some(PieceMap::from_resume_bytes(&[1, 0]));
    src.file_priority = Some(vec![6, 0]);
    src.mapped_files = vec!["renamed-a".to_string(), String::new()];

    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());

    assert_eq!(record.pieces.as_bytes(), &[1, 0]);
    assert!(!record.qbt.seed_status);
    assert_eq!(record.file_priority, vec![6, 0]);
    assert_eq!(record.mapped_files.len(), 2);
}

#[test]
fn test_build_replaces_mis_sized_source_maps() {
    let torrent = metainfo(FakeTorrent::new("single").length(3 * 16384));
    let mut src = source("/d");
    src.pieces = Some(PieceMap::empty(7));
    src.file_priority = Some(vec![1, 1, 1]);
    src.mapped_files = vec!["a".to_string(), "b".to_string()];

    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());

    assert_eq!(record.pieces, PieceMap::full(3));
    assert_eq!(record.file_priority, vec![1]);
    assert!(record.mapped_files.is_empty());
}

#[test]
fn test_build_out_of_range_priority_falls_back() {
    let torrent = metainfo(FakeTorrent::new("single"));
    let mut src = source("/d");
    src.file_priority = Some(vec![12]);
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.file_priority, vec![1]);
}

#[test]
fn test_build_is_deterministic() {
    let torrent = metainfo(FakeTorrent::new("det").file("x", 1).file("y", 2));
    let builder = FastresumeBuilder::default();
    let src = source("/d");
    let first = builder.build(&src, &torrent, ctx());
    let second = builder.build(&src, &torrent, ctx());
    assert_eq!(first, second);
    assert_eq!(first.info_hash, torrent.info_hash);
}

#[test]
fn test_build_finished_time_in_minutes() {
    let torrent = metainfo(FakeTorrent::new("t"));
    let mut src = source("/d");
    src.completed_time = NOW - 3 * 3600 - 59;
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.finished_time, 180);
    assert_eq!(record.completed_time, src.completed_time);

    src.completed_time = 0;
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.finished_time, 0);

    src.completed_time = NOW + 500;
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.finished_time, 0);
}

#[test]
fn test_build_added_time_defaults_to_now() {
    let torrent = metainfo(FakeTorrent::new("t"));
    let mut src = source("/d");
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.added_time, NOW);

    src.added_time = 1_500_000_000;
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());
    assert_eq!(record.added_time, 1_500_000_000);
}

#[test]
fn test_build_trackers_filtered() {
    let torrent = metainfo(FakeTorrent::new("t"));
    let mut src = source("/d");
    src.trackers = vec![
        TrackerState::enabled("http://one.example/announce"),
        TrackerState::enabled("dht://0123456789abcdef0123456789abcdef01234567.dht"),
        TrackerState {
            url: "http://off.example/announce".to_string(),
            enabled: false,
        },
        TrackerState::enabled("http://one.example/announce"),
        TrackerState::enabled("udp://two.example:6969"),
    ];

    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());

    assert_eq!(
        record.trackers,
        vec![
            vec!["http://one.example/announce".to_string()],
            vec!["udp://two.example:6969".to_string()],
        ]
    );
}

#[test]
fn test_build_labels_and_tags() {
    let torrent = metainfo(FakeTorrent::new("t"));
    let mut src = source("/d");
    src.label = Some("linux-isos".to_string());

    let options = BuildOptions {
        tags: vec!["migrated".to_string()],
        ..Default::default()
    };
    let record = FastresumeBuilder::new(options.clone()).build(&src, &torrent, ctx());
    assert_eq!(record.qbt.category, "linux-isos");
    assert_eq!(record.qbt.tags, vec!["migrated".to_string()]);

    let options = BuildOptions {
        without_labels: true,
        without_tags: true,
        ..options
    };
    let record = FastresumeBuilder::new(options).build(&src, &torrent, ctx());
    assert!(record.qbt.category.is_empty());
    assert!(record.qbt.tags.is_empty());
}

#[test]
fn test_build_queue_position_and_counters() {
    let torrent = metainfo(FakeTorrent::new("t"));
    let mut src = source("/d");
    src.total_uploaded = 1234;
    src.total_downloaded = 5678;
    src.seeding_time = 99;
    src.active_time = 120;
    src.paused = true;

    let record = FastresumeBuilder::default().build(
        &src,
        &torrent,
        BuildContext {
            now: NOW,
            queue_position: 7,
        },
    );

    assert_eq!(record.queue_position, 7);
    assert_eq!(record.total_uploaded, 1234);
    assert_eq!(record.total_downloaded, 5678);
    assert_eq!(record.seeding_time, 99);
    assert_eq!(record.active_time, 120);
    assert!(record.paused);
}

#[test]
fn test_built_record_decodes_as_bencode() {
    let torrent = metainfo(FakeTorrent::new("t").tracker("http://t.example/announce"));
    let mut src = source("/d");
    src.trackers = vec![TrackerState::enabled("http://t.example/announce")];
    let record = FastresumeBuilder::default().build(&src, &torrent, ctx());

    let bytes = record.to_bytes().unwrap();
    let value = decode(&bytes).unwrap();
    assert_eq!(encode(&value).unwrap(), bytes);
    assert_eq!(
        value.bytes(b"info-hash").map(|b| b.as_ref()),
        Some(&torrent.info_hash.as_bytes()[..])
    );
}
