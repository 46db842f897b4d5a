mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{parse_index_head, ContainerBuilder, DdicRecord, RawEntry};
use encoding_rs::UTF_16LE;
use ld2_reader::{convert, ConvertConfig, EncodingPair, Ld2Error, Ld2Reader};

fn entries() -> Vec<RawEntry> {
    vec![
        RawEntry::utf16le("one", "<![CDATA[zeta]]>"),
        RawEntry::utf16le("two", "<![CDATA[Alpha]]>"),
        RawEntry::utf16le("three", "").with_refs(&[0, 1]),
    ]
}

fn write_container(dir: &Path, data: &[u8]) -> PathBuf {
    let path = dir.join("sample.ld2");
    fs::write(&path, data).expect("write container");
    path
}

fn headwords(records: &[DdicRecord]) -> Vec<&str> {
    records.iter().map(|r| r.headword.as_str()).collect()
}

/// Overwrites the zlib header of the first deflate segment.
fn damage_streams(data: &[u8]) -> Vec<u8> {
    let reader = Ld2Reader::from_bytes(data.to_vec()).expect("reader");
    let mut damaged = data.to_vec();
    let start = reader.streams.data_offset;
    damaged[start] = 0xFF;
    damaged[start + 1] = 0xFF;
    damaged
}

#[test]
fn converts_a_container_end_to_end() {
    let work = tempfile::tempdir().expect("tempdir");
    let builder = ContainerBuilder::new(entries()).segments(2);
    let input = write_container(work.path(), &builder.build());
    let out = work.path().join("out");

    let report = convert(&input, &ConvertConfig::new("Sample", &out)).expect("convert");

    assert_eq!(report.header.magic_str(), "?LD2");
    assert_eq!(report.segments, 2);
    assert_eq!(report.zones.entry_count(), 3);
    assert_eq!(report.inflated_len, report.zones.inflated_len);
    assert_eq!(report.detection.encodings, EncodingPair::strict(UTF_16LE, UTF_16LE));
    assert!(!report.detection.fell_back);
    assert_eq!(report.output.entries, 3);
    assert_eq!(report.output.chunks, 1);
    assert_eq!(report.output.index_parts, 1);

    let index = fs::read(out.join("1.dd0")).expect("index");
    let (count, name, records) = parse_index_head(&index);
    assert_eq!(count, 3);
    assert_eq!(name, "Sample");
    assert_eq!(headwords(&records), vec!["three", "two", "one"]);
    assert_eq!(
        records.iter().map(|r| (r.offset, r.length)).collect::<Vec<_>>(),
        vec![(0, 37), (37, 31), (68, 30)]
    );

    let chunk = fs::read_to_string(out.join("1.ddf")).expect("chunk");
    assert!(chunk.starts_with("<html><body>Alpha, zeta</body></html>"));
    assert!(out.join("1.ddp").is_file());

    let inflated = report.inflated_path.expect("inflated path");
    assert_eq!(inflated, out.join("sample.ld2.inflated"));
    assert_eq!(fs::read(&inflated).expect("inflated"), builder.zones().concat());
    assert!(!report.reused_inflated);
}

#[test]
fn persisted_inflated_buffer_is_reused() {
    let work = tempfile::tempdir().expect("tempdir");
    let data = ContainerBuilder::new(entries()).build();
    let input = write_container(work.path(), &data);
    let out = work.path().join("out");

    convert(&input, &ConvertConfig::new("Sample", &out)).expect("first run");

    // The compressed data is no longer usable; only the artifact can serve the second run.
    fs::write(&input, damage_streams(&data)).expect("damage");

    let config = ConvertConfig::new("Sample", &out).with_reuse_inflated(true);
    let report = convert(&input, &config).expect("second run");
    assert!(report.reused_inflated);
    assert_eq!(report.output.entries, 3);

    let err = convert(&input, &ConvertConfig::new("Sample", &out)).expect_err("inflate again");
    assert!(matches!(err, Ld2Error::CorruptStream { .. }));
}

#[test]
fn inflated_buffer_of_the_wrong_size_is_ignored() {
    let work = tempfile::tempdir().expect("tempdir");
    let input = write_container(work.path(), &ContainerBuilder::new(entries()).build());
    let out = work.path().join("out");
    fs::create_dir_all(&out).expect("out dir");
    fs::write(out.join("sample.ld2.inflated"), b"stale").expect("stale artifact");

    let config = ConvertConfig::new("Sample", &out).with_reuse_inflated(true);
    let report = convert(&input, &config).expect("convert");
    assert!(!report.reused_inflated);
    assert_eq!(
        fs::read(out.join("sample.ld2.inflated")).expect("artifact").len(),
        report.zones.inflated_len
    );
}

#[test]
fn inflated_buffer_is_optional() {
    let work = tempfile::tempdir().expect("tempdir");
    let input = write_container(work.path(), &ContainerBuilder::new(entries()).build());
    let out = work.path().join("out");

    let config = ConvertConfig::new("Sample", &out).with_persist_inflated(false);
    let report = convert(&input, &config).expect("convert");
    assert!(report.inflated_path.is_none());
    assert!(!out.join("sample.ld2.inflated").exists());
    assert!(out.join("1.dd0").is_file());
}

#[test]
fn corrupt_container_leaves_no_dictionary_behind() {
    let work = tempfile::tempdir().expect("tempdir");
    let data = ContainerBuilder::new(entries()).build();
    let input = write_container(work.path(), &damage_streams(&data));
    let out = work.path().join("out");

    let err = convert(&input, &ConvertConfig::new("Sample", &out)).expect_err("corrupt");
    assert!(matches!(err, Ld2Error::CorruptStream { segment: 0, .. }));
    assert!(!out.join("1.dd0").exists());
    assert!(!out.join("1.ddf").exists());
}

#[test]
fn strict_detection_failure_writes_nothing() {
    let work = tempfile::tempdir().expect("tempdir");
    let data = ContainerBuilder::new(vec![RawEntry::utf8("cat", "<b>dogs</b>")]).build();
    let input = write_container(work.path(), &data);
    let out = work.path().join("out");

    let config = ConvertConfig::new("Sample", &out)
        .with_candidates(vec![UTF_16LE])
        .with_strict_encoding(true);
    let err = convert(&input, &config).expect_err("no encoding");
    assert!(matches!(err, Ld2Error::EncodingDetectionExhausted { .. }));
    assert!(!out.join("1.dd0").exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let work = tempfile::tempdir().expect("tempdir");
    let err = convert(
        work.path().join("absent.ld2"),
        &ConvertConfig::new("Sample", work.path()),
    )
    .expect_err("missing file");
    assert!(matches!(err, Ld2Error::Io(_)));
}

#[test]
fn invalid_configuration_is_rejected_before_reading() {
    let work = tempfile::tempdir().expect("tempdir");
    let config = ConvertConfig::new("Sample", work.path()).with_candidates(Vec::new());
    let err = convert(work.path().join("absent.ld2"), &config).expect_err("no candidates");
    assert!(matches!(err, Ld2Error::InvalidConfig(_)));
}
