use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use gobs::format::metrics_snapshot;
use gobs::{
    BincodeCodec, Error, FILE_HEADER_SIZE, FileHeader, Frame, GobsReader, GobsWriter, Options,
    PREFIX_SIZE, PayloadCodec,
};
use serde::{Deserialize, Serialize};

#[derive(Default)]
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;
        self.0 = self.0.wrapping_mul(A).wrapping_add(C);
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Reading {
    Temperature { sensor: String, celsius: f64 },
    Counter(u64),
    Tags(BTreeMap<String, Vec<u8>>),
}

fn readings() -> Vec<Reading> {
    vec![
        Reading::Temperature {
            sensor: "north".into(),
            celsius: 21.5,
        },
        Reading::Counter(u64::MAX),
        Reading::Tags(BTreeMap::from([
            ("a".into(), vec![1, 2, 3]),
            ("b".into(), Vec::new()),
        ])),
    ]
}

fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn reseal(file: &[u8], body: &[u8]) -> Vec<u8> {
    let header = FileHeader::from_bytes(file).unwrap().seal(body);
    let mut out = header.to_bytes().to_vec();
    out.extend_from_slice(body);
    out
}

#[test]
fn values_survive_a_file_roundtrip() {
    let before = now_seconds();
    let mut writer = GobsWriter::new(Options::new().with_version(3).unwrap());
    for reading in readings() {
        writer.push(&reading).unwrap();
    }
    let file = writer.finish();
    let after = now_seconds();

    let mut reader = GobsReader::open(file).unwrap();
    assert_eq!(reader.header().version(), 3);
    assert!(!reader.header().flags().is_encrypted());
    assert!(!reader.header().flags().is_compressed());

    let mut decoded = Vec::new();
    for frame in reader.by_ref() {
        let frame = frame.unwrap();
        let timestamp = frame.prefix().timestamp();
        assert!(before <= timestamp && timestamp <= after);
        decoded.push(frame.decode_value::<Reading, _>(&BincodeCodec).unwrap());
    }

    assert_eq!(decoded, readings());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn raw_and_typed_frames_interleave() {
    let mut writer = GobsWriter::default();
    writer.push_raw(Bytes::from_static(b"opaque")).unwrap();
    writer.push(&7u8).unwrap();
    writer.push_raw(Vec::new()).unwrap();
    let file = writer.finish();

    let frames: Vec<Frame> = GobsReader::open(file)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].payload().as_ref(), b"opaque");
    assert_eq!(frames[1].decode_value::<u8, _>(&BincodeCodec).unwrap(), 7);
    assert!(frames[2].payload().is_empty());
    assert_eq!(frames[2].prefix().checksum(), 0);
}

#[test]
fn flags_are_recorded_as_boolean_bytes() {
    let file = GobsWriter::new(Options::new().encrypted(true).compressed(true)).finish();
    assert_eq!(&file[12..14], &[0x01, 0x01]);

    let file = GobsWriter::new(Options::new()).finish();
    assert_eq!(&file[12..14], &[0x00, 0x00]);
}

#[test]
fn any_body_corruption_is_rejected_on_open() {
    let mut writer = GobsWriter::default();
    for reading in readings() {
        writer.push(&reading).unwrap();
    }
    let file = writer.finish().to_vec();

    let mut rng = Lcg(0x5EED);
    for _ in 0..64 {
        let offset = FILE_HEADER_SIZE + (rng.next() as usize % (file.len() - FILE_HEADER_SIZE));
        let flip = (rng.next() % 255 + 1) as u8;

        let mut corrupted = file.clone();
        corrupted[offset] ^= flip;

        let err = GobsReader::open(corrupted).unwrap_err();
        assert!(err.is_integrity(), "offset {offset}: {err}");
    }
}

#[test]
fn frame_corruption_is_caught_before_decode() {
    let mut writer = GobsWriter::default();
    writer.push(&readings()[0]).unwrap();
    writer.push(&readings()[1]).unwrap();
    let file = writer.finish();
    let failures_before = metrics_snapshot().checksum_failures;

    // Damage the second payload, then reseal the file so the body checksum passes.
    let mut body = file[FILE_HEADER_SIZE..].to_vec();
    let last = body.len() - 1;
    body[last] ^= 0x80;
    let file = reseal(&file, &body);

    let mut reader = GobsReader::open(file).unwrap();
    let first: Reading = reader.next_value().unwrap().unwrap();
    assert_eq!(first, readings()[0]);

    let err = reader.next_value::<Reading>().unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert!(reader.next().is_none());
    assert!(metrics_snapshot().checksum_failures > failures_before);
}

#[test]
fn trailing_partial_prefix_is_reported() {
    let mut writer = GobsWriter::default();
    writer.push_raw(Bytes::from_static(b"ok")).unwrap();
    let file = writer.finish();

    let mut body = file[FILE_HEADER_SIZE..].to_vec();
    body.extend_from_slice(&[0u8; PREFIX_SIZE - 1]);
    let file = reseal(&file, &body);

    let mut reader = GobsReader::open(file).unwrap();
    assert!(reader.next().unwrap().is_ok());
    assert!(matches!(
        reader.next(),
        Some(Err(Error::BufferTooSmall { needed, got })) if needed == PREFIX_SIZE && got == PREFIX_SIZE - 1
    ));
}

#[test]
fn damaged_size_field_reads_as_truncated_frame() {
    let mut writer = GobsWriter::default();
    writer.push_raw(vec![5u8; 8]).unwrap();
    let file = writer.finish();
    let truncated_before = metrics_snapshot().truncated_frames;

    let mut body = file[FILE_HEADER_SIZE..].to_vec();
    body[..4].copy_from_slice(&u32::MAX.to_le_bytes());
    let file = reseal(&file, &body);

    let mut reader = GobsReader::open(file).unwrap();
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        Error::TruncatedFrame { declared, available: 8 } if declared == u32::MAX as usize
    ));
    assert!(err.is_integrity());
    assert!(reader.next().is_none());
    assert!(metrics_snapshot().truncated_frames > truncated_before);
}

#[test]
fn type_mismatch_surfaces_decode_error() {
    let mut writer = GobsWriter::default();
    writer.push(&1u8).unwrap();
    let mut reader = GobsReader::open(writer.finish()).unwrap();

    let err = reader.next_value::<Reading>().unwrap_err();
    assert!(matches!(err, Error::Decode { codec: "bincode", .. }));
    assert!(!err.is_integrity());
}

#[test]
fn metrics_count_encoded_and_decoded_frames() {
    let before = metrics_snapshot();

    let mut writer = GobsWriter::default();
    writer.push_raw(vec![0u8; 100]).unwrap();
    let file = writer.finish();
    let frames: Vec<_> = GobsReader::open(file).unwrap().collect();
    assert_eq!(frames.len(), 1);

    let after = metrics_snapshot();
    assert!(after.frames_encoded > before.frames_encoded);
    assert!(after.frames_decoded > before.frames_decoded);
    assert!(after.bytes_encoded >= before.bytes_encoded + 100);
    assert!(after.prefix_builds > before.prefix_builds);
    assert!(after.avg_prefix_latency_us().is_some());
}

#[test]
fn codec_can_be_borrowed() {
    let codec = BincodeCodec;
    let mut writer = GobsWriter::with_codec(Options::default(), &codec);
    writer.push(&"borrowed").unwrap();
    assert_eq!(codec.name(), "bincode");

    let mut reader = GobsReader::open_with_codec(writer.finish(), &codec).unwrap();
    assert_eq!(reader.next_value::<String>().unwrap().as_deref(), Some("borrowed"));
}

#[cfg(feature = "json")]
#[test]
fn json_engine_swaps_in_without_touching_framing() {
    use gobs::JsonCodec;

    let mut writer = GobsWriter::with_codec(Options::default(), JsonCodec);
    writer.push(&readings()[1]).unwrap();
    let file = writer.finish();

    let payload_start = FILE_HEADER_SIZE + PREFIX_SIZE;
    assert_eq!(&file[payload_start..], br#"{"Counter":18446744073709551615}"#);

    let mut reader = GobsReader::open_with_codec(file, JsonCodec).unwrap();
    assert_eq!(reader.next_value::<Reading>().unwrap(), Some(readings()[1].clone()));
}
