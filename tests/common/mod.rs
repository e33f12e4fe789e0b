//! Helpers shared by the integration tests.

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use swiftqueue::metadata::{encode_metadata_log, MetadataRecord, METADATA_LOG_FILE};
use swiftqueue::{Partition, ServerConfig, Topic};
use tempfile::TempDir;
use uuid::Uuid;

/// Frame a request: size prefix, header v2 (with tag buffer), then `body`.
pub fn request_bytes(
    api_key: i16,
    api_version: i16,
    correlation_id: i32,
    client_id: Option<&str>,
    body: &[u8],
) -> Vec<u8> {
    let mut inner = BytesMut::new();
    inner.put_i16(api_key);
    inner.put_i16(api_version);
    inner.put_i32(correlation_id);
    match client_id {
        Some(id) => {
            inner.put_i16(id.len() as i16);
            inner.put_slice(id.as_bytes());
        }
        None => inner.put_i16(-1),
    }
    inner.put_u8(0);
    inner.put_slice(body);

    let mut out = BytesMut::new();
    out.put_i32(inner.len() as i32);
    out.extend_from_slice(&inner);
    out.to_vec()
}

/// DescribeTopicPartitions body: compact topic array, partition limit, null cursor.
pub fn describe_topics_body(topics: &[&str]) -> Vec<u8> {
    let mut body = BytesMut::new();
    body.put_u8(topics.len() as u8 + 1);
    for name in topics {
        body.put_u8(name.len() as u8 + 1);
        body.put_slice(name.as_bytes());
        body.put_u8(0);
    }
    body.put_i32(100); // response partition limit
    body.put_u8(0xff); // cursor
    body.put_u8(0);
    body.to_vec()
}

pub fn fetch_body(session_id: i32) -> Vec<u8> {
    let mut body = BytesMut::new();
    body.put_i32(500); // max_wait_ms
    body.put_i32(1); // min_bytes
    body.put_i32(52_428_800); // max_bytes
    body.put_u8(0); // isolation level
    body.put_i32(session_id);
    body.put_i32(0); // session epoch
    body.put_u8(1); // topics (empty)
    body.put_u8(1); // forgotten topics (empty)
    body.put_u8(1); // rack id (empty)
    body.put_u8(0);
    body.to_vec()
}

pub fn uuid(n: u8) -> Uuid {
    Uuid::from_bytes([
        0, 0, 0, 0, 0, 0, 0x40, 0, 0x80, 0, 0, 0, 0, 0, 0, n,
    ])
}

/// A log with a feature-level record, two topics and three partitions split
/// across two batches.
pub fn sample_records() -> Vec<Vec<MetadataRecord>> {
    let foo = Topic::new("foo", uuid(1));
    let bar = Topic::new("bar", uuid(2));
    vec![
        vec![MetadataRecord::Other {
            record_type: 12,
            payload: b"\x11metadata.version\x00\x14".to_vec(),
        }],
        vec![
            MetadataRecord::Topic(foo.clone()),
            MetadataRecord::Partition(Partition::new(0, foo.uuid, 1, 0)),
            MetadataRecord::Partition(Partition::new(1, foo.uuid, 1, 3)),
            MetadataRecord::Topic(bar.clone()),
            MetadataRecord::Partition(Partition::new(0, bar.uuid, 2, 0)),
        ],
    ]
}

/// Temporary metadata log directory seeded with `batches`, and a config
/// pointing at it.
pub fn seeded_log_dir(batches: &[Vec<MetadataRecord>]) -> (TempDir, ServerConfig) {
    let dir = tempfile::tempdir().unwrap();
    let log = encode_metadata_log(batches).unwrap();
    std::fs::write(dir.path().join(METADATA_LOG_FILE), &log).unwrap();
    let config = ServerConfig {
        log_directory: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    (dir, config)
}

pub fn read_i16(buf: &[u8], at: usize) -> i16 {
    i16::from_be_bytes([buf[at], buf[at + 1]])
}

pub fn read_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

pub fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
