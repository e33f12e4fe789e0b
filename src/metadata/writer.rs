//! Encodes topic and partition records into metadata log batches in the layout
//! [`parse_metadata_log`](super::parse_metadata_log) reads. Used to seed log
//! directories.

use super::parser::{RECORD_BATCH_OVERHEAD, RECORD_TYPE_PARTITION, RECORD_TYPE_TOPIC};
use crate::error::{Result, SwiftQueueError};
use crate::protocol::codec::{put_compact_string, put_varint16, zigzag_encode16, zigzag_encode8};
use crate::types::{Partition, Topic};
use bytes::{BufMut, Bytes, BytesMut};

const RECORD_BATCH_MAGIC: i8 = 2;
const FRAME_VERSION: u8 = 1;
/// Zigzag of -1: a null key.
const NULL_KEY: u8 = 0x01;
/// Largest length whose zigzag fits a single varint byte.
const MAX_FIRST_RECORD_LEN: usize = 63;
const MAX_RECORD_LEN: usize = i16::MAX as usize >> 1;

/// One metadata log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataRecord {
    Topic(Topic),
    Partition(Partition),
    /// Any other record type; the payload is opaque.
    Other { record_type: u8, payload: Vec<u8> },
}

impl MetadataRecord {
    fn record_type(&self) -> u8 {
        match self {
            MetadataRecord::Topic(_) => RECORD_TYPE_TOPIC,
            MetadataRecord::Partition(_) => RECORD_TYPE_PARTITION,
            MetadataRecord::Other { record_type, .. } => *record_type,
        }
    }

    fn encode_value(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(FRAME_VERSION);
        buf.put_u8(self.record_type());
        buf.put_u8(0); // record version
        match self {
            MetadataRecord::Topic(topic) => {
                put_compact_string(&mut buf, &topic.name);
                buf.put_slice(topic.uuid.as_bytes());
            }
            MetadataRecord::Partition(p) => {
                buf.put_u32(p.id);
                buf.put_slice(p.topic_uuid.as_bytes());
                buf.put_u8(p.replica_length);
                buf.put_u32(p.replica_id);
                buf.put_u8(p.isr_length);
                buf.put_u32(p.isr_id);
                buf.put_u8(p.removing_replica_length);
                buf.put_u8(p.adding_replica_length);
                buf.put_u32(p.leader_id);
                buf.put_u32(p.leader_epoch);
                buf.put_u32(0); // partition epoch
                buf.put_u8(1); // directories (empty)
            }
            MetadataRecord::Other { payload, .. } => buf.put_slice(payload),
        }
        buf.put_u8(0); // tagged fields
        buf
    }
}

fn put_length(dst: &mut BytesMut, len: usize, first: bool) -> Result<()> {
    let limit = if first {
        MAX_FIRST_RECORD_LEN
    } else {
        MAX_RECORD_LEN
    };
    if len > limit {
        return Err(SwiftQueueError::Malformed(format!(
            "record field length {} exceeds {}",
            len, limit
        )));
    }
    let encoded = zigzag_encode16(len as i16);
    if first {
        dst.put_u8(encoded as u8);
    } else {
        put_varint16(dst, encoded);
    }
    Ok(())
}

fn encode_record(index: usize, record: &MetadataRecord) -> Result<BytesMut> {
    let first = index == 0;
    let value = record.encode_value();

    let mut body = BytesMut::new();
    body.put_u8(0); // attributes
    body.put_u8(0); // timestamp delta
    body.put_u8(zigzag_encode8(index.min(63) as i8));
    body.put_u8(NULL_KEY);
    put_length(&mut body, value.len(), first)?;
    body.extend_from_slice(&value);
    body.put_u8(0); // headers count

    let mut out = BytesMut::new();
    put_length(&mut out, body.len(), first)?;
    out.extend_from_slice(&body);
    Ok(out)
}

/// Encode one record batch starting at `base_offset`.
pub fn encode_record_batch(base_offset: i64, records: &[MetadataRecord]) -> Result<Bytes> {
    let mut section = BytesMut::new();
    section.put_u32(records.len() as u32);
    for (i, record) in records.iter().enumerate() {
        let encoded = encode_record(i, record)?;
        section.extend_from_slice(&encoded);
    }

    let mut buf = BytesMut::with_capacity(12 + RECORD_BATCH_OVERHEAD + section.len());
    buf.put_i64(base_offset);
    buf.put_i32((RECORD_BATCH_OVERHEAD + section.len()) as i32);
    buf.put_i32(0); // partition leader epoch
    buf.put_i8(RECORD_BATCH_MAGIC);
    buf.put_u32(0); // crc, not verified by the reader
    buf.put_i16(0); // attributes
    buf.put_i32(records.len().saturating_sub(1) as i32); // last offset delta
    buf.put_i64(0); // base timestamp
    buf.put_i64(0); // max timestamp
    buf.put_i64(-1); // producer id
    buf.put_i16(-1); // producer epoch
    buf.put_i32(-1); // base sequence
    buf.extend_from_slice(&section);
    Ok(buf.freeze())
}

/// Encode a whole log: one batch per slice in `batches`, with consecutive base
/// offsets.
pub fn encode_metadata_log(batches: &[Vec<MetadataRecord>]) -> Result<Bytes> {
    let mut log = BytesMut::new();
    let mut base_offset = 0i64;
    for records in batches {
        log.extend_from_slice(&encode_record_batch(base_offset, records)?);
        base_offset += records.len() as i64;
    }
    Ok(log.freeze())
}
