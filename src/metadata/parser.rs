//! Lenient parser for the cluster metadata log.
//!
//! The log is a sequence of record batches:
//! `base_offset:i64 | batch_length:i32 | 45 bytes of producer/batch fields |
//! record_count:i32 | records...`.
//!
//! Each record is `length | attributes | timestamp_delta | offset_delta |
//! key_length [+ key] | value_length | frame_version | type | version | payload`.
//! The length and value-length varints are one byte wide for the first record
//! of a batch and two bytes wide for every record after it.
//!
//! Any field that would run past the batch stops that batch; whatever was read
//! before is kept and [`ClusterMetadata::complete`] is cleared.

use crate::protocol::codec::{varint16, zigzag_decode16, zigzag_decode8, UUID_SIZE};
use crate::types::{ClusterMetadata, Partition, Topic};
use uuid::Uuid;

pub const BATCH_HEADER_SIZE: usize = 12;
pub const BATCH_LENGTH_OFFSET: usize = 8;
pub const RECORD_BATCH_OVERHEAD: usize = 45;

pub const RECORD_TYPE_TOPIC: u8 = 2;
pub const RECORD_TYPE_PARTITION: u8 = 3;

/// A read ran past the end of the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Exhausted;

type Parse<T> = std::result::Result<T, Exhausted>;

struct RecordCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Parse<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Exhausted)?;
        if end > self.buf.len() {
            return Err(Exhausted);
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn skip(&mut self, n: usize) -> Parse<()> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Parse<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Parse<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn uuid(&mut self) -> Parse<Uuid> {
        let b = self.take(UUID_SIZE)?;
        let mut raw = [0u8; UUID_SIZE];
        raw.copy_from_slice(b);
        Ok(Uuid::from_bytes(raw))
    }

    /// Zigzag length of `width` bytes (1 or 2). Negative lengths are treated
    /// as running off the batch.
    fn length(&mut self, width: usize) -> Parse<usize> {
        let v = if width == 1 {
            zigzag_decode8(self.u8()?) as i16
        } else {
            let b = self.take(2)?;
            zigzag_decode16(varint16(b[0], b[1]))
        };
        usize::try_from(v).map_err(|_| Exhausted)
    }
}

/// Parse every batch in `data` into topics and partitions. Never fails.
pub fn parse_metadata_log(data: &[u8]) -> ClusterMetadata {
    let mut metadata = ClusterMetadata {
        complete: true,
        ..ClusterMetadata::default()
    };
    let mut offset = 0usize;

    while offset < data.len() {
        if offset + BATCH_HEADER_SIZE > data.len() {
            metadata.complete = false;
            break;
        }
        let len_at = offset + BATCH_LENGTH_OFFSET;
        let batch_length = u32::from_be_bytes([
            data[len_at],
            data[len_at + 1],
            data[len_at + 2],
            data[len_at + 3],
        ]) as usize;
        let batch_end = offset
            .saturating_add(BATCH_HEADER_SIZE)
            .saturating_add(batch_length);
        let section_end = batch_end.min(data.len());
        let records_start = offset + BATCH_HEADER_SIZE + RECORD_BATCH_OVERHEAD;

        if batch_end > data.len() {
            metadata.complete = false;
        }
        if records_start > section_end {
            metadata.complete = false;
            break;
        }
        if parse_record_section(&data[records_start..section_end], &mut metadata).is_err() {
            metadata.complete = false;
        }
        offset = batch_end;
    }

    metadata
}

fn parse_record_section(section: &[u8], out: &mut ClusterMetadata) -> Parse<()> {
    let mut cur = RecordCursor::new(section);
    let record_count = cur.u32()?;
    let mut record_start = cur.pos;

    for i in 0..record_count {
        let width = if i == 0 { 1 } else { 2 };
        cur.pos = record_start;
        let record_len = cur.length(width)?;
        record_start = record_start + width + record_len;

        cur.skip(3)?; // attributes, timestamp delta, offset delta
        let key_len = cur.u8()? as usize;
        if key_len > 1 {
            cur.skip(key_len - 1)?;
        }
        let value_len = cur.length(width)?;
        cur.skip(1)?; // frame version
        let record_type = cur.u8()?;
        cur.skip(1)?; // record version

        match record_type {
            RECORD_TYPE_TOPIC => out.topics.push(parse_topic_record(&mut cur)?),
            RECORD_TYPE_PARTITION => out.partitions.push(parse_partition_record(&mut cur)?),
            _ => cur.skip(value_len.saturating_sub(3))?,
        }
    }
    Ok(())
}

fn parse_topic_record(cur: &mut RecordCursor<'_>) -> Parse<Topic> {
    let name_len = cur.u8()? as usize;
    let name = cur.take(name_len.saturating_sub(1))?;
    let uuid = cur.uuid()?;
    Ok(Topic {
        name: String::from_utf8_lossy(name).into_owned(),
        uuid,
    })
}

fn parse_partition_record(cur: &mut RecordCursor<'_>) -> Parse<Partition> {
    let id = cur.u32()?;
    let topic_uuid = cur.uuid()?;
    let replica_length = cur.u8()?;
    let replica_id = cur.u32()?;
    let isr_length = cur.u8()?;
    let isr_id = cur.u32()?;
    let removing_replica_length = cur.u8()?;
    let adding_replica_length = cur.u8()?;
    let leader_id = cur.u32()?;
    let leader_epoch = cur.u32()?;
    Ok(Partition {
        id,
        topic_uuid,
        replica_length,
        replica_id,
        isr_length,
        isr_id,
        removing_replica_length,
        adding_replica_length,
        leader_id,
        leader_epoch,
    })
}
