//! Request decoding: the common header, then per-API bodies.
//!
//! Header layout (all big-endian):
//! `message_size:i32 | api_key:i16 | api_version:i16 | correlation_id:i32 |
//! client_id_len:i16 [+ bytes] | tag_buffer:u8 | body`.

use crate::error::{Result, SwiftQueueError};
use bytes::{Buf, Bytes};

const FETCH_BODY_LEN: usize = 21;

/// Header fields shared by every request. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub message_size: i32,
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    /// Raw client id length as sent; zero or negative means absent.
    pub client_id_length: i16,
    /// `None` when the wire length is zero or negative. Invalid UTF-8 is
    /// replaced, since the id is only ever logged.
    pub client_id: Option<String>,
    /// Bytes after the header, up to the declared end of the frame.
    pub body: Bytes,
}

impl RequestHeader {
    /// Bytes consumed by the header, size prefix included.
    pub fn header_len(&self) -> usize {
        let client_id_len = self.client_id_length.max(0) as usize;
        4 + 2 + 2 + 4 + 2 + client_id_len + 1
    }
}

/// One topic named in a DescribeTopicPartitions request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeTopicRequest {
    /// Name bytes as sent, echoed back unchanged.
    pub topic_name: Bytes,
    /// Compact length exactly as it appeared on the wire (name length + 1).
    pub topic_name_length: u8,
}

/// A DescribeTopicPartitions request: the header plus the requested topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeTopicPartitionsRequest {
    pub header: RequestHeader,
    /// Raw compact array length (topic count + 1). Echoed in the response.
    pub topic_array_length: u8,
    pub topics: Vec<DescribeTopicRequest>,
}

/// Fixed-offset subset of a Fetch request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub max_wait_ms: i32,
    pub min_bytes: i32,
    pub max_bytes: i32,
    pub isolation_level: u8,
    pub session_id: i32,
    pub session_epoch: i32,
}

fn ensure(src: &[u8], n: usize, what: &str) -> Result<()> {
    if src.remaining() < n {
        return Err(SwiftQueueError::Truncated(format!(
            "cannot read {}: need {} bytes, have {}",
            what,
            n,
            src.remaining()
        )));
    }
    Ok(())
}

/// Parse the common request header from one buffered request.
pub fn parse_header(data: &[u8]) -> Result<RequestHeader> {
    let mut src = data;
    ensure(src, 4, "message size")?;
    let message_size = src.get_i32();
    if message_size < 0 {
        return Err(SwiftQueueError::Malformed(format!(
            "negative message size {}",
            message_size
        )));
    }
    let frame_len = message_size as usize;
    if src.remaining() < frame_len {
        return Err(SwiftQueueError::Truncated(format!(
            "incomplete request: expected {} bytes, got {}",
            frame_len + 4,
            data.len()
        )));
    }
    let mut src = &src[..frame_len];

    ensure(src, 2, "api key")?;
    let api_key = src.get_i16();
    ensure(src, 2, "api version")?;
    let api_version = src.get_i16();
    ensure(src, 4, "correlation id")?;
    let correlation_id = src.get_i32();
    ensure(src, 2, "client id length")?;
    let client_id_length = src.get_i16();
    let client_id = if client_id_length > 0 {
        let len = client_id_length as usize;
        ensure(src, len, "client id")?;
        let id = String::from_utf8_lossy(&src[..len]).into_owned();
        src.advance(len);
        Some(id)
    } else {
        None
    };
    ensure(src, 1, "tagged fields")?;
    src.advance(1);

    Ok(RequestHeader {
        message_size,
        api_key,
        api_version,
        correlation_id,
        client_id_length,
        client_id,
        body: Bytes::copy_from_slice(src),
    })
}

/// Parse the topic list of a DescribeTopicPartitions request. `raw` is the same
/// buffer the header was parsed from.
///
/// An array length byte of 0 or 1 yields no topics; `n + 1` yields `n`.
pub fn parse_describe_topic_partitions(
    header: RequestHeader,
    raw: &[u8],
) -> Result<DescribeTopicPartitionsRequest> {
    let offset = header.header_len();
    if raw.len() < offset {
        return Err(SwiftQueueError::Truncated(
            "request shorter than its header".into(),
        ));
    }
    let mut src = &raw[offset..];

    ensure(src, 1, "topic array length")?;
    let topic_array_length = src.get_u8();
    let count = topic_array_length.saturating_sub(1) as usize;

    let mut topics = Vec::with_capacity(count);
    for _ in 0..count {
        ensure(src, 1, "topic name length")?;
        let topic_name_length = src.get_u8();
        if topic_name_length == 0 {
            return Err(SwiftQueueError::Malformed("null topic name".into()));
        }
        let len = topic_name_length as usize - 1;
        ensure(src, len, "topic name")?;
        let topic_name = Bytes::copy_from_slice(&src[..len]);
        src.advance(len);
        ensure(src, 1, "topic tag buffer")?;
        src.advance(1);
        topics.push(DescribeTopicRequest {
            topic_name,
            topic_name_length,
        });
    }

    Ok(DescribeTopicPartitionsRequest {
        header,
        topic_array_length,
        topics,
    })
}

/// Parse the fixed-offset Fetch fields from the body following the header.
pub fn parse_fetch(body: &[u8]) -> Result<FetchRequest> {
    let mut src = body;
    ensure(src, FETCH_BODY_LEN, "fetch body")?;
    Ok(FetchRequest {
        max_wait_ms: src.get_i32(),
        min_bytes: src.get_i32(),
        max_bytes: src.get_i32(),
        isolation_level: src.get_u8(),
        session_id: src.get_i32(),
        session_epoch: src.get_i32(),
    })
}
