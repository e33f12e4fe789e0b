//! Response encoding. Every builder writes `correlation_id` first and finishes
//! with the 4-byte size prefix.

use super::codec::{ResponseBuilder, UUID_SIZE};
use super::registry::{
    supported_apis, version_error_code, ApiKey, CURSOR_NO_MORE_DATA, ELIGIBLE_LEADER_REPLICAS,
    ERROR_NONE, ERROR_UNKNOWN_TOPIC_OR_PARTITION, LAST_KNOWN_ISR, PARTITION_UNUSED_OPERATIONS,
    TOPIC_AUTHORIZED_OPERATIONS,
};
use super::request::{
    DescribeTopicPartitionsRequest, DescribeTopicRequest, FetchRequest, RequestHeader,
};
use crate::types::{ClusterMetadata, Partition, Topic};
use bytes::Bytes;

/// ApiVersions response. The error code reflects whether `api_version` lies in
/// `[min_supported, max_supported]`; the full API table is written either way.
pub fn build_api_versions_response(
    correlation_id: i32,
    api_version: i16,
    min_supported: i16,
    max_supported: i16,
) -> Bytes {
    let mut rb = ResponseBuilder::new();
    rb.put_i32(correlation_id);
    rb.put_i16(version_error_code(api_version, min_supported, max_supported));

    let apis = supported_apis();
    rb.put_compact_array_len(apis.len());
    for api in apis {
        rb.put_i16(api.api_key);
        rb.put_i16(api.min_version);
        rb.put_i16(api.max_version);
        rb.put_tag_buffer();
    }
    rb.put_i32(0); // throttle_time_ms
    rb.put_tag_buffer();

    rb.prepend_message_size();
    rb.finish()
}

/// DescribeCluster is answered with the ApiVersions-shaped envelope, gated on
/// the DescribeCluster version range.
pub fn build_describe_cluster_response(correlation_id: i32, api_version: i16) -> Bytes {
    let (min, max) = ApiKey::DescribeCluster.version_range();
    build_api_versions_response(correlation_id, api_version, min, max)
}

/// DescribeTopicPartitions response. The topic array length is copied from the
/// request, so every requested topic gets an entry, resolved or not.
pub fn build_describe_topic_partitions_response(
    request: &DescribeTopicPartitionsRequest,
    metadata: &ClusterMetadata,
) -> Bytes {
    let mut rb = ResponseBuilder::new();
    rb.put_i32(request.header.correlation_id);
    rb.put_tag_buffer();
    rb.put_i32(0); // throttle_time_ms

    rb.put_u8(request.topic_array_length);
    for requested in &request.topics {
        match metadata.find_topic(&requested.topic_name) {
            Some(topic) => write_topic(&mut rb, requested, topic, metadata),
            None => write_unknown_topic(&mut rb, requested),
        }
    }

    rb.put_u8(CURSOR_NO_MORE_DATA);
    rb.put_tag_buffer();

    rb.prepend_message_size();
    rb.finish()
}

fn write_topic_name(rb: &mut ResponseBuilder, requested: &DescribeTopicRequest) {
    rb.put_u8(requested.topic_name_length);
    rb.put_slice(&requested.topic_name);
}

fn write_topic(
    rb: &mut ResponseBuilder,
    requested: &DescribeTopicRequest,
    topic: &Topic,
    metadata: &ClusterMetadata,
) {
    rb.put_i16(ERROR_NONE);
    write_topic_name(rb, requested);
    rb.put_slice(topic.uuid.as_bytes());
    rb.put_u8(PARTITION_UNUSED_OPERATIONS);

    let partitions: Vec<&Partition> = metadata.partitions_for(topic.uuid).collect();
    rb.put_compact_array_len(partitions.len());
    for partition in partitions {
        write_partition(rb, partition);
    }

    rb.put_u32(TOPIC_AUTHORIZED_OPERATIONS);
    rb.put_tag_buffer();
}

fn write_unknown_topic(rb: &mut ResponseBuilder, requested: &DescribeTopicRequest) {
    rb.put_i16(ERROR_UNKNOWN_TOPIC_OR_PARTITION);
    write_topic_name(rb, requested);
    rb.put_slice(&[0u8; UUID_SIZE]);
    rb.put_u8(PARTITION_UNUSED_OPERATIONS);
    // one tagged field follows, unlike the resolved-topic path
    rb.put_u8(1);
    rb.put_u32(TOPIC_AUTHORIZED_OPERATIONS);
    rb.put_tag_buffer();
}

fn write_partition(rb: &mut ResponseBuilder, partition: &Partition) {
    rb.put_i16(ERROR_NONE);
    rb.put_u32(partition.id);
    rb.put_u32(partition.leader_id);
    rb.put_u32(partition.leader_epoch);
    rb.put_u8(partition.replica_length);
    rb.put_u32(partition.replica_id);
    rb.put_u8(partition.isr_length);
    rb.put_u32(partition.isr_id);
    rb.put_u8(ELIGIBLE_LEADER_REPLICAS);
    rb.put_u8(LAST_KNOWN_ISR);
    rb.put_u8(LAST_KNOWN_ISR);
    rb.put_tag_buffer();
}

/// Fetch response envelope. No record data is returned: the body is throttle
/// time, the echoed session id and an empty responses array.
pub fn build_fetch_response(header: &RequestHeader, request: &FetchRequest) -> Bytes {
    let (min, max) = ApiKey::Fetch.version_range();
    let mut rb = ResponseBuilder::new();
    rb.put_i32(header.correlation_id);
    rb.put_i16(version_error_code(header.api_version, min, max));
    rb.put_i32(0); // throttle_time_ms
    rb.put_tag_buffer();
    rb.put_i32(request.session_id);
    rb.put_compact_array_len(0); // responses
    rb.put_i32(0); // reserved

    rb.prepend_message_size();
    rb.finish()
}

/// Four zero bytes: the frame returned for API keys this server does not know.
pub fn build_minimal_response() -> Bytes {
    Bytes::from_static(&[0, 0, 0, 0])
}
