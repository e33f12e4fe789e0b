//! Routes one buffered request to its parser and response builder.

use super::registry::ApiKey;
use super::request::{parse_describe_topic_partitions, parse_fetch, parse_header};
use super::response::{
    build_api_versions_response, build_describe_cluster_response,
    build_describe_topic_partitions_response, build_fetch_response, build_minimal_response,
};
use crate::config::ServerConfig;
use crate::error::{Result, SwiftQueueError};
use crate::metadata::MetadataService;
use crate::types::ClusterMetadata;
use bytes::Bytes;
use tracing::{debug, warn};

/// Largest frame accepted from a client.
pub const MAX_FRAME_LEN: usize = 100 * 1024 * 1024;

/// Total length (size prefix included) of the first frame in `buf`, or `None`
/// if it has not fully arrived.
pub fn frame_len(buf: &[u8]) -> Result<Option<usize>> {
    if buf.len() < 4 {
        return Ok(None);
    }
    let size = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if size < 0 || size as usize > MAX_FRAME_LEN {
        return Err(SwiftQueueError::Malformed(format!(
            "invalid frame size {}",
            size
        )));
    }
    let total = 4 + size as usize;
    Ok((buf.len() >= total).then_some(total))
}

/// Handle one complete request and return the framed response.
///
/// Framing errors are returned; protocol errors (unsupported version, unknown
/// topic) are encoded in the response.
pub fn handle_request(config: &ServerConfig, raw: &[u8]) -> Result<Bytes> {
    let header = parse_header(raw)?;
    debug!(
        api_key = header.api_key,
        version = header.api_version,
        correlation_id = header.correlation_id,
        client_id = header.client_id.as_deref().unwrap_or(""),
        "request"
    );

    let api_key = match ApiKey::try_from(header.api_key) {
        Ok(key) => key,
        Err(_) => {
            warn!(api_key = header.api_key, "unsupported api key");
            return Ok(build_minimal_response());
        }
    };

    let response = match api_key {
        ApiKey::ApiVersions => {
            let (min, max) = ApiKey::ApiVersions.version_range();
            build_api_versions_response(header.correlation_id, header.api_version, min, max)
        }
        ApiKey::DescribeCluster => {
            build_describe_cluster_response(header.correlation_id, header.api_version)
        }
        ApiKey::Fetch => {
            let request = parse_fetch(&header.body)?;
            build_fetch_response(&header, &request)
        }
        ApiKey::DescribeTopicPartitions => {
            let request = parse_describe_topic_partitions(header, raw)?;
            let metadata = match MetadataService::new(config)
                .and_then(|service| service.topics_and_partitions())
            {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(
                        dir = %config.log_directory.display(),
                        "metadata log unavailable, reporting topics as unknown: {}",
                        e
                    );
                    ClusterMetadata::default()
                }
            };
            build_describe_topic_partitions_response(&request, &metadata)
        }
    };
    Ok(response)
}
