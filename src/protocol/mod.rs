//! Kafka-style binary wire protocol.
//!
//! Frame: int32 (BE) length + body.
//! Request: header (api_key, api_version, correlation_id, client_id, tag buffer) + body.
//! Supports: ApiVersions (18), Fetch (1, envelope only), DescribeCluster (60),
//! DescribeTopicPartitions (75).

pub mod codec;
mod dispatch;
pub mod registry;
mod request;
mod response;

pub use codec::ResponseBuilder;
pub use dispatch::{frame_len, handle_request};
pub use registry::{supported_apis, ApiKey, ApiVersion};
pub use request::{
    parse_describe_topic_partitions, parse_fetch, parse_header, DescribeTopicPartitionsRequest,
    DescribeTopicRequest, FetchRequest, RequestHeader,
};
pub use response::{
    build_api_versions_response, build_describe_cluster_response,
    build_describe_topic_partitions_response, build_fetch_response, build_minimal_response,
};
