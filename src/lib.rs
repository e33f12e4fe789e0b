//! SwiftQueue: a Kafka-style wire protocol server that answers ApiVersions,
//! DescribeTopicPartitions, DescribeCluster and (envelope-only) Fetch requests
//! from a KRaft cluster metadata log.

pub mod config;
pub mod error;
pub mod metadata;
pub mod observability;
pub mod protocol;
pub mod server;
pub mod types;

pub use config::ServerConfig;
pub use error::{Result, SwiftQueueError};
pub use metadata::{parse_metadata_log, LogReader, MetadataService};
pub use protocol::{handle_request, ApiKey};
pub use types::{ClusterMetadata, Partition, Topic};
