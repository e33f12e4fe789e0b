//! Supported API keys, their version ranges, and protocol error codes.

use crate::error::SwiftQueueError;

pub const API_FETCH: i16 = 1;
pub const API_API_VERSIONS: i16 = 18;
pub const API_DESCRIBE_CLUSTER: i16 = 60;
pub const API_DESCRIBE_TOPIC_PARTITIONS: i16 = 75;

pub const ERROR_NONE: i16 = 0;
pub const ERROR_UNKNOWN_TOPIC_OR_PARTITION: i16 = 3;
pub const ERROR_UNSUPPORTED_VERSION: i16 = 35;

/// Cursor byte meaning "no further pages".
pub const CURSOR_NO_MORE_DATA: u8 = 0xFF;
pub const TOPIC_AUTHORIZED_OPERATIONS: u32 = 0x0DF8;
pub const PARTITION_UNUSED_OPERATIONS: u8 = 0;
pub const ELIGIBLE_LEADER_REPLICAS: u8 = 1;
pub const LAST_KNOWN_ISR: u8 = 1;

/// API keys this server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKey {
    Fetch,
    ApiVersions,
    DescribeCluster,
    DescribeTopicPartitions,
}

impl ApiKey {
    pub fn code(self) -> i16 {
        match self {
            ApiKey::Fetch => API_FETCH,
            ApiKey::ApiVersions => API_API_VERSIONS,
            ApiKey::DescribeCluster => API_DESCRIBE_CLUSTER,
            ApiKey::DescribeTopicPartitions => API_DESCRIBE_TOPIC_PARTITIONS,
        }
    }

    /// Inclusive `(min, max)` version range advertised for this key.
    pub fn version_range(self) -> (i16, i16) {
        match self {
            ApiKey::Fetch => (0, 16),
            ApiKey::ApiVersions => (0, 4),
            ApiKey::DescribeCluster => (0, 0),
            ApiKey::DescribeTopicPartitions => (0, 17),
        }
    }

    pub fn supports(self, version: i16) -> bool {
        let (min, max) = self.version_range();
        (min..=max).contains(&version)
    }
}

impl TryFrom<i16> for ApiKey {
    type Error = SwiftQueueError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            API_FETCH => Ok(ApiKey::Fetch),
            API_API_VERSIONS => Ok(ApiKey::ApiVersions),
            API_DESCRIBE_CLUSTER => Ok(ApiKey::DescribeCluster),
            API_DESCRIBE_TOPIC_PARTITIONS => Ok(ApiKey::DescribeTopicPartitions),
            other => Err(SwiftQueueError::UnsupportedApiKey(other)),
        }
    }
}

/// One row of the ApiVersions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
}

const SUPPORTED_APIS: [ApiKey; 4] = [
    ApiKey::DescribeTopicPartitions,
    ApiKey::ApiVersions,
    ApiKey::DescribeCluster,
    ApiKey::Fetch,
];

/// The advertised table, in wire order.
pub fn supported_apis() -> impl ExactSizeIterator<Item = ApiVersion> {
    SUPPORTED_APIS.iter().map(|key| {
        let (min_version, max_version) = key.version_range();
        ApiVersion {
            api_key: key.code(),
            min_version,
            max_version,
        }
    })
}

/// Error code for a request at `version` against an inclusive range.
pub fn version_error_code(version: i16, min: i16, max: i16) -> i16 {
    if version < min || version > max {
        ERROR_UNSUPPORTED_VERSION
    } else {
        ERROR_NONE
    }
}
