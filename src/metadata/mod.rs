//! Cluster metadata: the on-disk log, its parser, and the per-request service.

mod log_reader;
mod parser;
mod writer;

pub use log_reader::{LogEntry, LogReader, METADATA_LOG_FILE};
pub use parser::parse_metadata_log;
pub use writer::{encode_metadata_log, encode_record_batch, MetadataRecord};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::types::ClusterMetadata;
use tracing::{debug, warn};

/// Loads topics and partitions from the metadata log. Nothing is cached: each
/// call re-reads and re-parses the file.
#[derive(Debug, Clone)]
pub struct MetadataService {
    reader: LogReader,
}

impl MetadataService {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            reader: LogReader::new(&config.log_directory)?,
        })
    }

    pub fn topics_and_partitions(&self) -> Result<ClusterMetadata> {
        let data = self.reader.read_metadata_log()?;
        let metadata = parse_metadata_log(&data);
        debug!(
            bytes = data.len(),
            topics = metadata.topics.len(),
            partitions = metadata.partitions.len(),
            "parsed metadata log"
        );
        if !metadata.complete {
            warn!(
                dir = %self.reader.log_directory().display(),
                "metadata log ended mid-batch; returning partial metadata"
            );
        }
        Ok(metadata)
    }
}
