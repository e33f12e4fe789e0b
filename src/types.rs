//! Cluster metadata entities rebuilt from the metadata log on every query.

use uuid::Uuid;

/// Topic record: name plus its 16-byte identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub uuid: Uuid,
}

impl Topic {
    pub fn new(name: impl Into<String>, uuid: Uuid) -> Self {
        Self {
            name: name.into(),
            uuid,
        }
    }

    /// Lowercase hex form of the identifier, without dashes.
    pub fn uuid_hex(&self) -> String {
        self.uuid.simple().to_string()
    }
}

/// Partition record. Only one representative replica and ISR id is kept per
/// list; the list lengths are carried as read from the log (compact, len+1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub id: u32,
    /// Owning topic; a lookup key into [`ClusterMetadata::topics`].
    pub topic_uuid: Uuid,
    pub replica_length: u8,
    pub replica_id: u32,
    pub isr_length: u8,
    pub isr_id: u32,
    pub removing_replica_length: u8,
    pub adding_replica_length: u8,
    pub leader_id: u32,
    pub leader_epoch: u32,
}

impl Partition {
    /// Single-replica partition led by `leader_id`, with that broker as the
    /// only replica and in-sync replica.
    pub fn new(id: u32, topic_uuid: Uuid, leader_id: u32, leader_epoch: u32) -> Self {
        Self {
            id,
            topic_uuid,
            replica_length: 2,
            replica_id: leader_id,
            isr_length: 2,
            isr_id: leader_id,
            removing_replica_length: 1,
            adding_replica_length: 1,
            leader_id,
            leader_epoch,
        }
    }
}

/// Topics and partitions assembled from one pass over the metadata log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMetadata {
    pub topics: Vec<Topic>,
    pub partitions: Vec<Partition>,
    /// False when parsing stopped early on a bounds violation; the lists then
    /// hold everything read before that point.
    pub complete: bool,
}

impl ClusterMetadata {
    /// First topic whose name matches these bytes exactly.
    pub fn find_topic(&self, name: impl AsRef<[u8]>) -> Option<&Topic> {
        let name = name.as_ref();
        self.topics.iter().find(|t| t.name.as_bytes() == name)
    }

    pub fn partitions_for(&self, topic_uuid: Uuid) -> impl Iterator<Item = &Partition> {
        self.partitions
            .iter()
            .filter(move |p| p.topic_uuid == topic_uuid)
    }
}
