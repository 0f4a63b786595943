use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cluster::Cluster;
use crate::error::ClientError;
use crate::events::EventChannel;
use crate::logger::Logger;
use crate::options::{AssignerProtocol, ConsumerOptions, IsolationLevel};

pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(3_000);
pub const DEFAULT_MAX_BYTES_PER_PARTITION: u32 = 1024 * 1024; // 1 MiB
pub const DEFAULT_MIN_BYTES: u32 = 1;
pub const DEFAULT_MAX_BYTES: u32 = 10 * 1024 * 1024; // 10 MiB
pub const DEFAULT_MAX_WAIT_TIME: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPartitionOffset {
    pub topic: String,
    pub partition: u32,
    pub offset: u64,
}

impl TopicPartitionOffset {
    pub fn new<S: Into<String>>(topic: S, partition: u32, offset: u64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
        }
    }
}

#[derive(Debug)]
pub struct Consumer {
    cluster: Arc<Cluster>,
    logger: Logger,
    group_id: String,
    partition_assigners: Vec<AssignerProtocol>,
    session_timeout: Duration,
    heartbeat_interval: Duration,
    max_bytes_per_partition: u32,
    min_bytes: u32,
    max_bytes: u32,
    max_wait_time: Duration,
    isolation_level: IsolationLevel,
}

impl Consumer {
    pub fn build(cluster: Cluster, options: ConsumerOptions) -> Result<Consumer, ClientError> {
        let group_id = options.validated_group_id()?;

        let logger = cluster.logger().namespace("Consumer");
        let isolation_level = cluster
            .isolation_level()
            .unwrap_or_else(|| options.isolation_level());

        let partition_assigners = match options.partition_assigners {
            Some(assigners) if !assigners.is_empty() => assigners,
            _ => vec![AssignerProtocol::RoundRobin],
        };

        Ok(Consumer {
            cluster: Arc::new(cluster),
            logger,
            group_id,
            partition_assigners,
            session_timeout: options.session_timeout.unwrap_or(DEFAULT_SESSION_TIMEOUT),
            heartbeat_interval: options
                .heartbeat_interval
                .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL),
            max_bytes_per_partition: options
                .max_bytes_per_partition
                .unwrap_or(DEFAULT_MAX_BYTES_PER_PARTITION),
            min_bytes: options.min_bytes.unwrap_or(DEFAULT_MIN_BYTES),
            max_bytes: options.max_bytes.unwrap_or(DEFAULT_MAX_BYTES),
            max_wait_time: options.max_wait_time.unwrap_or(DEFAULT_MAX_WAIT_TIME),
            isolation_level,
        })
    }

    pub async fn connect(&self) -> Result<(), ClientError> {
        self.cluster.connect().await?;
        let assigners: Vec<&str> = self.partition_assigners.iter().map(|a| a.name()).collect();
        self.cluster.events().emit(
            "consumer.connect",
            json!({
                "cluster": self.cluster.id(),
                "group_id": self.group_id,
                "partition_assigners": assigners,
            }),
        );
        Ok(())
    }

    pub async fn disconnect(&self) {
        self.cluster.disconnect().await;
        self.cluster.events().emit(
            "consumer.disconnect",
            json!({ "cluster": self.cluster.id(), "group_id": self.group_id }),
        );
    }

    /// Writes resolved offsets into the shared cache. Returns how many were
    /// applied; offsets older than ones this consumer already saw are skipped.
    pub async fn commit_offsets(&self, offsets: &[TopicPartitionOffset]) -> usize {
        let mut applied = 0;
        for tpo in offsets {
            if self
                .cluster
                .observe_offset(&tpo.topic, tpo.partition, tpo.offset)
                .await
            {
                applied += 1;
            }
        }
        self.logger.debug(
            "Committed offsets to cache",
            json!({ "group_id": self.group_id, "requested": offsets.len(), "applied": applied }),
        );
        applied
    }

    pub async fn committed(&self, topic: &str, partition: u32) -> Option<u64> {
        self.cluster.offset(topic, partition).await
    }

    pub fn cluster(&self) -> &Arc<Cluster> {
        &self.cluster
    }

    pub fn events(&self) -> &EventChannel {
        self.cluster.events()
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn partition_assigners(&self) -> &[AssignerProtocol] {
        &self.partition_assigners
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        self.isolation_level
    }

    pub fn session_timeout(&self) -> Duration {
        self.session_timeout
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    pub fn max_bytes_per_partition(&self) -> u32 {
        self.max_bytes_per_partition
    }

    pub fn min_bytes(&self) -> u32 {
        self.min_bytes
    }

    pub fn max_bytes(&self) -> u32 {
        self.max_bytes
    }

    pub fn max_wait_time(&self) -> Duration {
        self.max_wait_time
    }
}
