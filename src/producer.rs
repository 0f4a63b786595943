use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::cluster::Cluster;
use crate::error::ClientError;
use crate::events::EventChannel;
use crate::logger::Logger;
use crate::options::ProducerOptions;
use crate::partitioner::{DefaultPartitioner, Partitioner, PartitionerArgs};
use crate::retry::RetrySettings;

pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_millis(60_000);

pub struct Producer {
    cluster: Arc<Cluster>,
    logger: Logger,
    partitioner: Box<dyn Partitioner>,
    idempotent: bool,
    transactional_id: Option<String>,
    transaction_timeout: Duration,
}

impl Producer {
    /// Validates producer-only options and binds them to `cluster`.
    pub fn build(cluster: Cluster, options: ProducerOptions) -> Result<Producer, ClientError> {
        let logger = cluster.logger().namespace("Producer");
        let retry = *cluster.retry();

        let mut idempotent = options.idempotent.unwrap_or(false);
        if options.transactional_id.is_some() && !idempotent {
            logger.warn(
                "Transactional producer requires idempotence, enabling it",
                json!({ "transactional_id": options.transactional_id }),
            );
            idempotent = true;
        }

        if idempotent && retry.retries == 0 {
            return Err(ClientError::configuration(
                "Idempotent producer must allow retries to protect against transient errors",
            ));
        }

        if options.transaction_timeout.is_some() && options.transactional_id.is_none() {
            logger.warn(
                "Transaction timeout ignored without a transactional id",
                Value::Null,
            );
        }

        let partitioner: Box<dyn Partitioner> = match &options.create_partitioner {
            Some(create) => create(),
            None => Box::new(DefaultPartitioner::new()),
        };

        Ok(Producer {
            cluster: Arc::new(cluster),
            logger,
            partitioner,
            idempotent,
            transactional_id: options.transactional_id,
            transaction_timeout: options
                .transaction_timeout
                .unwrap_or(DEFAULT_TRANSACTION_TIMEOUT),
        })
    }

    pub async fn connect(&self) -> Result<(), ClientError> {
        self.cluster.connect().await?;
        self.cluster
            .events()
            .emit("producer.connect", json!({ "cluster": self.cluster.id() }));
        Ok(())
    }

    pub async fn disconnect(&self) {
        self.cluster.disconnect().await;
        self.cluster
            .events()
            .emit("producer.disconnect", json!({ "cluster": self.cluster.id() }));
    }

    pub fn partition(&self, topic: &str, key: Option<&[u8]>, partition_count: u32) -> u32 {
        self.partitioner.partition(&PartitionerArgs {
            topic,
            key,
            partition_count,
        })
    }

    /// Feeds a produce acknowledgement back into the shared offset cache as
    /// the next offset to be written.
    pub async fn record_ack(&self, topic: &str, partition: u32, offset: u64) -> bool {
        let applied = self
            .cluster
            .observe_offset(topic, partition, offset.saturating_add(1))
            .await;
        if applied {
            self.logger.debug(
                "Produce acknowledged",
                json!({ "topic": topic, "partition": partition, "offset": offset }),
            );
        }
        applied
    }

    pub fn cluster(&self) -> &Arc<Cluster> {
        &self.cluster
    }

    pub fn events(&self) -> &EventChannel {
        self.cluster.events()
    }

    pub fn retry(&self) -> &RetrySettings {
        self.cluster.retry()
    }

    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    pub fn is_transactional(&self) -> bool {
        self.transactional_id.is_some()
    }

    pub fn transactional_id(&self) -> Option<&str> {
        self.transactional_id.as_deref()
    }

    pub fn transaction_timeout(&self) -> Duration {
        self.transaction_timeout
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("cluster", &self.cluster)
            .field("idempotent", &self.idempotent)
            .field("transactional_id", &self.transactional_id)
            .field("transaction_timeout", &self.transaction_timeout)
            .finish_non_exhaustive()
    }
}
