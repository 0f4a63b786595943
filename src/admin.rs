use std::sync::Arc;

use serde_json::json;

use crate::cluster::Cluster;
use crate::error::ClientError;
use crate::events::EventChannel;
use crate::logger::Logger;

#[derive(Debug)]
pub struct Admin {
    cluster: Arc<Cluster>,
    logger: Logger,
}

impl Admin {
    pub fn build(cluster: Cluster) -> Admin {
        let logger = cluster.logger().namespace("Admin");
        Admin {
            cluster: Arc::new(cluster),
            logger,
        }
    }

    pub async fn connect(&self) -> Result<(), ClientError> {
        self.cluster.connect().await?;
        self.cluster
            .events()
            .emit("admin.connect", json!({ "cluster": self.cluster.id() }));
        Ok(())
    }

    pub async fn disconnect(&self) {
        self.cluster.disconnect().await;
        self.cluster
            .events()
            .emit("admin.disconnect", json!({ "cluster": self.cluster.id() }));
    }

    /// Always `false`: metadata lookups from an admin must not create topics.
    pub fn allow_auto_topic_creation(&self) -> bool {
        self.cluster.config().allow_auto_topic_creation
    }

    /// Offsets any pool of the owning client has observed for `topic`,
    /// ordered by partition.
    pub async fn fetch_cached_offsets(&self, topic: &str) -> Vec<(u32, u64)> {
        let offsets = self.cluster.offsets().read().await.topic_offsets(topic);
        self.logger.debug(
            "Read cached offsets",
            json!({ "topic": topic, "partitions": offsets.len() }),
        );
        offsets
    }

    pub fn cluster(&self) -> &Arc<Cluster> {
        &self.cluster
    }

    pub fn events(&self) -> &EventChannel {
        self.cluster.events()
    }
}
