//! Broker-connection pool bound to one role handle.
//!
//! A [`Cluster`] owns its resolved [`PoolConfig`] and its own event channel.
//! The offset cache and logger inside that config are shared with every
//! other pool spawned from the same client.

mod pool_config;

pub use pool_config::{ClusterOverrides, PoolConfig, DEFAULT_METADATA_MAX_AGE};

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::ClusterError;
use crate::events::EventChannel;
use crate::logger::Logger;
use crate::offsets::SharedOffsetCache;
use crate::options::IsolationLevel;
use crate::retry::RetrySettings;

static NEXT_CLUSTER_ID: AtomicU64 = AtomicU64::new(1);

struct BrokerConnection {
    broker: String,
    stream: TcpStream,
}

pub struct Cluster {
    id: u64,
    config: PoolConfig,
    logger: Logger,
    connection: Mutex<Option<BrokerConnection>>,
    // highest offset this pool has seen per (topic, partition)
    observed: Mutex<HashMap<(String, u32), u64>>,
}

impl Cluster {
    /// No I/O happens here; see [`Cluster::connect`].
    pub fn new(config: PoolConfig) -> Self {
        let id = NEXT_CLUSTER_ID.fetch_add(1, Ordering::Relaxed);
        let logger = config.logger.namespace("Cluster");
        logger.debug(
            "Connection pool created",
            json!({
                "cluster": id,
                "events": config.events.id(),
                "brokers": config.identity.brokers,
                "client_id": config.identity.client_id,
            }),
        );

        Cluster {
            id,
            config,
            logger,
            connection: Mutex::new(None),
            observed: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn events(&self) -> &EventChannel {
        &self.config.events
    }

    pub fn offsets(&self) -> &SharedOffsetCache {
        &self.config.offsets
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.config.logger
    }

    pub fn retry(&self) -> &RetrySettings {
        &self.config.retry
    }

    pub fn isolation_level(&self) -> Option<IsolationLevel> {
        self.config.isolation_level
    }

    /// Connects to the first reachable seed broker, in configured order.
    /// Calling it on a connected pool is a no-op.
    pub async fn connect(&self) -> Result<(), ClusterError> {
        let mut connection = self.connection.lock().await;
        if connection.is_some() {
            return Ok(());
        }

        let timeout = self.config.identity.connection_timeout;
        let mut attempted = Vec::with_capacity(self.config.identity.brokers.len());

        for broker in &self.config.identity.brokers {
            attempted.push(broker.clone());
            match tokio::time::timeout(timeout, TcpStream::connect(broker.as_str())).await {
                Ok(Ok(stream)) => {
                    self.logger
                        .info("Connected to seed broker", json!({ "broker": broker }));
                    self.config.events.emit(
                        "network.connect",
                        json!({ "cluster": self.id, "broker": broker }),
                    );
                    *connection = Some(BrokerConnection {
                        broker: broker.clone(),
                        stream,
                    });
                    return Ok(());
                }
                Ok(Err(e)) => self.logger.warn(
                    "Failed to connect to seed broker",
                    json!({ "broker": broker, "error": e.to_string() }),
                ),
                Err(_) => self.logger.warn(
                    "Connection to seed broker timed out",
                    json!({ "broker": broker, "timeout_ms": timeout.as_millis() as u64 }),
                ),
            }
        }

        self.logger.error(
            "No seed broker reachable",
            json!({ "attempted": attempted }),
        );
        Err(ClusterError::NoBrokersReachable { attempted })
    }

    pub async fn disconnect(&self) {
        if let Some(connection) = self.connection.lock().await.take() {
            self.logger.info(
                "Disconnected from broker",
                json!({ "broker": connection.broker }),
            );
            self.config.events.emit(
                "network.disconnect",
                json!({ "cluster": self.id, "broker": connection.broker }),
            );
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    pub async fn connected_broker(&self) -> Option<String> {
        self.connection
            .lock()
            .await
            .as_ref()
            .map(|c| c.broker.clone())
    }

    pub async fn peer_addr(&self) -> Option<SocketAddr> {
        self.connection
            .lock()
            .await
            .as_ref()
            .and_then(|c| c.stream.peer_addr().ok())
    }

    /// Records an offset this pool observed in a fetch or produce result.
    ///
    /// Returns `false`, leaving the shared cache alone, when this pool has
    /// already observed a higher offset for the same partition. Across pools
    /// the last writer wins.
    pub async fn observe_offset(&self, topic: &str, partition: u32, offset: u64) -> bool {
        // held across the cache write so this pool's writes land in order
        let mut observed = self.observed.lock().await;
        let key = (topic.to_string(), partition);

        if let Some(&seen) = observed.get(&key) {
            if seen > offset {
                self.logger.debug(
                    "Ignoring stale offset",
                    json!({ "topic": topic, "partition": partition, "offset": offset, "seen": seen }),
                );
                return false;
            }
        }

        observed.insert(key, offset);
        self.config.offsets.write().await.update(topic, partition, offset);
        true
    }

    pub async fn offset(&self, topic: &str, partition: u32) -> Option<u64> {
        self.config.offsets.read().await.fetch(topic, partition)
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("id", &self.id)
            .field("events", &self.config.events.id())
            .field("brokers", &self.config.identity.brokers)
            .finish_non_exhaustive()
    }
}
