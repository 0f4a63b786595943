//! Client facade: one identity, many independent role handles.

use std::sync::Arc;

use serde_json::json;

use crate::admin::Admin;
use crate::cluster::{Cluster, ClusterOverrides, PoolConfig};
use crate::config::ClientConfig;
use crate::consumer::Consumer;
use crate::error::ClientError;
use crate::logger::{tracing_log_creator, Logger};
use crate::offsets::{OffsetCache, SharedOffsetCache};
use crate::options::{AdminOptions, ConsumerOptions, ProducerOptions};
use crate::producer::Producer;
use crate::retry::RetryPolicy;

/// Owns the state shared by every pool it spawns: the identity, the base
/// retry policy, the logger and the offset cache.
///
/// Each call to [`Client::producer`], [`Client::consumer`] or
/// [`Client::admin`] builds a brand new [`Cluster`] with its own event
/// channel. Handles are never cached.
#[derive(Debug)]
pub struct Client {
    identity: Arc<ClientConfig>,
    logger: Arc<Logger>,
    offsets: SharedOffsetCache,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Client, ClientError> {
        if config.brokers.iter().all(|b| b.trim().is_empty()) {
            return Err(ClientError::configuration(
                "Failed to connect: expected brokers array and got nothing",
            ));
        }

        let creator = config.log_creator.clone().unwrap_or_else(tracing_log_creator);
        let logger = Arc::new(Logger::new(config.log_level, &creator));
        logger.debug(
            "Client created",
            json!({ "client_id": config.client_id, "brokers": config.brokers.len() }),
        );

        Ok(Client {
            identity: Arc::new(config),
            logger,
            offsets: OffsetCache::shared(),
        })
    }

    pub fn producer(&self, options: ProducerOptions) -> Result<Producer, ClientError> {
        let cluster = self.create_cluster(
            options.retry.as_ref(),
            ClusterOverrides {
                metadata_max_age: options.metadata_max_age,
                allow_auto_topic_creation: options.allow_auto_topic_creation,
                max_in_flight_requests: options.max_in_flight_requests,
                isolation_level: None,
            },
        );
        Producer::build(cluster, options)
    }

    pub fn consumer(&self, options: ConsumerOptions) -> Result<Consumer, ClientError> {
        // reject before a pool is allocated
        options.validated_group_id()?;
        let cluster = self.create_cluster(
            options.retry.as_ref(),
            ClusterOverrides {
                metadata_max_age: options.metadata_max_age,
                allow_auto_topic_creation: options.allow_auto_topic_creation,
                max_in_flight_requests: options.max_in_flight_requests,
                isolation_level: Some(options.isolation_level()),
            },
        );
        Consumer::build(cluster, options)
    }

    /// Admin pools never auto-create topics.
    pub fn admin(&self, options: AdminOptions) -> Result<Admin, ClientError> {
        let cluster = self.create_cluster(
            options.retry.as_ref(),
            ClusterOverrides {
                allow_auto_topic_creation: Some(false),
                ..ClusterOverrides::default()
            },
        );
        Ok(Admin::build(cluster))
    }

    pub fn logger(&self) -> Arc<Logger> {
        Arc::clone(&self.logger)
    }

    pub fn offsets(&self) -> SharedOffsetCache {
        Arc::clone(&self.offsets)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.identity
    }

    fn create_cluster(
        &self,
        retry: Option<&RetryPolicy>,
        overrides: ClusterOverrides,
    ) -> Cluster {
        let config = PoolConfig::resolve(
            &self.identity,
            retry,
            overrides,
            &self.logger,
            &self.offsets,
        );
        Cluster::new(config)
    }
}
