mod params;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tributary::{
    AdminOptions, Client, ClientConfig, Cluster, ConsumerOptions, LogLevel, ProducerOptions,
};

use crate::params::Params;

#[tokio::main]
async fn main() -> Result<()> {
    let params = Params::parse();

    let mut config = ClientConfig::load_or_default(params.config.as_ref())
        .context("loading client config")?;
    if let Some(brokers) = params.brokers {
        config.brokers = brokers;
    }
    if let Some(client_id) = params.client_id {
        config.client_id = client_id;
    }
    if let Some(level) = params.log_level {
        config.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_max_level(level_filter(config.log_level))
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    info!("tributary starting with config: {:?}", config);
    let client = Client::new(config).context("building client")?;

    let producer = client.producer(ProducerOptions::default())?;
    let consumer = client.consumer(
        ConsumerOptions::new(params.group_id).read_uncommitted(params.read_uncommitted),
    )?;
    let admin = client.admin(AdminOptions::default())?;

    let report = json!({
        "producer": describe(producer.cluster()),
        "consumer": describe(consumer.cluster()),
        "admin": describe(admin.cluster()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if params.connect {
        let results = [
            ("producer", producer.connect().await),
            ("consumer", consumer.connect().await),
            ("admin", admin.connect().await),
        ];
        for (role, result) in results {
            match result {
                Ok(()) => info!(role, "connected"),
                Err(e) => warn!(role, "connect failed: {}", e),
            }
        }
        producer.disconnect().await;
        consumer.disconnect().await;
        admin.disconnect().await;
    }

    Ok(())
}

fn describe(cluster: &Cluster) -> Value {
    let pool = cluster.config();
    json!({
        "cluster": cluster.id(),
        "event_channel": pool.events.id(),
        "brokers": pool.identity.brokers,
        "client_id": pool.identity.client_id,
        "metadata_max_age_ms": pool.metadata_max_age.as_millis() as u64,
        "allow_auto_topic_creation": pool.allow_auto_topic_creation,
        "max_in_flight_requests": pool.max_in_flight_requests,
        "isolation_level": pool.isolation_level,
        "allow_experimental_v011": pool.allow_experimental_v011,
        "retry": {
            "retries": pool.retry.retries,
            "initial_retry_time_ms": pool.retry.initial_retry_time.as_millis() as u64,
            "max_retry_time_ms": pool.retry.max_retry_time.as_millis() as u64,
            "factor": pool.retry.factor,
            "multiplier": pool.retry.multiplier,
            "restart_on_failure": pool.retry.restart_on_failure,
        },
    })
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Nothing => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
    }
}
