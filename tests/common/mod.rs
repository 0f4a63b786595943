#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tributary::{Client, ClientConfig, LogCreator, LogLevel, LogSink, MemorySink, RetryPolicy};

pub fn memory_log_creator(sink: &Arc<MemorySink>) -> LogCreator {
    let sink = Arc::clone(sink);
    Arc::new(move |_: LogLevel| Arc::clone(&sink) as Arc<dyn LogSink>)
}

/// Client against `brokers` whose log records land in the returned sink.
pub fn client_with_sink<I, S>(brokers: I) -> (Client, Arc<MemorySink>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let sink = Arc::new(MemorySink::new());
    let config = ClientConfig::builder()
        .brokers(brokers)
        .client_id("tributary-tests")
        .connection_timeout(Duration::from_millis(200))
        .retry(
            RetryPolicy::new()
                .retries(5)
                .initial_retry_time(Duration::from_millis(100)),
        )
        .log_level(LogLevel::Debug)
        .log_creator(memory_log_creator(&sink))
        .build();
    let client = Client::new(config).expect("valid client config");
    (client, sink)
}

pub fn test_client() -> Client {
    client_with_sink(["127.0.0.1:9092"]).0
}

/// Listener standing in for a broker. Keep it alive for the test's duration.
pub async fn local_broker() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind local listener");
    let addr = listener.local_addr().expect("local addr").to_string();
    (listener, addr)
}

/// Address nothing is listening on.
pub async fn closed_port() -> String {
    let (listener, addr) = local_broker().await;
    drop(listener);
    addr
}

/// Removed when the returned guard drops.
pub fn folder_to_use() -> TempDir {
    tempfile::Builder::new()
        .prefix("tributary_test_")
        .tempdir()
        .expect("failed to create temp dir")
}
