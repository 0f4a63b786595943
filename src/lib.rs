pub mod admin;
pub mod client;
pub mod cluster;
pub mod config;
pub mod consumer;
pub mod error;
pub mod events;
pub mod logger;
pub mod offsets;
pub mod options;
pub mod partitioner;
pub mod producer;
pub mod retry;

pub use admin::Admin;
pub use client::Client;
pub use cluster::{Cluster, ClusterOverrides, PoolConfig};
pub use config::{ClientConfig, ClientConfigBuilder, SaslConfig, SaslMechanism, TlsConfig};
pub use consumer::{Consumer, TopicPartitionOffset};
pub use error::{ClientError, ClusterError};
pub use events::{EventChannel, InstrumentationEvent};
pub use logger::{LogCreator, LogEntry, LogLevel, LogSink, Logger, MemorySink, TracingSink};
pub use offsets::{OffsetCache, SharedOffsetCache};
pub use options::{AdminOptions, AssignerProtocol, ConsumerOptions, IsolationLevel, ProducerOptions};
pub use partitioner::{CreatePartitioner, Partitioner, PartitionerArgs};
pub use producer::Producer;
pub use retry::{RetryPolicy, RetrySettings};
