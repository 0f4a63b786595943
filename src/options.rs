//! Per-call option sets for [`crate::Client::producer`],
//! [`crate::Client::consumer`] and [`crate::Client::admin`].
//!
//! Every field is optional; `Default` means "nothing supplied".

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::partitioner::CreatePartitioner;
use crate::retry::RetryPolicy;

/// Whether consumers see records from open or aborted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i8)]
pub enum IsolationLevel {
    ReadUncommitted = 0,
    ReadCommitted = 1,
}

impl IsolationLevel {
    pub fn from_read_uncommitted(read_uncommitted: bool) -> Self {
        if read_uncommitted {
            IsolationLevel::ReadUncommitted
        } else {
            IsolationLevel::ReadCommitted
        }
    }

    /// Value sent on the wire in fetch requests.
    pub fn code(&self) -> i8 {
        *self as i8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignerProtocol {
    RoundRobin,
    Custom(String),
}

impl AssignerProtocol {
    pub fn name(&self) -> &str {
        match self {
            AssignerProtocol::RoundRobin => "RoundRobinAssigner",
            AssignerProtocol::Custom(name) => name,
        }
    }
}

#[derive(Clone, Default)]
pub struct ProducerOptions {
    pub create_partitioner: Option<CreatePartitioner>,
    pub retry: Option<RetryPolicy>,
    pub metadata_max_age: Option<Duration>,
    pub allow_auto_topic_creation: Option<bool>,
    pub idempotent: Option<bool>,
    pub transactional_id: Option<String>,
    pub transaction_timeout: Option<Duration>,
    pub max_in_flight_requests: Option<usize>,
}

impl ProducerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_partitioner(mut self, create: CreatePartitioner) -> Self {
        self.create_partitioner = Some(create);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn metadata_max_age(mut self, age: Duration) -> Self {
        self.metadata_max_age = Some(age);
        self
    }

    pub fn allow_auto_topic_creation(mut self, allow: bool) -> Self {
        self.allow_auto_topic_creation = Some(allow);
        self
    }

    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = Some(idempotent);
        self
    }

    pub fn transactional_id<S: Into<String>>(mut self, id: S) -> Self {
        self.transactional_id = Some(id.into());
        self
    }

    pub fn transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = Some(timeout);
        self
    }

    pub fn max_in_flight_requests(mut self, max: usize) -> Self {
        self.max_in_flight_requests = Some(max);
        self
    }
}

impl fmt::Debug for ProducerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerOptions")
            .field("custom_partitioner", &self.create_partitioner.is_some())
            .field("retry", &self.retry)
            .field("metadata_max_age", &self.metadata_max_age)
            .field("allow_auto_topic_creation", &self.allow_auto_topic_creation)
            .field("idempotent", &self.idempotent)
            .field("transactional_id", &self.transactional_id)
            .field("transaction_timeout", &self.transaction_timeout)
            .field("max_in_flight_requests", &self.max_in_flight_requests)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsumerOptions {
    pub group_id: Option<String>,
    pub partition_assigners: Option<Vec<AssignerProtocol>>,
    pub metadata_max_age: Option<Duration>,
    pub session_timeout: Option<Duration>,
    pub heartbeat_interval: Option<Duration>,
    pub max_bytes_per_partition: Option<u32>,
    pub min_bytes: Option<u32>,
    pub max_bytes: Option<u32>,
    pub max_wait_time: Option<Duration>,
    pub retry: Option<RetryPolicy>,
    pub allow_auto_topic_creation: Option<bool>,
    pub max_in_flight_requests: Option<usize>,
    /// `false` when absent.
    pub read_uncommitted: Option<bool>,
}

impl ConsumerOptions {
    pub fn new<S: Into<String>>(group_id: S) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Self::default()
        }
    }

    pub fn partition_assigners(mut self, assigners: Vec<AssignerProtocol>) -> Self {
        self.partition_assigners = Some(assigners);
        self
    }

    pub fn metadata_max_age(mut self, age: Duration) -> Self {
        self.metadata_max_age = Some(age);
        self
    }

    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }

    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    pub fn max_bytes_per_partition(mut self, bytes: u32) -> Self {
        self.max_bytes_per_partition = Some(bytes);
        self
    }

    pub fn min_bytes(mut self, bytes: u32) -> Self {
        self.min_bytes = Some(bytes);
        self
    }

    pub fn max_bytes(mut self, bytes: u32) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    pub fn max_wait_time(mut self, wait: Duration) -> Self {
        self.max_wait_time = Some(wait);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn allow_auto_topic_creation(mut self, allow: bool) -> Self {
        self.allow_auto_topic_creation = Some(allow);
        self
    }

    pub fn max_in_flight_requests(mut self, max: usize) -> Self {
        self.max_in_flight_requests = Some(max);
        self
    }

    pub fn read_uncommitted(mut self, read_uncommitted: bool) -> Self {
        self.read_uncommitted = Some(read_uncommitted);
        self
    }

    pub fn isolation_level(&self) -> IsolationLevel {
        IsolationLevel::from_read_uncommitted(self.read_uncommitted.unwrap_or(false))
    }

    /// Trimmed group id, or a configuration error when it is missing or blank.
    pub fn validated_group_id(&self) -> Result<String, ClientError> {
        match self.group_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(ClientError::configuration(
                "Consumer groupId must be a non-empty string",
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminOptions {
    pub retry: Option<RetryPolicy>,
}

impl AdminOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }
}
