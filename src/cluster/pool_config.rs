use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::events::EventChannel;
use crate::logger::Logger;
use crate::offsets::SharedOffsetCache;
use crate::options::IsolationLevel;
use crate::retry::{RetryPolicy, RetrySettings};

pub const DEFAULT_METADATA_MAX_AGE: Duration = Duration::from_millis(300_000);

/// Pool knobs a role request may set. Anything left `None` takes the
/// pool default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterOverrides {
    pub metadata_max_age: Option<Duration>,
    pub allow_auto_topic_creation: Option<bool>,
    pub max_in_flight_requests: Option<usize>,
    pub isolation_level: Option<IsolationLevel>,
}

/// Fully resolved settings for one [`super::Cluster`].
///
/// Built fresh per role request and moved into the pool, so it is
/// deliberately not `Clone`.
#[derive(Debug)]
pub struct PoolConfig {
    pub identity: Arc<ClientConfig>,
    pub retry: RetrySettings,
    pub metadata_max_age: Duration,
    pub allow_auto_topic_creation: bool,
    /// `None` means unlimited.
    pub max_in_flight_requests: Option<usize>,
    pub isolation_level: Option<IsolationLevel>,
    pub allow_experimental_v011: bool,
    pub logger: Arc<Logger>,
    pub offsets: SharedOffsetCache,
    pub events: EventChannel,
}

impl PoolConfig {
    /// The only side effect is allocating a new [`EventChannel`].
    pub fn resolve(
        identity: &Arc<ClientConfig>,
        retry_override: Option<&RetryPolicy>,
        overrides: ClusterOverrides,
        logger: &Arc<Logger>,
        offsets: &SharedOffsetCache,
    ) -> PoolConfig {
        let retry = match retry_override {
            Some(call) => identity.retry.merge(call),
            None => identity.retry.clone(),
        };

        PoolConfig {
            identity: Arc::clone(identity),
            retry: retry.resolve(),
            metadata_max_age: overrides
                .metadata_max_age
                .unwrap_or(DEFAULT_METADATA_MAX_AGE),
            allow_auto_topic_creation: overrides.allow_auto_topic_creation.unwrap_or(true),
            max_in_flight_requests: overrides.max_in_flight_requests,
            isolation_level: overrides.isolation_level,
            allow_experimental_v011: identity.allow_experimental_v011,
            logger: Arc::clone(logger),
            offsets: Arc::clone(offsets),
            events: EventChannel::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, MemorySink};
    use crate::offsets::OffsetCache;

    fn shared_state() -> (Arc<ClientConfig>, Arc<Logger>, SharedOffsetCache) {
        let identity = ClientConfig::builder()
            .brokers(["b1:9092"])
            .retry(RetryPolicy::new().retries(5).initial_retry_time(Duration::from_millis(100)))
            .allow_experimental_v011(false)
            .build();
        let logger = Logger::with_sink(LogLevel::Info, Arc::new(MemorySink::new()));
        (Arc::new(identity), Arc::new(logger), OffsetCache::shared())
    }

    #[test]
    fn defaults_apply_when_nothing_is_overridden() {
        let (identity, logger, offsets) = shared_state();
        let pool = PoolConfig::resolve(&identity, None, ClusterOverrides::default(), &logger, &offsets);

        assert_eq!(pool.metadata_max_age, DEFAULT_METADATA_MAX_AGE);
        assert!(pool.allow_auto_topic_creation);
        assert_eq!(pool.max_in_flight_requests, None);
        assert_eq!(pool.isolation_level, None);
        assert!(!pool.allow_experimental_v011);
        assert_eq!(pool.retry.retries, 5);
        assert_eq!(pool.retry.initial_retry_time, Duration::from_millis(100));
    }

    #[test]
    fn call_retry_is_merged_over_base() {
        let (identity, logger, offsets) = shared_state();
        let call = RetryPolicy::new().initial_retry_time(Duration::from_millis(50));
        let pool = PoolConfig::resolve(
            &identity,
            Some(&call),
            ClusterOverrides::default(),
            &logger,
            &offsets,
        );

        assert_eq!(pool.retry.retries, 5);
        assert_eq!(pool.retry.initial_retry_time, Duration::from_millis(50));
        // base is untouched
        assert_eq!(identity.retry.initial_retry_time, Some(Duration::from_millis(100)));
    }

    #[test]
    fn shares_state_by_reference_and_gets_fresh_channel() {
        let (identity, logger, offsets) = shared_state();
        let overrides = ClusterOverrides {
            metadata_max_age: Some(Duration::from_secs(1)),
            allow_auto_topic_creation: Some(false),
            max_in_flight_requests: Some(1),
            isolation_level: Some(IsolationLevel::ReadCommitted),
        };
        let a = PoolConfig::resolve(&identity, None, overrides.clone(), &logger, &offsets);
        let b = PoolConfig::resolve(&identity, None, overrides, &logger, &offsets);

        assert!(Arc::ptr_eq(&a.identity, &b.identity));
        assert!(Arc::ptr_eq(&a.logger, &logger));
        assert!(Arc::ptr_eq(&a.offsets, &b.offsets));
        assert_ne!(a.events.id(), b.events.id());
        assert_eq!(a.metadata_max_age, Duration::from_secs(1));
        assert!(!a.allow_auto_topic_creation);
        assert_eq!(a.max_in_flight_requests, Some(1));
    }
}
