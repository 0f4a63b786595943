use std::time::Duration;

pub const DEFAULT_MAX_RETRY_TIME: Duration = Duration::from_millis(30_000);
pub const DEFAULT_INITIAL_RETRY_TIME: Duration = Duration::from_millis(300);
pub const DEFAULT_FACTOR: f64 = 0.2;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_RETRIES: u32 = 5;

/// Partial retry tuning. Unset keys inherit from whatever policy this one
/// is merged over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryPolicy {
    pub max_retry_time: Option<Duration>,
    pub initial_retry_time: Option<Duration>,
    /// Randomization factor applied to each backoff.
    pub factor: Option<f64>,
    pub multiplier: Option<f64>,
    pub retries: Option<u32>,
    pub restart_on_failure: Option<bool>,
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retry_time(mut self, value: Duration) -> Self {
        self.max_retry_time = Some(value);
        self
    }

    pub fn initial_retry_time(mut self, value: Duration) -> Self {
        self.initial_retry_time = Some(value);
        self
    }

    pub fn factor(mut self, value: f64) -> Self {
        self.factor = Some(value);
        self
    }

    pub fn multiplier(mut self, value: f64) -> Self {
        self.multiplier = Some(value);
        self
    }

    pub fn retries(mut self, value: u32) -> Self {
        self.retries = Some(value);
        self
    }

    pub fn restart_on_failure(mut self, value: bool) -> Self {
        self.restart_on_failure = Some(value);
        self
    }

    /// Shallow merge: each key set in `overrides` replaces ours, every other
    /// key keeps its current value.
    pub fn merge(&self, overrides: &RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            max_retry_time: overrides.max_retry_time.or(self.max_retry_time),
            initial_retry_time: overrides.initial_retry_time.or(self.initial_retry_time),
            factor: overrides.factor.or(self.factor),
            multiplier: overrides.multiplier.or(self.multiplier),
            retries: overrides.retries.or(self.retries),
            restart_on_failure: overrides.restart_on_failure.or(self.restart_on_failure),
        }
    }

    pub fn resolve(&self) -> RetrySettings {
        RetrySettings {
            max_retry_time: self.max_retry_time.unwrap_or(DEFAULT_MAX_RETRY_TIME),
            initial_retry_time: self.initial_retry_time.unwrap_or(DEFAULT_INITIAL_RETRY_TIME),
            factor: self.factor.unwrap_or(DEFAULT_FACTOR),
            multiplier: self.multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            retries: self.retries.unwrap_or(DEFAULT_RETRIES),
            restart_on_failure: self.restart_on_failure.unwrap_or(true),
        }
    }
}

/// Fully resolved retry tuning handed to pools and role handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrySettings {
    pub max_retry_time: Duration,
    pub initial_retry_time: Duration,
    pub factor: f64,
    pub multiplier: f64,
    pub retries: u32,
    pub restart_on_failure: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetryPolicy::default().resolve()
    }
}
