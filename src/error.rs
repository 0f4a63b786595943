use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl ClientError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("No broker reachable, attempted: {attempted:?}")]
    NoBrokersReachable { attempted: Vec<String> },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
