use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    /// A second middleware for the same service was built against one registry.
    #[error("Request metrics for service {service:?} are already registered")]
    AlreadyRegistered { service: String },

    #[error("Invalid latency buckets: {0}")]
    InvalidBuckets(String),

    #[error("Metrics backend error: {0}")]
    Backend(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
