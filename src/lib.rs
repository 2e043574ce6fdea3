pub mod config;
pub mod error;
pub mod middleware;
pub mod route;

pub use config::MiddlewareConfig;
pub use error::{MetricsError, Result};
pub use middleware::metrics::{track_requests, RequestMetrics};
