// src/middleware/metrics.rs
//! Per-route request count and latency.
//!
//! [`RequestMetrics`] owns two series registered in a caller-supplied
//! [`Registry`]:
//!
//! - `axum_requests_total` (counter)
//! - `axum_request_duration_milliseconds` (histogram)
//!
//! Both are partitioned by `code`, `method` and `path` and carry a constant
//! `service` label. `path` is the first configured route prefix of the request
//! path, or `"other"`, which keeps the number of series bounded.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::MiddlewareConfig;
use crate::error::{MetricsError, Result};
use crate::route::RouteMatcher;

pub const REQUESTS_TOTAL: &str = "axum_requests_total";
pub const REQUEST_DURATION_MILLISECONDS: &str = "axum_request_duration_milliseconds";

const REQUESTS_HELP: &str =
    "How many HTTP requests processed, partitioned by status code, method and HTTP path.";
const DURATION_HELP: &str =
    "How long it took to process the request, partitioned by status code, method and HTTP path.";

/// Variable labels, in the order values are passed to the vectors.
pub const LABELS: [&str; 3] = ["code", "method", "path"];
pub const SERVICE_LABEL: &str = "service";

/// Handle to the registered request series.
///
/// Cloning is cheap; all clones record into the same series.
#[derive(Clone)]
pub struct RequestMetrics {
    service: String,
    routes: RouteMatcher,
    requests: IntCounterVec,
    latency: HistogramVec,
}

impl RequestMetrics {
    /// Create the series and register them in `registry`.
    ///
    /// Fails with [`MetricsError::AlreadyRegistered`] if this service already
    /// has request metrics in the registry. Nothing stays registered when
    /// construction fails.
    pub fn new(registry: &Registry, config: MiddlewareConfig) -> Result<Self> {
        let service = config.service_name.clone();
        let buckets = config.effective_buckets();

        let requests = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, REQUESTS_HELP).const_label(SERVICE_LABEL, &service),
            &LABELS,
        )?;

        let latency_opts = HistogramOpts::new(REQUEST_DURATION_MILLISECONDS, DURATION_HELP)
            .const_label(SERVICE_LABEL, &service)
            .buckets(buckets.clone());
        // Vector children are built lazily, so bad buckets would only show up
        // on the first request. Build a throwaway histogram to check them now.
        Histogram::with_opts(latency_opts.clone())
            .map_err(|e| MetricsError::InvalidBuckets(e.to_string()))?;
        let latency = HistogramVec::new(latency_opts, &LABELS)?;

        registry
            .register(Box::new(requests.clone()))
            .map_err(|e| registration_error(e, &service))?;
        if let Err(e) = registry.register(Box::new(latency.clone())) {
            // leave the registry as we found it
            unregister_counter(registry, &requests, &service);
            return Err(registration_error(e, &service));
        }

        info!(
            service = %service,
            routes = ?config.known_routes,
            buckets = ?buckets,
            "✅ Request metrics registered"
        );

        Ok(Self {
            service,
            routes: RouteMatcher::new(config.known_routes),
            requests,
            latency,
        })
    }

    /// Shorthand for [`RequestMetrics::new`]; empty `buckets` selects the defaults.
    pub fn with_routes<I, S>(
        registry: &Registry,
        service_name: impl Into<String>,
        routes: I,
        buckets: impl Into<Vec<f64>>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = MiddlewareConfig::new(service_name)
            .with_routes(routes)
            .with_buckets(buckets);
        Self::new(registry, config)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn routes(&self) -> &RouteMatcher {
        &self.routes
    }

    /// Record one finished request.
    ///
    /// Exactly one counter increment and one histogram observation happen,
    /// under the same labels, or neither does. Backend failures are logged
    /// and swallowed.
    pub fn record(&self, status: StatusCode, method: &Method, path: &str, elapsed: Duration) {
        let route = self.routes.label(path);
        let elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
        let values = [status.as_str(), method.as_str(), route];

        let counter = self.requests.get_metric_with_label_values(&values);
        let histogram = self.latency.get_metric_with_label_values(&values);
        match (counter, histogram) {
            (Ok(counter), Ok(histogram)) => {
                counter.inc();
                histogram.observe(elapsed_ms);
                debug!(
                    service = %self.service,
                    code = status.as_u16(),
                    method = %method,
                    path = route,
                    elapsed_ms,
                    "request recorded"
                );
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(service = %self.service, error = %e, "⚠️ Failed to record request metrics");
            }
        }
    }
}

fn registration_error(err: prometheus::Error, service: &str) -> MetricsError {
    match err {
        prometheus::Error::AlreadyReg => MetricsError::AlreadyRegistered {
            service: service.to_owned(),
        },
        other => MetricsError::Backend(other),
    }
}

/// Remove `requests` from `registry`, logging instead of failing.
/// Returns whether the counter was actually removed.
fn unregister_counter(registry: &Registry, requests: &IntCounterVec, service: &str) -> bool {
    match registry.unregister(Box::new(requests.clone())) {
        Ok(()) => true,
        Err(e) => {
            warn!(service = %service, error = %e, "⚠️ Failed to roll back request counter");
            false
        }
    }
}

/// Middleware recording request count and latency for every request it wraps.
///
/// ```ignore
/// let app = Router::new()
///     .route("/users/{id}", get(get_user))
///     .layer(axum::middleware::from_fn_with_state(metrics, track_requests));
/// ```
pub async fn track_requests(
    State(metrics): State<RequestMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    metrics.record(response.status(), &method, &path, start.elapsed());
    response
}
