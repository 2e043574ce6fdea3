// config.rs
use serde::Deserialize;

/// Histogram upper bounds (milliseconds) used when none are configured.
pub const DEFAULT_LATENCY_BUCKETS: [f64; 3] = [300.0, 1200.0, 5000.0];

/// Request metrics configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MiddlewareConfig {
    /// Value of the constant `service` label. Not validated, may be empty.
    pub service_name: String,
    /// Path prefixes used as `path` label values, tried in order.
    #[serde(default)]
    pub known_routes: Vec<String>,
    /// Ascending histogram bounds in milliseconds. Empty means the defaults.
    #[serde(default)]
    pub latency_buckets: Vec<f64>,
}

impl MiddlewareConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            known_routes: Vec::new(),
            latency_buckets: Vec::new(),
        }
    }

    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_buckets(mut self, buckets: impl Into<Vec<f64>>) -> Self {
        self.latency_buckets = buckets.into();
        self
    }

    /// Buckets the histogram is actually created with.
    pub fn effective_buckets(&self) -> Vec<f64> {
        if self.latency_buckets.is_empty() {
            DEFAULT_LATENCY_BUCKETS.to_vec()
        } else {
            self.latency_buckets.clone()
        }
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "info,route_metrics=debug"
    pub level: String,
}

/// Global configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MiddlewareConfig,
}

impl Config {
    /// Load config from `config/default.toml` and environment variables.
    ///
    /// Environment keys use the `APP` prefix and `__` as separator, so
    /// `APP__METRICS__KNOWN_ROUTES=/users,/orders` sets the route list.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::load(config::File::with_name("config/default").required(false))
    }

    fn load<S>(file: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("metrics.known_routes")
                    .with_list_parse_key("metrics.latency_buckets")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        Ok(cfg)
    }
}
