use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Credential metrics
    pub credential_fetch_requests: IntCounterVec,
    pub credential_fetch_failures: IntCounterVec,
    pub credential_fetch_duration: HistogramVec,

    // Cache metrics
    pub cache_lookups: IntCounterVec,

    // API / callback
    pub api_requests: IntCounterVec,
    pub callback_events: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("wechatsdk".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            credential_fetch_requests: IntCounterVec::new(Opts::new("credential_fetch_requests_total", "Upstream credential fetches by kind"), &["kind"]).unwrap(),
            credential_fetch_failures: IntCounterVec::new(Opts::new("credential_fetch_failures_total", "Credential fetch failures by reason"), &["kind", "reason"]).unwrap(),
            credential_fetch_duration: HistogramVec::new(HistogramOpts::new("credential_fetch_duration_seconds", "Credential fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["kind"]).unwrap(),

            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Credential cache lookups by result"), &["kind", "result"]).unwrap(),

            api_requests: IntCounterVec::new(Opts::new("api_requests_total", "Signed API requests by method"), &["method"]).unwrap(),
            callback_events: IntCounterVec::new(Opts::new("callback_events_total", "Inbound callback events by result"), &["result"]).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.credential_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.credential_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.credential_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.cache_lookups.clone())).unwrap();
        reg.register(Box::new(metrics.api_requests.clone())).unwrap();
        reg.register(Box::new(metrics.callback_events.clone())).unwrap();

        metrics
    }
}
