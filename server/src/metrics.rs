use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref READINGS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "farmwatch_readings_total",
        "Total readings accepted via POST /api/enviar"
    ))
    .unwrap();
    pub static ref API_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "farmwatch_api_failures_total",
        "Total API requests answered with an error"
    ))
    .unwrap();
    pub static ref POOL_RETRIES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "farmwatch_pool_retries_total",
        "Total retried database connection acquisitions"
    ))
    .unwrap();
    pub static ref INGEST_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "farmwatch_ingest_latency_seconds",
            "Time taken to store one reading"
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0
        ])
    )
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(READINGS_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(API_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(POOL_RETRIES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(INGEST_LATENCY_SECONDS.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
