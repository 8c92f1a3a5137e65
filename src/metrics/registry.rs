//! Global metrics registry
//!
//! Defines all Prometheus metrics used in the application.

use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

/// Global metrics instance
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

/// Application metrics container
pub struct Metrics {
    /// Internal Prometheus registry
    registry: Registry,

    // ===== HTTP metrics =====
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // ===== Short URL metrics =====
    /// Submissions by result (accepted, invalid, unresolvable)
    pub shorturl_submissions_total: CounterVec,
    /// Lookups by status code
    pub redirects_total: CounterVec,
    /// Number of stored short links
    pub shorturl_links: Gauge,

    // ===== System metrics =====
    pub uptime_seconds: Gauge,
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("microapis_http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status"],
        )
        .expect("Failed to create http_requests_total metric");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "microapis_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["method", "endpoint", "status"],
        )
        .expect("Failed to create http_request_duration_seconds metric");

        let shorturl_submissions_total = CounterVec::new(
            Opts::new(
                "microapis_shorturl_submissions_total",
                "Short URL submissions by result",
            ),
            &["result"],
        )
        .expect("Failed to create shorturl_submissions_total metric");

        let redirects_total = CounterVec::new(
            Opts::new(
                "microapis_redirects_total",
                "Total number of short URL lookups by status",
            ),
            &["status"],
        )
        .expect("Failed to create redirects_total metric");

        let shorturl_links = Gauge::new("microapis_shorturl_links", "Stored short links")
            .expect("Failed to create shorturl_links metric");

        let uptime_seconds = Gauge::new("microapis_uptime_seconds", "Server uptime in seconds")
            .expect("Failed to create uptime_seconds metric");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("Failed to register http_requests_total");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("Failed to register http_request_duration_seconds");
        registry
            .register(Box::new(shorturl_submissions_total.clone()))
            .expect("Failed to register shorturl_submissions_total");
        registry
            .register(Box::new(redirects_total.clone()))
            .expect("Failed to register redirects_total");
        registry
            .register(Box::new(shorturl_links.clone()))
            .expect("Failed to register shorturl_links");
        registry
            .register(Box::new(uptime_seconds.clone()))
            .expect("Failed to register uptime_seconds");

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            shorturl_submissions_total,
            redirects_total,
            shorturl_links,
            uptime_seconds,
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_contains_registered_metrics() {
        METRICS
            .shorturl_submissions_total
            .with_label_values(&["accepted"])
            .inc();
        let output = METRICS.export();
        assert!(output.contains("microapis_shorturl_submissions_total"));
    }
}
