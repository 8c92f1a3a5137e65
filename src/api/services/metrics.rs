//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus text format at `/health/metrics`.

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;

use super::AppStartTime;
use crate::metrics::METRICS;
use crate::services::ShortLinkRegistry;

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    pub async fn metrics(
        app_start_time: web::Data<AppStartTime>,
        registry: web::Data<Arc<ShortLinkRegistry>>,
    ) -> impl Responder {
        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as f64;
        METRICS.uptime_seconds.set(uptime);
        METRICS.shorturl_links.set(registry.len() as f64);

        HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(METRICS.export())
    }
}
