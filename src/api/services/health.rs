use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, trace};

use crate::services::{ExerciseService, ShortLinkRegistry};

#[cfg(feature = "metrics")]
use super::metrics::MetricsService;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub links_count: usize,
    pub users_count: Option<usize>,
    pub exercise_store: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        registry: web::Data<Arc<ShortLinkRegistry>>,
        exercises: web::Data<Arc<ExerciseService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let users_count = match exercises.count_users().await {
            Ok(n) => Some(n),
            Err(e) => {
                error!("Exercise store health check failed: {}", e);
                None
            }
        };
        let is_healthy = users_count.is_some();

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let body = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            checks: HealthChecks {
                links_count: registry.len(),
                users_count,
                exercise_store: exercises.backend_name(),
            },
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        if is_healthy {
            HttpResponse::Ok().json(body)
        } else {
            HttpResponse::ServiceUnavailable().json(body)
        }
    }

    pub async fn readiness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    let scope = web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check));

    #[cfg(feature = "metrics")]
    let scope = scope.route("/metrics", web::get().to(MetricsService::metrics));

    scope
}

/// `GET /api/hello`
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "greeting": "hello API" }))
}
