//! Server mode
//!
//! This module contains the HTTP server startup logic.

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::config::{CorsConfig, get_config};
use crate::runtime::shutdown::listen_for_shutdown;
use crate::runtime::startup::AppState;

/// 优雅关闭等待时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Build CORS middleware from configuration
///
/// Disabled CORS means the browser's default same-origin policy.
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age as usize);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed."
        );
    }
}

/// Run the HTTP server
///
/// **Note**: Configuration and logging must be initialized before calling
/// this function
pub async fn run_server() -> Result<()> {
    let config = get_config();
    let state = AppState::new();
    state.log_enabled_services();

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} worker threads", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .configure(|cfg| state.configure(cfg))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .disable_signals()
    .workers(cpu_count)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Listening on http://{}", bind_address);

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        listen_for_shutdown().await;
        handle.stop(true).await;
    });

    server.await?;
    info!("Server stopped");
    Ok(())
}
