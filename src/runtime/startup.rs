//! Server startup preparation
//!
//! Builds the shared state once and wires it into each actix worker.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use tracing::info;

use crate::api::services::{
    AppStartTime, exercise_routes, file_metadata_routes, health_routes, hello, shorturl_routes,
};
use crate::config::{StaticConfig, get_config};
use crate::services::{DnsResolver, ExerciseService, HostResolver, ShortLinkRegistry};
use crate::storage::StorageFactory;

/// State shared by every worker. Cloning is cheap (`Arc`s only).
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ShortLinkRegistry>,
    pub exercises: Arc<ExerciseService>,
    pub start_time: AppStartTime,
    pub config: Arc<StaticConfig>,
}

impl AppState {
    /// Production state built from the global configuration, with the
    /// system DNS resolver.
    pub fn new() -> Self {
        let config = get_config();
        let resolver = Arc::new(DnsResolver::new(Duration::from_millis(
            config.registry.dns_timeout_ms,
        )));
        Self::with_resolver(config, resolver)
    }

    pub fn with_resolver(config: Arc<StaticConfig>, resolver: Arc<dyn HostResolver>) -> Self {
        info!("Using {} resolver for short URL validation", resolver.name());

        let registry = Arc::new(ShortLinkRegistry::new(
            resolver,
            config.registry.allowed_schemes.clone(),
        ));
        let exercises = Arc::new(ExerciseService::new(StorageFactory::create()));

        Self {
            registry,
            exercises,
            start_time: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
            config,
        }
    }

    /// Register app data and the routes of every enabled service.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let config = &self.config;

        cfg.app_data(web::Data::new(self.registry.clone()))
            .app_data(web::Data::new(self.exercises.clone()))
            .app_data(web::Data::new(self.start_time.clone()))
            .app_data(web::Data::new(config.registry.invalid_url_status))
            .app_data(web::Data::new(config.file_metadata.clone()))
            .service(health_routes())
            .route("/api/hello", web::get().to(hello));

        if config.registry.enabled {
            cfg.service(shorturl_routes());
        }
        if config.file_metadata.enabled {
            cfg.service(file_metadata_routes());
        }
        if config.exercises.enabled {
            cfg.configure(exercise_routes);
        }
    }

    /// Log which services are mounted (once, not per worker).
    pub fn log_enabled_services(&self) {
        let config = &self.config;
        let mut enabled = Vec::new();
        if config.registry.enabled {
            enabled.push("shorturl");
        }
        if config.file_metadata.enabled {
            enabled.push("fileanalyse");
        }
        if config.exercises.enabled {
            enabled.push("exercises");
        }
        info!("Enabled services: {}", enabled.join(", "));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
