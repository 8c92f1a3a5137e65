//! HTTP timing middleware
//!
//! Logs every request's status and duration at `debug`. With the `metrics`
//! feature it also feeds the request counter and duration histogram.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use tracing::debug;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

/// HTTP timing middleware factory
#[derive(Clone, Default)]
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let start = Instant::now();
        let method = method_str(req.method());
        let endpoint = classify_endpoint(req.path());

        Box::pin(async move {
            let result = srv.call(req).await;

            let elapsed = start.elapsed();
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(e) => e.as_response_error().status_code().as_u16(),
            };

            debug!(
                "{} {} -> {} in {:?}",
                method, endpoint, status, elapsed
            );

            #[cfg(feature = "metrics")]
            {
                let status = status.to_string();
                METRICS
                    .http_request_duration_seconds
                    .with_label_values(&[method, endpoint, status.as_str()])
                    .observe(elapsed.as_secs_f64());
                METRICS
                    .http_requests_total
                    .with_label_values(&[method, endpoint, status.as_str()])
                    .inc();
            }

            result
        })
    }
}

/// Map HTTP method to a static string (avoids allocation).
fn method_str(method: &actix_web::http::Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "PATCH" => "PATCH",
        _ => "OTHER",
    }
}

/// Classify request path into endpoint category
///
/// Keeps metric label cardinality bounded (ids never become labels).
fn classify_endpoint(path: &str) -> &'static str {
    if path.starts_with("/api/shorturl") {
        "shorturl"
    } else if path.starts_with("/api/users") || path.starts_with("/api/exercises") {
        "exercises"
    } else if path.starts_with("/api/fileanalyse") {
        "fileanalyse"
    } else if path.starts_with("/health") {
        "health"
    } else if path.starts_with("/api/hello") {
        "hello"
    } else {
        "other"
    }
}
