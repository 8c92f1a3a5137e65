use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{Either, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::constants::{INVALID_URL_MESSAGE, SHORT_URL_NOT_FOUND_MESSAGE};
use crate::config::InvalidUrlStatus;
use crate::errors::AppError;
use crate::services::ShortLinkRegistry;
use crate::utils::encode_location;

/// 提交表单（form 或 JSON）
#[derive(Debug, Deserialize)]
pub struct ShortUrlForm {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub original_url: String,
    pub short_url: u64,
}

pub struct ShortUrlService;

impl ShortUrlService {
    /// 无法解析的请求体（缺失、未知 content type、`url` 非字符串）按无效 URL 处理
    pub async fn create_short_url(
        form: Option<Either<web::Form<ShortUrlForm>, web::Json<ShortUrlForm>>>,
        registry: web::Data<Arc<ShortLinkRegistry>>,
        invalid_status: web::Data<InvalidUrlStatus>,
    ) -> impl Responder {
        let raw_url = match form {
            Some(Either::Left(f)) => f.into_inner().url,
            Some(Either::Right(j)) => j.into_inner().url,
            None => None,
        };

        let Some(raw_url) = raw_url else {
            trace!("Submission without url field");
            return Self::invalid_url_response(*invalid_status.get_ref());
        };

        match registry.submit(&raw_url).await {
            Ok(link) => HttpResponse::Ok().json(ShortUrlResponse {
                original_url: link.original_url,
                short_url: link.id,
            }),
            Err(_) => Self::invalid_url_response(*invalid_status.get_ref()),
        }
    }

    pub async fn redirect(
        path: web::Path<String>,
        registry: web::Data<Arc<ShortLinkRegistry>>,
    ) -> Result<HttpResponse, AppError> {
        let raw_id = path.into_inner();

        // 非规范形式的 id（"01"、"+1"、非数字）与未命中一视同仁
        let id: u64 = raw_id
            .parse()
            .ok()
            .filter(|id: &u64| id.to_string() == raw_id)
            .ok_or_else(|| AppError::not_found(SHORT_URL_NOT_FOUND_MESSAGE))?;

        let target = registry.resolve(id).inspect_err(|_| {
            inc_counter!(crate::metrics::METRICS.redirects_total, &["404"]);
        })?;

        inc_counter!(crate::metrics::METRICS.redirects_total, &["302"]);
        Ok(HttpResponse::Found()
            .insert_header((LOCATION, encode_location(&target).into_owned()))
            .finish())
    }

    #[inline]
    fn invalid_url_response(status: InvalidUrlStatus) -> HttpResponse {
        let status = match status {
            InvalidUrlStatus::Ok => StatusCode::OK,
            InvalidUrlStatus::BadRequest => StatusCode::BAD_REQUEST,
        };
        HttpResponse::build(status).json(serde_json::json!({ "error": INVALID_URL_MESSAGE }))
    }
}

/// Short URL 路由配置
pub fn shorturl_routes() -> actix_web::Scope {
    web::scope("/api/shorturl")
        .route("", web::post().to(ShortUrlService::create_short_url))
        .route(
            "/{short_url}",
            web::get().to(ShortUrlService::redirect),
        )
}
