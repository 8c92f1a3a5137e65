use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use tracing::{error, info};

use crate::config::FileMetadataConfig;
use crate::errors::AppError;
use crate::services::inspect_upload;

pub struct FileMetadataService;

impl FileMetadataService {
    pub async fn analyse(
        payload: Multipart,
        config: web::Data<FileMetadataConfig>,
    ) -> Result<HttpResponse, AppError> {
        let metadata = inspect_upload(payload, config.max_upload_bytes)
            .await
            .map_err(|e| match e {
                AppError::Multipart(msg) => {
                    error!("Failed to parse multipart upload: {}", msg);
                    AppError::multipart("Invalid multipart data")
                }
                other => other,
            })?
            .ok_or_else(|| AppError::validation("No file uploaded"))?;

        info!(
            "File analysed: {} ({}, {} bytes)",
            metadata.name, metadata.content_type, metadata.size
        );
        Ok(HttpResponse::Ok().json(metadata))
    }
}

/// File metadata 路由配置
pub fn file_metadata_routes() -> actix_web::Resource {
    web::resource("/api/fileanalyse").route(web::post().to(FileMetadataService::analyse))
}
