//! File metadata inspection
//!
//! Streams a multipart upload and reports the name, declared type
//! (parameters included) and byte size of the `upfile` field. Contents are discarded.

use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, trace};

use crate::errors::{AppError, Result};

/// Multipart field that carries the upload
pub const UPLOAD_FIELD: &str = "upfile";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: usize,
}

/// Returns `Ok(None)` when the form has no `upfile` field.
pub async fn inspect_upload(mut payload: Multipart, max_bytes: usize) -> Result<Option<FileMetadata>> {
    while let Some(item) = payload.next().await {
        let mut field = item?;

        if field.name() != Some(UPLOAD_FIELD) {
            trace!("Skipping multipart field {:?}", field.name());
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let mut size = 0usize;
        while let Some(chunk) = field.next().await {
            size += chunk?.len();
            if size > max_bytes {
                return Err(AppError::payload_too_large("File too large"));
            }
        }

        debug!("Inspected upload {:?} ({}, {} bytes)", name, content_type, size);
        return Ok(Some(FileMetadata {
            name,
            content_type,
            size,
        }));
    }

    Ok(None)
}
