use crate::common::error::{AppError, AppResult};
use crate::common::validation::ensure_bare_filename;
use crate::infrastructure::storage::local::LocalStorage;
use crate::modules::transcode::dto::UploadedAsset;
use axum::extract::{multipart::Field, Multipart};
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

pub const VIDEO_FIELD: &str = "video";

/// Pulls the `video` field out of a multipart body and writes it under the
/// uploads root. `stored_name` overrides the client's file name on disk.
pub async fn receive_video(
    storage: &LocalStorage,
    multipart: &mut Multipart,
    stored_name: Option<&str>,
) -> AppResult<UploadedAsset> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let original_filename = field
            .file_name()
            .map(str::to_string)
            .or_else(|| stored_name.map(str::to_string))
            .ok_or_else(|| AppError::InvalidRequest("video field has no filename".to_string()))?;
        ensure_bare_filename(&original_filename)?;

        let content_type = field.content_type().unwrap_or("application/octet-stream");
        if !content_type.starts_with("video/") && content_type != "application/octet-stream" {
            return Err(AppError::InvalidRequest(format!(
                "invalid content type '{}': only video/* allowed",
                content_type
            )));
        }

        let target_name = stored_name.unwrap_or(&original_filename).to_string();
        let storage_path = storage.upload_path(&target_name)?;

        info!("⬆️ Receiving upload {} -> {}", original_filename, target_name);
        stream_to_disk(field, &storage_path).await?;

        return Ok(UploadedAsset {
            storage_path,
            original_filename,
        });
    }

    Err(AppError::UploadMissing)
}

async fn stream_to_disk(mut field: Field<'_>, path: &Path) -> AppResult<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| AppError::io("Failed to create upload file", e))?;
    let mut written = 0u64;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                error!("Stream error: {}", e);
                drop(file);
                let _ = tokio::fs::remove_file(path).await;
                return Err(AppError::InvalidRequest("upload stream interrupted".to_string()));
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            error!("Upload write error: {}", e);
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
            return Err(AppError::io("Failed to write upload", e));
        }
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AppError::io("Failed to flush upload", e))?;

    info!("⬆️ Stored {} bytes", written);
    Ok(written)
}
