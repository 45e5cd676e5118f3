//! # 사진 업로드 / object URL 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/sessions/{id}/photos`            → multipart 업로드 (파일 여러 개 가능)
//! - `DELETE /api/v1/sessions/{id}/photos/{photo_id}` → 세션에서 사진 삭제
//! - `GET    /api/v1/blobs/{id}`                      → 업로드된 원본 바이트
//!
//! 업로드 응답은 파일마다 결과가 하나씩 들어 있는 목록입니다. 일부만 성공해도 200입니다.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::{error::AppError, routes::AppState, services::uploads::UploadedFile};

/// multipart의 파일 필드들을 모아 순서대로 업로드합니다. 파일 이름이 없는 필드는 무시합니다.
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read '{}': {}", name, e)))?;
        files.push(UploadedFile {
            name,
            content_type,
            data,
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files were uploaded".to_string()));
    }

    let results = state.uploads.process_multiple(&session_id, files).await?;
    let uploaded = results.iter().filter(|r| r.photo().is_some()).count();
    Ok(Json(json!({
        "uploaded": uploaded,
        "rejected": results.len() - uploaded,
        "results": results,
    })))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Path((session_id, photo_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let photo = state.store.remove_photo(&session_id, &photo_id).await?;
    state.object_urls.revoke(&photo.url).await;
    Ok(StatusCode::NO_CONTENT)
}

/// 서버 재시작 후에는 예전 URL이 404가 됩니다.
pub async fn get_blob(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let blob = state
        .object_urls
        .get(&id)
        .await
        .ok_or_else(|| AppError::not_found("blob", &id))?;
    Ok(([(header::CONTENT_TYPE, blob.content_type)], blob.data))
}
