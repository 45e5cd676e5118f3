//! # 사진작가 계정 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/photographers`             → 계정 목록
//! - `POST   /api/v1/photographers`             → 계정 생성
//! - `POST   /api/v1/photographers/login`       → 로그인 (`lastLogin` 기록)
//! - `GET    /api/v1/photographers/{id}`        → 단일 계정
//! - `PATCH  /api/v1/photographers/{id}`        → 부분 수정
//! - `DELETE /api/v1/photographers/{id}`        → 삭제
//! - `PUT    /api/v1/photographers/{id}/active` → 활성화 토글 `{ "isActive": false }`
//!
//! 응답에는 비밀번호가 들어가지 않도록 항상 `PhotographerResponse`로 변환합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{error::AppError, models::*, routes::AppState};

pub async fn list_photographers(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let photographers: Vec<PhotographerResponse> = state
        .store
        .photographers
        .list()
        .await?
        .into_iter()
        .map(PhotographerResponse::from)
        .collect();
    Ok(Json(json!({ "photographers": photographers })))
}

pub async fn create_photographer(
    State(state): State<AppState>,
    Json(req): Json<CreatePhotographerRequest>,
) -> Result<(StatusCode, Json<PhotographerResponse>), AppError> {
    let photographer = state.store.create_photographer(req).await?;
    Ok((StatusCode::CREATED, Json(photographer.into())))
}

pub async fn get_photographer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotographerResponse>, AppError> {
    let photographer = state
        .store
        .photographers
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("photographer", &id))?;
    Ok(Json(photographer.into()))
}

pub async fn update_photographer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<PhotographerResponse>, AppError> {
    Ok(Json(state.store.update_photographer(&id, &patch).await?.into()))
}

pub async fn delete_photographer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_photographer(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<PhotographerResponse>, AppError> {
    Ok(Json(
        state
            .store
            .set_photographer_active(&id, req.is_active)
            .await?
            .into(),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<PhotographerLoginRequest>,
) -> Result<Json<PhotographerResponse>, AppError> {
    let photographer = state
        .store
        .login_photographer(&req.email, &req.password)
        .await?;
    tracing::info!(photographer_id = %photographer.id, "Photographer logged in");
    Ok(Json(photographer.into()))
}
