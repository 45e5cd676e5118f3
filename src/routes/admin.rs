//! # 관리자 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/admin/login`     → 관리자 로그인 (`lastLogin` 기록)
//! - `GET  /api/v1/admin/settings`  → 앱 설정 (없으면 기본값 생성)
//! - `PUT  /api/v1/admin/settings`  → 앱 설정 전체 교체
//! - `GET  /api/v1/admin/stats`     → 세션/주문/매출 통계
//! - `GET  /api/v1/admin/storage`   → 사진 수와 추정 저장 용량
//! - `GET  /api/v1/admin/export`    → 전체 데이터 내보내기
//! - `POST /api/v1/admin/import`    → 내보낸 데이터 가져오기 (들어 있는 컬렉션만 교체)
//! - `POST /api/v1/admin/reset`     → 전체 삭제 후 기본 데이터 다시 채우기

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    db::{DataExport, SeedOptions, Statistics, StorageStats},
    error::AppError,
    models::*,
    routes::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminResponse>, AppError> {
    let admin = state.store.login_admin(&req.username, &req.password).await?;
    tracing::info!(admin_id = %admin.id, "Admin logged in");
    Ok(Json(admin.into()))
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, AppError> {
    Ok(Json(state.store.settings().await?))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, AppError> {
    Ok(Json(state.store.update_settings(settings).await?))
}

pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    Ok(Json(state.store.statistics().await?))
}

pub async fn storage_stats(State(state): State<AppState>) -> Result<Json<StorageStats>, AppError> {
    Ok(Json(state.store.storage_stats().await?))
}

pub async fn export_data(State(state): State<AppState>) -> Result<Json<DataExport>, AppError> {
    Ok(Json(state.store.export_data().await?))
}

pub async fn import_data(
    State(state): State<AppState>,
    Json(data): Json<DataExport>,
) -> Result<StatusCode, AppError> {
    state.store.import_data(data).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 리셋 후에는 샘플 세션 없이 기본 데이터만 다시 채웁니다.
pub async fn reset_data(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.clear_all().await?;
    state
        .store
        .init(SeedOptions {
            sample_sessions: false,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
