//! # 요금제 / 촬영 장소 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/bundle-plans`       → 요금제 목록 (기본은 활성만, `?all=true`면 전체)
//! - `POST   /api/v1/bundle-plans`       → 요금제 생성
//! - `GET    /api/v1/bundle-plans/{id}`  → 단일 요금제
//! - `PATCH  /api/v1/bundle-plans/{id}`  → 부분 수정 (검증 후 저장)
//! - `DELETE /api/v1/bundle-plans/{id}`  → 삭제
//! - `GET    /api/v1/locations`          → 장소 목록 (`?all=true` 동일)
//! - `POST   /api/v1/locations`          → 장소 생성
//! - `PATCH  /api/v1/locations/{id}`     → 부분 수정
//! - `DELETE /api/v1/locations/{id}`     → 삭제

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::AppError, models::*, routes::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 비활성 항목까지 포함할지 (관리자 화면)
    #[serde(default)]
    pub all: bool,
}

pub async fn list_bundle_plans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let plans = if query.all {
        state.store.bundle_plans.list().await?
    } else {
        state.store.active_bundle_plans().await?
    };
    Ok(Json(json!({ "bundlePlans": plans })))
}

pub async fn create_bundle_plan(
    State(state): State<AppState>,
    Json(req): Json<CreateBundlePlanRequest>,
) -> Result<(StatusCode, Json<BundlePlan>), AppError> {
    let plan = state.store.create_bundle_plan(req).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn get_bundle_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BundlePlan>, AppError> {
    Ok(Json(state.store.get_bundle_plan(&id).await?))
}

pub async fn update_bundle_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<BundlePlan>, AppError> {
    Ok(Json(state.store.update_bundle_plan(&id, &patch).await?))
}

pub async fn delete_bundle_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_bundle_plan(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let locations = if query.all {
        state.store.locations.list().await?
    } else {
        state.store.active_locations().await?
    };
    Ok(Json(json!({ "locations": locations })))
}

pub async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    let location = state.store.create_location(req).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Location>, AppError> {
    Ok(Json(state.store.update_location(&id, &patch).await?))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_location(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
