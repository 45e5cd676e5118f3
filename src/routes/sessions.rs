//! # 세션(Session) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/sessions`               → 세션 목록 (사진작가 대시보드 전용, PIN 포함, `?photographerId=`로 필터)
//! - `POST   /api/v1/sessions`               → 새 세션 생성 (ID와 PIN 발급)
//! - `GET    /api/v1/sessions/search?q=`     → 고객용 이름 검색 (PIN 없는 요약만 반환)
//! - `GET    /api/v1/sessions/{id}`          → 단일 세션 요약 (PIN 없음, 사진은 PIN 입장으로만)
//! - `PATCH  /api/v1/sessions/{id}`          → 이름/장소 부분 수정
//! - `DELETE /api/v1/sessions/{id}`          → 세션 삭제 (폴더 인덱스 항목도 삭제)
//! - `POST   /api/v1/sessions/{id}/access`   → PIN으로 입장 `{ "pin": "1234" }`
//! - `POST   /api/v1/sessions/{id}/status`   → 상태 전이 `{ "status": "completed" }`
//! - `GET    /api/v1/sessions/{id}/folder`   → 폴더 구조
//! - `GET    /api/v1/sessions/{id}/orders`   → 세션의 주문 목록

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::AppError, models::*, routes::AppState};

/// 목록 조회 쿼리 (`?photographerId=1`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsQuery {
    pub photographer_id: Option<String>,
}

/// 검색 쿼리 (`?q=smith`). 비어 있으면 전체를 돌려줍니다.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// 사진작가 대시보드용 목록입니다. 고객에게 PIN을 알려 줘야 하므로 전체 세션을 돌려줍니다.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Value>, AppError> {
    let sessions = match query.photographer_id.as_deref() {
        Some(photographer_id) => state.store.sessions_for_photographer(photographer_id).await?,
        None => state.store.sessions.list().await?,
    };
    Ok(Json(json!({ "sessions": sessions })))
}

/// `GET /sessions/search?q=`: 대소문자 무시, 이름이나 ID에 검색어가 들어간 세션만 반환합니다.
pub async fn search_sessions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let results: Vec<SessionSummary> = state
        .store
        .sessions
        .search(&query.q)
        .await?
        .iter()
        .map(SessionSummary::from)
        .collect();
    Ok(Json(json!({ "sessions": results })))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = state.store.create_session(req, state.session_ids).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// ID만 아는 고객도 부를 수 있으므로 PIN과 사진을 뺀 요약만 돌려줍니다.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = state.store.get_session(&id).await?;
    Ok(Json(SessionSummary::from(&session)))
}

pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.store.update_session(&id, &patch).await?))
}

/// 세션을 지울 때 세션 사진들의 object URL도 해제합니다.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session = state.store.get_session(&id).await?;
    state.store.delete_session(&id).await?;
    for photo in &session.photos {
        state.object_urls.revoke(&photo.url).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /sessions/{id}/access`: PIN이 맞으면 세션 전체(사진 포함)를 돌려줍니다.
pub async fn access_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionAccessRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.store.verify_pin(&id, &req.pin).await?))
}

pub async fn advance_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionStatusRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(
        state.store.advance_session_status(&id, req.status).await?,
    ))
}

pub async fn folder_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionFolderStructure>, AppError> {
    Ok(Json(state.store.folder_structure(&id).await?))
}

pub async fn session_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 세션이 없으면 빈 목록 대신 404
    state.store.get_session(&id).await?;
    let orders = state.store.orders_for_session(&id).await?;
    Ok(Json(json!({ "orders": orders })))
}
