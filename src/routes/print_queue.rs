//! # 인쇄 대기열 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/print-queue`                → 대기 중 목록 (`?status=completed`면 완료 목록)
//! - `POST   /api/v1/print-queue`                → 주문을 대기열에 추가 `{ "orderId": "..." }`
//! - `POST   /api/v1/print-queue/{id}/complete`  → 인쇄 완료 처리
//! - `DELETE /api/v1/print-queue/{id}`           → 대기열 항목 삭제

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::AppError, models::*, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub status: Option<PrintStatus>,
}

pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<Value>, AppError> {
    let requests = match query.status.unwrap_or(PrintStatus::Pending) {
        PrintStatus::Pending => state.print_queue.list_pending().await?,
        PrintStatus::Completed => state.print_queue.list_completed().await?,
    };
    Ok(Json(json!({ "requests": requests })))
}

pub async fn enqueue(
    State(state): State<AppState>,
    Json(req): Json<EnqueueRequest>,
) -> Result<(StatusCode, Json<PrintRequest>), AppError> {
    let request = state.print_queue.enqueue_order(&req.order_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PrintRequest>, AppError> {
    Ok(Json(state.print_queue.complete(&id).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.print_queue.cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
