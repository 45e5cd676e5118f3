//! # 주문 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/orders`                → 주문 생성 (상태 `pending`, 금액 = 요금제 가격)
//! - `GET  /api/v1/orders/{id}`           → 단일 주문
//! - `POST /api/v1/orders/{id}/pay`       → `pending → paid`
//! - `POST /api/v1/orders/{id}/print`     → `paid → printed`
//! - `POST /api/v1/orders/{id}/cancel`    → `pending → cancelled`
//! - `GET  /api/v1/orders/{id}/receipt`   → 영수증 (`?format=text`면 일반 텍스트)
//!
//! 허용되지 않는 전이는 409 `invalid_transition`으로 응답합니다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{error::AppError, models::*, routes::AppState};

pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.checkout.create_order_from_request(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.checkout.get_order(&id).await?))
}

pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.checkout.mark_paid(&id).await?))
}

pub async fn mark_printed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.checkout.mark_printed(&id).await?))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.checkout.cancel_order(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReceiptQuery {
    pub format: Option<String>,
}

pub async fn receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReceiptQuery>,
) -> Result<Response, AppError> {
    let receipt = state.checkout.receipt_for_order(&id).await?;
    match query.format.as_deref() {
        Some("text") => Ok(receipt.to_text().into_response()),
        Some("json") | None => Ok(Json(receipt).into_response()),
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown receipt format '{}'",
            other
        ))),
    }
}
