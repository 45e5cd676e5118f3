//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 에러 분류:
//! - 검증 실패(`Validation`): 필드 이름과 메시지를 함께 전달 → 사용자가 입력을 고치면 해결
//! - 찾을 수 없음(`NotFound`): 세션/주문/사진 ID가 존재하지 않음
//! - 잘못된 상태 전이(`InvalidTransition`): 예) 결제된 주문 취소 시도
//! - 저장소 오류(`Database`, `Serialization`): 내부 오류로 로그에만 상세 기록
//!
//! 저장된 JSON이 손상된 경우는 에러가 아니라 빈 컬렉션으로 취급합니다 (`db::collection` 참고).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::validation::ValidationError;

/// 상태 머신이 허용하지 않는 전이를 시도했을 때의 에러
///
/// 주문(`pending → paid → printed`, `pending → cancelled`)과
/// 세션(`active → completed → printed`) 상태 전이 검사에서 공통으로 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move {entity} from '{from}' to '{to}'")]
pub struct InvalidTransition {
    /// 엔티티 종류 (예: "order", "session")
    pub entity: &'static str,
    /// 현재 상태
    pub from: String,
    /// 시도한 목표 상태
    pub to: String,
}

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 예: `AppError::NotFound("session SMITH123456".into())`
    #[error("Not found: {0}")]
    NotFound(String),

    /// 입력 검증 실패 (HTTP 422)
    /// #[from]: `?`로 ValidationError를 자동 변환합니다.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 허용되지 않는 상태 전이 (HTTP 409)
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// 리소스 충돌 (HTTP 409): 예: 이미 인쇄 대기열에 있는 주문
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON 직렬화/역직렬화 오류 (HTTP 500)
    /// 부분 업데이트(patch) 병합 결과가 엔티티 형태와 맞지 않을 때도 발생합니다.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// `NotFound` 생성 헬퍼: `AppError::not_found("order", id)` → "order <id>"
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} {}", entity, id))
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Serialization, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // 검증 에러는 어느 필드가 문제인지 함께 알려줍니다.
        let mut field = None;

        let (status, code, message) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Validation(ref err) => {
                field = err.field;
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_error",
                    err.message.clone(),
                )
            }
            AppError::InvalidTransition(ref err) => {
                (StatusCode::CONFLICT, "invalid_transition", err.to_string())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization_error",
                    "A data format error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "validation_error", "message": "...", "field": "name" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "field": field,
            }
        }));

        (status, body).into_response()
    }
}
