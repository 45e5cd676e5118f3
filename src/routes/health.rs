//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok" }`
//!
//! 키오스크 셸이 부팅 직후 서버가 준비되었는지 확인할 때 사용합니다.
//! 저장소 연결까지 확인하므로, SQLite 파일에 접근할 수 없으면 503을 돌려줍니다.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::routes::AppState;

/// `GET /health`: 서버와 저장소 상태를 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    // SELECT 1: 가장 가벼운 연결 확인 쿼리
    match sqlx::query("SELECT 1").execute(state.store.pool()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
