//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 `/api/v1` 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `admin`: 관리자 로그인, 설정, 통계, 백업/복원/초기화
//! - `catalog`: 요금제와 촬영 장소 CRUD
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `orders`: 주문 생성, 결제/인쇄/취소 전이, 영수증
//! - `photographers`: 사진작가 계정 CRUD와 로그인
//! - `photos`: 사진 업로드(multipart), 사진 삭제, object URL 서빙
//! - `print_queue`: 인쇄 대기열
//! - `sessions`: 세션 CRUD, PIN 입장, 상태 전이, 폴더 구조

pub mod admin;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod photographers;
pub mod photos;
pub mod print_queue;
pub mod sessions;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::db::{SessionIdStyle, Store};
use crate::services::checkout::Checkout;
use crate::services::print_queue::{PrintQueue, Printer};
use crate::services::uploads::{ObjectUrls, UploadProcessor};

/// 한 번의 업로드 요청 본문 상한. 파일당 10MB 검증은 업로드 처리기에서 따로 합니다.
const UPLOAD_BODY_LIMIT: usize = 100 * 1024 * 1024;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 안의 값들은 전부 내부가 `Arc`라서 clone해도 같은 저장소와 잠금을 공유합니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub checkout: Checkout,
    pub uploads: UploadProcessor,
    pub object_urls: ObjectUrls,
    pub print_queue: PrintQueue,
    /// 새 세션 ID 생성 방식
    pub session_ids: SessionIdStyle,
}

impl AppState {
    /// 저장소와 프린터를 받아 서비스들을 조립합니다.
    pub fn new(store: Store, printer: Arc<dyn Printer>, session_ids: SessionIdStyle) -> Self {
        let object_urls = ObjectUrls::new();
        Self {
            checkout: Checkout::new(store.clone()),
            uploads: UploadProcessor::new(store.clone(), object_urls.clone()),
            print_queue: PrintQueue::new(store.clone(), printer),
            object_urls,
            store,
            session_ids,
        }
    }
}

/// `/api/v1` 아래에 들어갈 API 라우터를 만듭니다.
pub fn api_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/sessions", get(sessions::list_sessions).post(sessions::create_session))
        .route("/sessions/search", get(sessions::search_sessions))
        .route(
            "/sessions/{id}",
            get(sessions::get_session)
                .patch(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route("/sessions/{id}/access", post(sessions::access_session))
        .route("/sessions/{id}/status", post(sessions::advance_status))
        .route("/sessions/{id}/folder", get(sessions::folder_structure))
        .route("/sessions/{id}/orders", get(sessions::session_orders))
        .route(
            "/sessions/{id}/photos",
            post(photos::upload_photos).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/sessions/{id}/photos/{photo_id}", delete(photos::delete_photo))
        .route("/blobs/{id}", get(photos::get_blob));

    let catalog_routes = Router::new()
        .route(
            "/bundle-plans",
            get(catalog::list_bundle_plans).post(catalog::create_bundle_plan),
        )
        .route(
            "/bundle-plans/{id}",
            get(catalog::get_bundle_plan)
                .patch(catalog::update_bundle_plan)
                .delete(catalog::delete_bundle_plan),
        )
        .route(
            "/locations",
            get(catalog::list_locations).post(catalog::create_location),
        )
        .route(
            "/locations/{id}",
            patch(catalog::update_location).delete(catalog::delete_location),
        );

    let account_routes = Router::new()
        .route(
            "/photographers",
            get(photographers::list_photographers).post(photographers::create_photographer),
        )
        .route("/photographers/login", post(photographers::login))
        .route(
            "/photographers/{id}",
            get(photographers::get_photographer)
                .patch(photographers::update_photographer)
                .delete(photographers::delete_photographer),
        )
        .route("/photographers/{id}/active", put(photographers::set_active))
        .route("/admin/login", post(admin::login));

    let admin_routes = Router::new()
        .route("/admin/settings", get(admin::get_settings).put(admin::update_settings))
        .route("/admin/stats", get(admin::statistics))
        .route("/admin/storage", get(admin::storage_stats))
        .route("/admin/export", get(admin::export_data))
        .route("/admin/import", post(admin::import_data))
        .route("/admin/reset", post(admin::reset_data));

    let order_routes = Router::new()
        .route("/orders", post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/pay", post(orders::mark_paid))
        .route("/orders/{id}/print", post(orders::mark_printed))
        .route("/orders/{id}/cancel", post(orders::cancel_order))
        .route("/orders/{id}/receipt", get(orders::receipt))
        .route(
            "/print-queue",
            get(print_queue::list_requests).post(print_queue::enqueue),
        )
        .route("/print-queue/{id}", delete(print_queue::cancel))
        .route("/print-queue/{id}/complete", post(print_queue::complete));

    Router::new()
        .merge(session_routes)
        .merge(catalog_routes)
        .merge(account_routes)
        .merge(admin_routes)
        .merge(order_routes)
        .route("/health", get(health::health_check))
        .with_state(state)
}
