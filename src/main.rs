//! # photokiosk 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성과 마이그레이션
//! 4. 기본 데이터 시드 (사진작가, 요금제, 장소, 관리자, 설정, 샘플 세션)
//! 5. 공유 상태(AppState)와 API 라우터 구성
//! 6. 키오스크 프론트엔드 정적 파일 서빙
//! 7. HTTP 서버 시작
//!
//! 도메인 코드는 전부 라이브러리 크레이트(`photokiosk`)에 있고,
//! 여기서는 조립만 합니다.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result; // main 함수용 범용 Result 타입
use axum::Router;
use photokiosk::{
    config::Config,
    db::{self, SeedOptions, SessionIdStyle, Store},
    routes::{api_router, AppState},
    services::print_queue::LogPrinter,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 photokiosk, tower_http, axum 모듈을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photokiosk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting photokiosk server on {}:{}", config.host, config.port);

    // ── 4단계: 데이터베이스 연결 풀과 마이그레이션 ──
    // URL에 `?mode=rwc`를 붙이면 파일이 없을 때 새로 만듭니다.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    db::migrate(&pool).await?;
    tracing::info!("Database migrations completed");

    // ── 5단계: 기본 데이터 시드 ──
    // 이미 데이터가 있는 컬렉션은 건드리지 않으므로 재시작해도 안전합니다.
    let store = Store::new(pool);
    store
        .init(SeedOptions {
            sample_sessions: config.seed_sample_sessions,
        })
        .await?;

    // ── 6단계: 공유 상태와 API 라우터 ──
    let session_ids = if config.readable_session_ids {
        SessionIdStyle::Readable
    } else {
        SessionIdStyle::Generated
    };
    let printer = Arc::new(LogPrinter::new(config.print_delay));
    let state = AppState::new(store, printer, session_ids);
    let api_routes = api_router(state);

    // ── 7단계: CORS ──
    // 키오스크 셸이 다른 출처에서 붙을 수 있으므로 모두 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 8단계: 프론트엔드 정적 파일 서빙 ──
    // SPA이므로 찾을 수 없는 경로는 index.html로 돌려보냅니다.
    let frontend_dist = Path::new(&config.frontend_dist);
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);

        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));

        Router::new()
            .nest("/api/v1", api_routes)
            .fallback_service(serve_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!(
            "Frontend dist directory {} not found, serving API only",
            config.frontend_dist
        );

        Router::new()
            .nest("/api/v1", api_routes)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    };

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
