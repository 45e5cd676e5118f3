//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `SEED_SAMPLE_SESSIONS`: 데모용 샘플 세션을 시드할지 여부
//! - `READABLE_SESSION_IDS`: 세션 ID를 이름 기반의 읽기 쉬운 형태로 만들지 여부
//! - `PRINT_DELAY_MS`: 인쇄 작업을 흉내 내는 인위적 지연 시간(밀리초)
//! - `FRONTEND_DIST`: 키오스크 프론트엔드 빌드 디렉토리

use std::env;
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/photokiosk.db?mode=rwc")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 세션 컬렉션이 비어 있을 때 샘플 세션 두 개를 넣을지 여부 (기본값: true)
    pub seed_sample_sessions: bool,
    /// true면 세션 ID를 "SMITHF123456"처럼 이름 기반으로 생성 (기본값: false)
    pub readable_session_ids: bool,
    /// 인쇄 지연 시간 (기본값: 2000ms)
    pub print_delay: Duration,
    /// 프론트엔드 정적 파일 디렉토리 (기본값: "../frontend/dist")
    pub frontend_dist: String,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            seed_sample_sessions: flag("SEED_SAMPLE_SESSIONS", true),
            readable_session_ids: flag("READABLE_SESSION_IDS", false),
            print_delay: Duration::from_millis(
                env::var("PRINT_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2000),
            ),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
        })
    }
}

/// "1", "true", "yes", "on"(대소문자 무시)을 참으로 읽습니다.
/// 변수가 없거나 알 수 없는 값이면 기본값을 사용합니다.
fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
