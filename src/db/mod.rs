//! # 영속 저장소 계층 (Persistence Store)
//!
//! 모든 엔티티의 원본(canonical copy)을 보관하는 단일 진실 공급원입니다.
//! SQLite의 `kv_store` 테이블 한 개에 논리 키 하나당 JSON 값 하나를 저장합니다.
//!
//! 각 하위 모듈:
//! - `collection`: 키 하나에 배열 전체를 저장하는 제네릭 `Collection<T>` (CRUD + 검색)
//! - `folders`: 세션 폴더 인덱스 (세션 ID → 파일 이름 목록)
//! - `seed`: 빈 컬렉션에 기본 데이터 채우기 (`Store::init`)
//! - `sessions`: 세션 생성, 사진 추가/삭제, PIN 확인, 상태 전이
//! - `photographers`: 사진작가/관리자 계정
//! - `catalog`: 요금제와 촬영 장소
//! - `stats`: 대시보드 통계
//! - `backup`: 전체 내보내기/가져오기/초기화
//!
//! `Store`는 전역 싱글턴이 아니라 `main`에서 한 번 만들어 각 컴포넌트에 주입합니다.

pub mod backup;
pub mod catalog;
pub mod collection;
pub mod folders;
pub mod photographers;
pub mod seed;
pub mod sessions;
pub mod stats;

pub use backup::DataExport;
pub use collection::{merge_patch, Collection, Record};
pub use folders::SessionFolders;
pub use seed::SeedOptions;
pub use sessions::SessionIdStyle;
pub use stats::{Statistics, StorageStats};

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::*;

/// 영속 키 이름. 키오스크 프론트엔드의 localStorage 키와 같은 이름을 씁니다.
pub mod keys {
    pub const PHOTOGRAPHERS: &str = "photographers";
    pub const SESSIONS: &str = "sessions";
    pub const ORDERS: &str = "orders";
    pub const BUNDLE_PLANS: &str = "bundlePlans";
    pub const LOCATIONS: &str = "locations";
    pub const ADMINS: &str = "admins";
    pub const APP_SETTINGS: &str = "appSettings";
    pub const SESSION_FOLDERS: &str = "sessionFolders";
    pub const PRINT_QUEUE: &str = "printQueue";
}

/// 마이그레이션(`kv_store` 테이블 생성)을 실행합니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 컬렉션 핸들 묶음
///
/// `Clone`은 싸고(내부가 전부 `Arc`/풀 핸들), 복제본끼리 같은 잠금을 공유합니다.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    pub photographers: Collection<Photographer>,
    pub sessions: Collection<Session>,
    pub orders: Collection<Order>,
    pub bundle_plans: Collection<BundlePlan>,
    pub locations: Collection<Location>,
    pub admins: Collection<Admin>,
    pub print_queue: Collection<PrintRequest>,
    pub folders: SessionFolders,
    settings_lock: Arc<Mutex<()>>,
    /// 세션 사진 목록과 폴더 인덱스를 함께 바꾸는 연산을 직렬화합니다.
    pub(crate) photo_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            photographers: Collection::new(pool.clone(), keys::PHOTOGRAPHERS),
            sessions: Collection::new(pool.clone(), keys::SESSIONS),
            orders: Collection::new(pool.clone(), keys::ORDERS),
            bundle_plans: Collection::new(pool.clone(), keys::BUNDLE_PLANS),
            locations: Collection::new(pool.clone(), keys::LOCATIONS),
            admins: Collection::new(pool.clone(), keys::ADMINS),
            print_queue: Collection::new(pool.clone(), keys::PRINT_QUEUE),
            folders: SessionFolders::new(pool.clone()),
            settings_lock: Arc::new(Mutex::new(())),
            photo_lock: Arc::new(Mutex::new(())),
            pool,
        }
    }

    /// 메모리 SQLite 위에 마이그레이션까지 끝난 저장소를 만듭니다 (테스트/데모용).
    ///
    /// 메모리 DB는 연결마다 따로 생기므로 연결을 1개로 고정하고, 유휴 연결이 닫혀
    /// 데이터가 사라지지 않도록 idle/lifetime 제한을 끕니다.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        migrate(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {}", e)))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 앱 설정 싱글턴을 반환합니다. 아직 없으면 기본값으로 만들어 저장합니다.
    pub async fn settings(&self) -> Result<AppSettings, AppError> {
        let _guard = self.settings_lock.lock().await;
        if let Some(raw) = collection::read_key(&self.pool, keys::APP_SETTINGS).await? {
            if let Some(settings) = collection::parse_or_warn(keys::APP_SETTINGS, &raw) {
                return Ok(settings);
            }
        }

        let defaults = AppSettings::default();
        let raw = serde_json::to_string(&defaults)?;
        collection::write_key(&self.pool, keys::APP_SETTINGS, &raw).await?;
        tracing::info!("Created default app settings");
        Ok(defaults)
    }

    /// 앱 설정 전체를 교체합니다.
    pub async fn update_settings(&self, settings: AppSettings) -> Result<AppSettings, AppError> {
        let _guard = self.settings_lock.lock().await;
        let raw = serde_json::to_string(&settings)?;
        collection::write_key(&self.pool, keys::APP_SETTINGS, &raw).await?;
        Ok(settings)
    }

    pub(crate) async fn clear_settings(&self) -> Result<(), AppError> {
        let _guard = self.settings_lock.lock().await;
        collection::delete_key(&self.pool, keys::APP_SETTINGS).await
    }

    /// 설정이 이미 저장되어 있는지 (기본값을 새로 만들지 않음)
    pub(crate) async fn stored_settings(&self) -> Result<Option<AppSettings>, AppError> {
        let _guard = self.settings_lock.lock().await;
        Ok(collection::read_key(&self.pool, keys::APP_SETTINGS)
            .await?
            .and_then(|raw| collection::parse_or_warn(keys::APP_SETTINGS, &raw)))
    }
}
