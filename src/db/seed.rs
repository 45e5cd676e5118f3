//! # 기본 데이터 시드
//!
//! 서버가 처음 뜰 때 비어 있는 컬렉션에만 기본 레코드를 채웁니다.
//! `Collection::seed_if_empty`는 "비었는지 확인 + 쓰기"를 같은 잠금 안에서 하므로
//! `init()`을 몇 번 호출해도 기본 레코드가 중복되지 않습니다.

use chrono::Utc;

use crate::db::Store;
use crate::error::AppError;
use crate::models::*;

/// `init()` 동작 옵션
#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    /// 세션이 하나도 없으면 데모용 샘플 세션 두 개를 넣습니다.
    pub sample_sessions: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            sample_sessions: true,
        }
    }
}

/// 사진이 아직 없는 샘플 세션이 가리키는 자리표시 이미지
const PLACEHOLDER_URL: &str = "/placeholder.svg";

impl Store {
    /// 모든 기본 데이터를 준비합니다. 프로세스 시작 시 한 번 호출합니다.
    pub async fn init(&self, options: SeedOptions) -> Result<(), AppError> {
        if self.photographers.seed_if_empty(default_photographers).await? {
            tracing::info!("Seeded default photographer");
        }
        if self.bundle_plans.seed_if_empty(default_bundle_plans).await? {
            tracing::info!("Seeded default bundle plans");
        }
        if self.locations.seed_if_empty(default_locations).await? {
            tracing::info!("Seeded default locations");
        }
        if self.admins.seed_if_empty(default_admins).await? {
            tracing::info!("Seeded default admin");
        }

        // 설정은 없을 때 기본값으로 만들어집니다
        self.settings().await?;

        if options.sample_sessions && self.sessions.seed_if_empty(sample_sessions).await? {
            for session in self.sessions.list().await? {
                self.folders.create_folder(&session.id).await?;
                for photo in &session.photos {
                    self.folders.add_file(&session.id, &photo.file_name).await?;
                }
            }
            tracing::info!("Seeded sample sessions");
        }

        Ok(())
    }
}

fn default_photographers() -> Vec<Photographer> {
    vec![Photographer {
        id: "1".to_string(),
        name: "John Photographer".to_string(),
        email: "john@photo.com".to_string(),
        password: "password123".to_string(),
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    }]
}

fn default_bundle_plans() -> Vec<BundlePlan> {
    [
        ("1", "Basic", 2, 100, "Perfect for a few memorable shots"),
        ("2", "Standard", 5, 250, "Great for small groups"),
        ("3", "Premium", 10, 500, "Ideal for families"),
        ("4", "Unlimited", 20, 1000, "Maximum value package"),
    ]
    .into_iter()
    .map(|(id, name, photo_limit, price, description)| BundlePlan {
        id: id.to_string(),
        name: name.to_string(),
        photo_limit,
        price,
        description: description.to_string(),
        is_active: true,
    })
    .collect()
}

fn default_locations() -> Vec<Location> {
    [
        ("1", "Beach Resort", "Beautiful beachside location"),
        ("2", "Mountain View", "Scenic mountain backdrop"),
        ("3", "City Park", "Urban park setting"),
        ("4", "Wedding Hall", "Indoor elegant venue"),
    ]
    .into_iter()
    .map(|(id, name, description)| Location {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        is_active: true,
    })
    .collect()
}

fn default_admins() -> Vec<Admin> {
    vec![Admin {
        id: "1".to_string(),
        username: "admin".to_string(),
        password: "admin123".to_string(),
        name: "System Administrator".to_string(),
        created_at: Utc::now(),
        last_login: None,
    }]
}

fn sample_photo(id: &str, session_id: &str, file_name: &str) -> Photo {
    Photo {
        id: id.to_string(),
        session_id: session_id.to_string(),
        original_name: file_name.to_string(),
        file_name: file_name.to_string(),
        uploaded_at: Utc::now(),
        url: PLACEHOLDER_URL.to_string(),
        thumbnail_url: Some(PLACEHOLDER_URL.to_string()),
    }
}

fn sample_sessions() -> Vec<Session> {
    let now = Utc::now();
    vec![
        Session {
            id: "SMITH123456".to_string(),
            name: "Smith Family".to_string(),
            location: "Beach Resort".to_string(),
            pin: "1234".to_string(),
            photographer_id: "1".to_string(),
            created_at: now,
            photos: vec![
                sample_photo("1", "SMITH123456", "IMG_001.jpg"),
                sample_photo("2", "SMITH123456", "IMG_002.jpg"),
            ],
            status: SessionStatus::Active,
        },
        Session {
            id: "JONES789012".to_string(),
            name: "Jones Wedding".to_string(),
            location: "Wedding Hall".to_string(),
            pin: "5678".to_string(),
            photographer_id: "1".to_string(),
            created_at: now,
            photos: vec![sample_photo("3", "JONES789012", "WED_001.jpg")],
            status: SessionStatus::Active,
        },
    ]
}
