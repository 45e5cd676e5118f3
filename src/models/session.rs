//! # 촬영 세션 모델 정의
//!
//! 세션은 사진작가가 만든 작업 단위입니다. 업로드된 사진 목록을 세션 안에 직접
//! 품고(embedded) 있으며, 고객은 세션 이름으로 검색한 뒤 4자리 PIN으로 입장합니다.
//!
//! ## 세션 상태 흐름
//! ```text
//! active ──▶ completed ──▶ printed
//! ```
//! 상태는 앞으로만 이동합니다. 되돌리는 전이는 `InvalidTransition` 에러입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;
use crate::error::InvalidTransition;

/// 세션 엔티티: `sessions` 키에 저장되는 배열의 원소 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 세션 식별자 (UUIDv7 또는 "SMITHF123456" 형태의 읽기 쉬운 ID)
    pub id: String,
    /// 세션 이름 (예: "Smith Family"): 고객이 검색하는 값
    pub name: String,
    /// 촬영 장소 (자유 텍스트 또는 Location 이름)
    pub location: String,
    /// 4자리 숫자 입장 코드
    pub pin: String,
    /// 세션을 만든 사진작가 ID (외래키일 뿐, 소유 관계는 아님)
    pub photographer_id: String,
    pub created_at: DateTime<Utc>,
    /// 업로드 순서대로 정렬된 사진 목록
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub status: SessionStatus,
}

impl Record for Session {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.id.as_str()]
    }
}

/// 업로드된 사진 한 장
///
/// 사진은 세션에 배타적으로 소속됩니다. 세션의 사진 목록에서 빼는 것이 유일한 삭제 경로입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// 소속 세션 ID (역참조)
    pub session_id: String,
    /// 사용자가 올린 원래 파일 이름 (예: "IMG_001.jpg")
    pub original_name: String,
    /// 충돌 방지용 타임스탬프가 붙은 파일 이름 (예: "IMG001_1718000000000.jpg")
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    /// 프로세스가 살아 있는 동안만 유효한 object URL
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Printed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Printed => "printed",
        }
    }

    /// 다음 상태로 이동합니다.
    ///
    /// 선언 순서(`Active < Completed < Printed`)상 앞으로 가는 전이만 허용합니다.
    /// `active → printed`처럼 중간 단계를 건너뛰는 것은 허용되지만,
    /// 같은 상태로의 전이나 뒤로 가는 전이는 에러입니다.
    pub fn advance_to(self, next: SessionStatus) -> Result<SessionStatus, InvalidTransition> {
        if next > self {
            Ok(next)
        } else {
            Err(InvalidTransition {
                entity: "session",
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 고객용 세션 검색 결과: PIN과 사진 URL은 빼고 보여줍니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub photo_count: usize,
    pub status: SessionStatus,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            name: session.name.clone(),
            location: session.location.clone(),
            created_at: session.created_at,
            photo_count: session.photos.len(),
            status: session.status,
        }
    }
}

/// 세션 생성 요청: `POST /api/v1/sessions`의 요청 본문
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub name: String,
    pub location: String,
    pub photographer_id: String,
}

/// PIN 입장 요청: `POST /api/v1/sessions/{id}/access`
#[derive(Debug, Deserialize)]
pub struct SessionAccessRequest {
    pub pin: String,
}

/// 세션 상태 변경 요청: `POST /api/v1/sessions/{id}/status`
#[derive(Debug, Deserialize)]
pub struct SessionStatusRequest {
    pub status: SessionStatus,
}

/// 세션 폴더 구조: 원본/편집본/썸네일 경로와 파일 목록을 보여주는 읽기 전용 투영
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFolderStructure {
    pub session_id: String,
    pub session_name: String,
    pub original_photos: usize,
    pub folders: SessionFolderPaths,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionFolderPaths {
    pub originals: String,
    pub edited: String,
    pub thumbnails: String,
}

impl SessionFolderPaths {
    pub fn for_session(session_id: &str) -> Self {
        Self {
            originals: format!("sessions/{}/originals/", session_id),
            edited: format!("sessions/{}/edited/", session_id),
            thumbnails: format!("sessions/{}/thumbnails/", session_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_only_moves_forward() {
        assert_eq!(
            SessionStatus::Active.advance_to(SessionStatus::Completed),
            Ok(SessionStatus::Completed)
        );
        assert_eq!(
            SessionStatus::Completed.advance_to(SessionStatus::Printed),
            Ok(SessionStatus::Printed)
        );
        assert!(SessionStatus::Printed.advance_to(SessionStatus::Active).is_err());
        assert!(SessionStatus::Completed.advance_to(SessionStatus::Completed).is_err());
    }

    #[test]
    fn session_serializes_with_camel_case_keys() {
        let session = Session {
            id: "S1".to_string(),
            name: "Smith Family".to_string(),
            location: "Beach Resort".to_string(),
            pin: "1234".to_string(),
            photographer_id: "p1".to_string(),
            created_at: Utc::now(),
            photos: Vec::new(),
            status: SessionStatus::Active,
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["photographerId"], "p1");
        assert_eq!(value["status"], "active");
    }
}
