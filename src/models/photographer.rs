//! # 사진작가 모델
//!
//! 가입/수정 요청 DTO와 비밀번호를 뺀 응답 타입을 함께 둡니다.
//! 이메일 중복 검사는 저장소의 컬렉션 잠금 안에서 이뤄집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photographer {
    pub id: String,
    pub name: String,
    pub email: String,
    /// 평문 저장. API 응답에는 절대 포함하지 않습니다.
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl Record for Photographer {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.id.as_str()]
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotographerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Photographer> for PhotographerResponse {
    fn from(p: Photographer) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            is_active: p.is_active,
            created_at: p.created_at,
            last_login: p.last_login,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhotographerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PhotographerLoginRequest {
    pub email: String,
    pub password: String,
}
