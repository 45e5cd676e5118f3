//! # 관리자 모델
//!
//! 관리자 계정은 `admins` 키에 저장됩니다. 응답에는 비밀번호를 뺀 `AdminResponse`만 내보냅니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;

/// 관리자: 역할은 사진작가와 비슷하지만 별도 컬렉션(`admins`)에 저장됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl Record for Admin {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.username.as_str(), self.name.as_str(), self.id.as_str()]
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            name: admin.name,
            last_login: admin.last_login,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}
