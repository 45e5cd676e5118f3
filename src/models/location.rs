//! # 촬영 장소 모델

use serde::{Deserialize, Serialize};

use crate::db::Record;

/// 촬영 장소: 단순 참조 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
}

impl Record for Location {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.id.as_str()]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
