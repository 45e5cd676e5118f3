//! # 인쇄 대기열 모델
//!
//! 체크아웃이 끝난 주문의 사본(snapshot)을 인쇄 대기열(`printQueue` 키)에 쌓습니다.
//! 주문 원본을 실시간으로 참조하지 않으므로, 나중에 주문이 바뀌어도 대기열 항목은 그대로입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub id: String,
    pub order_id: String,
    pub session_id: String,
    pub session_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub plan_name: String,
    pub photo_count: usize,
    pub total_amount: i64,
    pub status: PrintStatus,
    pub ordered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub photos: Vec<PhotoRef>,
}

impl Record for PrintRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.session_name.as_str(), self.id.as_str()];
        if let Some(name) = self.customer_name.as_deref() {
            fields.push(name);
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    Pending,
    Completed,
}

/// 인쇄할 사진 참조: 편집본이 있으면 편집본 URL, 없으면 원본 URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueRequest {
    pub order_id: String,
}
