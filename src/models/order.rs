//! # 주문 모델 정의
//!
//! 주문은 고객의 체크아웃 기록입니다: 고른 사진, 사진별 편집 내용, 계산된 금액, 처리 상태.
//!
//! ## 주문 상태 머신
//! ```text
//! pending ──▶ paid ──▶ printed
//!    │
//!    └──▶ cancelled
//! ```
//! 위 화살표 외의 모든 전이(예: paid → cancelled)는 `InvalidTransition` 에러입니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::Record;
use crate::error::InvalidTransition;
use crate::models::BundlePlan;

/// 주문 엔티티: `orders` 키에 저장
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub session_id: String,
    /// 주문 시점의 요금제 사본(snapshot)
    /// 이후 요금제 가격이 바뀌어도 이미 접수된 주문 금액은 변하지 않습니다.
    pub bundle_plan: BundlePlan,
    /// 선택한 사진 ID 목록 (중복 없음, 선택 순서 유지)
    pub selected_photos: Vec<String>,
    /// 사진 ID → 편집 기록
    #[serde(default)]
    pub edited_photos: BTreeMap<String, EditedPhoto>,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.session_id.as_str()];
        if let Some(name) = self.customer_info.as_ref().and_then(|c| c.name.as_deref()) {
            fields.push(name);
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// 주문 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Printed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Printed => "printed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// 상태 전이를 시도합니다. 허용되면 새 상태를, 아니면 `InvalidTransition`을 반환합니다.
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, InvalidTransition> {
        match (self, to) {
            (OrderStatus::Pending, OrderStatus::Paid)
            | (OrderStatus::Paid, OrderStatus::Printed)
            | (OrderStatus::Pending, OrderStatus::Cancelled) => Ok(to),
            _ => Err(InvalidTransition {
                entity: "order",
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            }),
        }
    }

    /// 더 이상 어떤 전이도 불가능한 종료 상태인지
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Printed | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 편집된 사진 한 장의 기록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedPhoto {
    pub photo_id: String,
    pub edits: PhotoEdits,
    /// 외부 편집기가 다시 렌더링한 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_url: Option<String>,
}

/// 편집 내용: 실제 픽셀 처리는 외부 편집기(`services::editor::ImageEditor`)가 담당합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoEdits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    /// 회전 각도 (도 단위)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    /// 좌우 반전 여부
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirrored: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub style: String,
    pub color: String,
    pub thickness: u32,
    pub radius: u32,
}

/// 주문 생성 요청: `POST /api/v1/orders`
///
/// 요금제는 ID로 받고, 서버가 저장소에서 조회한 뒤 사본을 주문에 박아 넣습니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub session_id: String,
    pub bundle_plan_id: String,
    pub selected_photos: Vec<String>,
    #[serde(default)]
    pub edited_photos: BTreeMap<String, EditedPhoto>,
    #[serde(default)]
    pub customer_info: Option<CustomerInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_order_transitions() {
        assert_eq!(OrderStatus::Pending.transition(OrderStatus::Paid), Ok(OrderStatus::Paid));
        assert_eq!(OrderStatus::Paid.transition(OrderStatus::Printed), Ok(OrderStatus::Printed));
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn rejected_order_transitions() {
        let err = OrderStatus::Paid.transition(OrderStatus::Cancelled).unwrap_err();
        assert_eq!(err.from, "paid");
        assert_eq!(err.to, "cancelled");

        assert!(OrderStatus::Cancelled.transition(OrderStatus::Paid).is_err());
        assert!(OrderStatus::Printed.transition(OrderStatus::Pending).is_err());
        assert!(OrderStatus::Pending.transition(OrderStatus::Printed).is_err());
    }
}
