//! # 대시보드 통계
//!
//! 관리자/사진작가 대시보드에 보여줄 집계 값을 계산합니다. 저장소를 읽기만 합니다.

use serde::Serialize;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{OrderStatus, SessionStatus};
use crate::services::uploads::format_file_size;

/// 사진 한 장당 추정 저장 용량 (2.5 MiB)
const ESTIMATED_BYTES_PER_PHOTO: u64 = 5 * 1024 * 1024 / 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sessions: usize,
    pub active_sessions: usize,
    pub completed_sessions: usize,
    pub printed_sessions: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub paid_orders: usize,
    pub printed_orders: usize,
    pub cancelled_orders: usize,
    /// 결제가 끝난 주문(`paid` + `printed`)의 금액 합계
    pub total_revenue: i64,
    pub active_photographers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_sessions: usize,
    pub total_photos: usize,
    pub active_sessions: usize,
    /// 사람이 읽는 추정 용량 (예: "5 MB")
    pub storage_used: String,
    pub folders_created: usize,
}

impl Store {
    pub async fn statistics(&self) -> Result<Statistics, AppError> {
        let sessions = self.sessions.list().await?;
        let orders = self.orders.list().await?;
        let photographers = self.photographers.list().await?;

        let sessions_in = |status: SessionStatus| sessions.iter().filter(|s| s.status == status).count();
        let orders_in = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Ok(Statistics {
            total_sessions: sessions.len(),
            active_sessions: sessions_in(SessionStatus::Active),
            completed_sessions: sessions_in(SessionStatus::Completed),
            printed_sessions: sessions_in(SessionStatus::Printed),
            total_orders: orders.len(),
            pending_orders: orders_in(OrderStatus::Pending),
            paid_orders: orders_in(OrderStatus::Paid),
            printed_orders: orders_in(OrderStatus::Printed),
            cancelled_orders: orders_in(OrderStatus::Cancelled),
            total_revenue: orders
                .iter()
                .filter(|o| matches!(o.status, OrderStatus::Paid | OrderStatus::Printed))
                .map(|o| o.total_amount)
                .sum(),
            active_photographers: photographers.iter().filter(|p| p.is_active).count(),
        })
    }

    pub async fn storage_stats(&self) -> Result<StorageStats, AppError> {
        let sessions = self.sessions.list().await?;
        let total_photos: usize = sessions.iter().map(|s| s.photos.len()).sum();

        Ok(StorageStats {
            total_sessions: sessions.len(),
            total_photos,
            active_sessions: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Active)
                .count(),
            storage_used: format_file_size(total_photos as u64 * ESTIMATED_BYTES_PER_PHOTO),
            folders_created: self.folders.entries().await?.len(),
        })
    }
}
