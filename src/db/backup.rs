//! # 백업: 내보내기 / 가져오기 / 초기화
//!
//! 내보내기 묶음은 모든 컬렉션과 폴더 인덱스, 설정, 내보낸 시각을 담습니다.
//! 가져오기는 묶음에 **들어 있는** 컬렉션만 통째로 교체하고, 빠진 컬렉션은 건드리지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::folders::FolderEntries;
use crate::db::Store;
use crate::error::AppError;
use crate::models::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographers: Option<Vec<Photographer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<Session>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_plans: Option<Vec<BundlePlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<Admin>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_queue: Option<Vec<PrintRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_folders: Option<FolderEntries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

impl Store {
    /// 현재 저장된 모든 데이터를 묶어 돌려줍니다.
    pub async fn export_data(&self) -> Result<DataExport, AppError> {
        Ok(DataExport {
            photographers: Some(self.photographers.list().await?),
            sessions: Some(self.sessions.list().await?),
            orders: Some(self.orders.list().await?),
            bundle_plans: Some(self.bundle_plans.list().await?),
            locations: Some(self.locations.list().await?),
            admins: Some(self.admins.list().await?),
            print_queue: Some(self.print_queue.list().await?),
            settings: self.stored_settings().await?,
            session_folders: Some(self.folders.entries().await?),
            export_date: Some(Utc::now()),
        })
    }

    /// 묶음에 있는 컬렉션들을 교체합니다.
    pub async fn import_data(&self, data: DataExport) -> Result<(), AppError> {
        if let Some(records) = data.photographers {
            self.photographers.replace_all(&records).await?;
        }
        if let Some(records) = data.sessions {
            self.sessions.replace_all(&records).await?;
        }
        if let Some(records) = data.orders {
            self.orders.replace_all(&records).await?;
        }
        if let Some(records) = data.bundle_plans {
            self.bundle_plans.replace_all(&records).await?;
        }
        if let Some(records) = data.locations {
            self.locations.replace_all(&records).await?;
        }
        if let Some(records) = data.admins {
            self.admins.replace_all(&records).await?;
        }
        if let Some(records) = data.print_queue {
            self.print_queue.replace_all(&records).await?;
        }
        if let Some(settings) = data.settings {
            self.update_settings(settings).await?;
        }
        if let Some(entries) = data.session_folders {
            self.folders.replace_all(&entries).await?;
        }
        tracing::info!("Imported backup data");
        Ok(())
    }

    /// 모든 키를 삭제합니다. 다음 `init()`에서 기본 데이터가 다시 채워집니다.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        self.photographers.clear().await?;
        self.sessions.clear().await?;
        self.orders.clear().await?;
        self.bundle_plans.clear().await?;
        self.locations.clear().await?;
        self.admins.clear().await?;
        self.print_queue.clear().await?;
        self.clear_settings().await?;
        self.folders.clear().await?;
        tracing::warn!("Cleared all stored data");
        Ok(())
    }
}
