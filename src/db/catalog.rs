//! # 카탈로그: 요금제와 촬영 장소
//!
//! 관리자가 편집하는 참조 데이터입니다. 고객 화면에는 활성(`isActive`) 항목만 보입니다.

use serde_json::Value;

use crate::db::Store;
use crate::error::AppError;
use crate::models::*;
use crate::services::{ids, validation};

impl Store {
    pub async fn create_bundle_plan(
        &self,
        req: CreateBundlePlanRequest,
    ) -> Result<BundlePlan, AppError> {
        let plan = BundlePlan {
            id: ids::generate_id(),
            name: validation::sanitize_input(&req.name),
            photo_limit: req.photo_limit,
            price: req.price,
            description: validation::sanitize_input(&req.description),
            is_active: req.is_active.unwrap_or(true),
        };
        validation::validate_bundle_plan(&plan)?;
        self.bundle_plans.add(plan).await
    }

    pub async fn get_bundle_plan(&self, id: &str) -> Result<BundlePlan, AppError> {
        self.bundle_plans
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("bundle plan", id))
    }

    /// 가격 변경은 이미 접수된 주문에 영향을 주지 않습니다 (주문은 요금제 사본을 가짐).
    pub async fn update_bundle_plan(&self, id: &str, patch: &Value) -> Result<BundlePlan, AppError> {
        self.bundle_plans
            .update_validated(id, patch, validation::validate_bundle_plan)
            .await?
            .ok_or_else(|| AppError::not_found("bundle plan", id))
    }

    pub async fn delete_bundle_plan(&self, id: &str) -> Result<(), AppError> {
        if !self.bundle_plans.remove(id).await? {
            return Err(AppError::not_found("bundle plan", id));
        }
        Ok(())
    }

    pub async fn active_bundle_plans(&self) -> Result<Vec<BundlePlan>, AppError> {
        Ok(self
            .bundle_plans
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    pub async fn create_location(&self, req: CreateLocationRequest) -> Result<Location, AppError> {
        let location = Location {
            id: ids::generate_id(),
            name: validation::sanitize_input(&req.name),
            description: req
                .description
                .as_deref()
                .map(validation::sanitize_input)
                .filter(|d| !d.is_empty()),
            is_active: req.is_active.unwrap_or(true),
        };
        validation::validate_location(&location)?;
        self.locations.add(location).await
    }

    pub async fn update_location(&self, id: &str, patch: &Value) -> Result<Location, AppError> {
        self.locations
            .update_validated(id, patch, validation::validate_location)
            .await?
            .ok_or_else(|| AppError::not_found("location", id))
    }

    pub async fn delete_location(&self, id: &str) -> Result<(), AppError> {
        if !self.locations.remove(id).await? {
            return Err(AppError::not_found("location", id));
        }
        Ok(())
    }

    pub async fn active_locations(&self) -> Result<Vec<Location>, AppError> {
        Ok(self
            .locations
            .list()
            .await?
            .into_iter()
            .filter(|l| l.is_active)
            .collect())
    }
}
