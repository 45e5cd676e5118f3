//! # 사진작가 / 관리자 계정
//!
//! 계정 검증과 이메일 중복 검사, 활성화 토글, 로그인 기록(`lastLogin`)을 담당합니다.
//!
//! 비밀번호는 평문으로 저장되고 평문으로 비교됩니다. 인증 보안은 이 서비스의 범위 밖이며,
//! 여기서의 로그인은 "누가 대시보드를 쓰는가"를 기록하는 정도의 의미만 가집니다.

use chrono::Utc;
use serde_json::Value;

use crate::db::{merge_patch, Store};
use crate::error::AppError;
use crate::models::*;
use crate::services::{ids, validation};

impl Store {
    /// 사진작가 계정을 만듭니다. 이메일은 대소문자 무시로 유일해야 합니다.
    pub async fn create_photographer(
        &self,
        req: CreatePhotographerRequest,
    ) -> Result<Photographer, AppError> {
        let photographer = Photographer {
            id: ids::generate_id(),
            name: validation::sanitize_input(&req.name),
            email: req.email.trim().to_string(),
            password: req.password,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        validation::validate_photographer(&photographer)?;

        let photographer = self
            .photographers
            .add_checked(photographer, |existing| {
                let emails: Vec<&str> = existing.iter().map(|p| p.email.as_str()).collect();
                validation::validate_unique_email(&req.email, &emails)?;
                Ok(())
            })
            .await?;
        tracing::info!(photographer_id = %photographer.id, "Created photographer");
        Ok(photographer)
    }

    /// 부분 수정. 바뀐 이메일이 다른 계정과 겹치면 거부합니다.
    pub async fn update_photographer(
        &self,
        id: &str,
        patch: &Value,
    ) -> Result<Photographer, AppError> {
        self.photographers
            .modify_checked(id, |record, all| {
                let merged = merge_patch(record, patch)?;
                validation::validate_photographer(&merged)?;
                let others: Vec<&str> = all
                    .iter()
                    .filter(|p| p.id != id)
                    .map(|p| p.email.as_str())
                    .collect();
                validation::validate_unique_email(&merged.email, &others)?;
                *record = merged;
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("photographer", id))
    }

    pub async fn set_photographer_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<Photographer, AppError> {
        self.photographers
            .modify(id, |p| {
                p.is_active = is_active;
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("photographer", id))
    }

    pub async fn delete_photographer(&self, id: &str) -> Result<(), AppError> {
        if !self.photographers.remove(id).await? {
            return Err(AppError::not_found("photographer", id));
        }
        Ok(())
    }

    /// 이메일(대소문자 무시) + 비밀번호가 일치하는 활성 사진작가를 찾아 `lastLogin`을 기록합니다.
    pub async fn login_photographer(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Photographer, AppError> {
        let email = email.trim().to_lowercase();
        let matched = self
            .photographers
            .list()
            .await?
            .into_iter()
            .find(|p| p.email.to_lowercase() == email && p.password == password);

        let Some(photographer) = matched else {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        };
        if !photographer.is_active {
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        let now = Utc::now();
        self.photographers
            .modify(&photographer.id, |p| {
                p.last_login = Some(now);
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("photographer", &photographer.id))
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> Result<Admin, AppError> {
        let username = username.trim();
        let matched = self
            .admins
            .list()
            .await?
            .into_iter()
            .find(|a| a.username == username && a.password == password);

        let Some(admin) = matched else {
            return Err(AppError::Unauthorized("Invalid username or password".to_string()));
        };

        let now = Utc::now();
        self.admins
            .modify(&admin.id, |a| {
                a.last_login = Some(now);
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("admin", &admin.id))
    }
}
