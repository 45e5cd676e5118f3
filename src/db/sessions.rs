//! # 세션 저장소 연산
//!
//! 세션 컬렉션 위에 얹힌 도메인 연산들입니다. 세션 생성 시 ID와 PIN을 발급하고,
//! 사진 목록이 바뀔 때마다 세션 폴더 인덱스도 함께 갱신합니다.
//!
//! 존재하지 않는 세션/사진을 대상으로 한 변경은 조용히 무시하지 않고 `AppError::NotFound`를 돌려줍니다.

use serde_json::Value;

use crate::db::Store;
use crate::error::AppError;
use crate::models::*;
use crate::services::uploads::unique_file_name;
use crate::services::{ids, validation};

/// 새 세션 ID를 만드는 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionIdStyle {
    /// UUIDv7
    #[default]
    Generated,
    /// 이름 기반 "SMITHF123456" 형태 (URL에 그대로 노출되는 입장 토큰)
    Readable,
}

impl Store {
    /// 세션을 만듭니다: 입력 정리 → 검증 → ID/PIN 발급 → 저장 → 빈 폴더 생성
    pub async fn create_session(
        &self,
        req: CreateSessionRequest,
        style: SessionIdStyle,
    ) -> Result<Session, AppError> {
        let name = validation::sanitize_input(&req.name);
        let id = match style {
            SessionIdStyle::Generated => ids::generate_id(),
            SessionIdStyle::Readable => ids::generate_session_readable_id(&name),
        };

        let session = Session {
            id,
            name,
            location: validation::sanitize_input(&req.location),
            pin: ids::generate_pin(),
            photographer_id: req.photographer_id.trim().to_string(),
            created_at: chrono::Utc::now(),
            photos: Vec::new(),
            status: SessionStatus::Active,
        };
        validation::validate_session(&session)?;

        let session = self.sessions.add(session).await?;
        self.folders.create_folder(&session.id).await?;
        tracing::info!(session_id = %session.id, name = %session.name, "Created session");
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> Result<Session, AppError> {
        self.sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("session", id))
    }

    pub async fn sessions_for_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Session>, AppError> {
        Ok(self
            .sessions
            .list()
            .await?
            .into_iter()
            .filter(|s| s.photographer_id == photographer_id)
            .collect())
    }

    /// 세션의 일반 필드(이름, 장소 등)를 부분 수정합니다.
    ///
    /// 상태와 사진 목록은 전용 연산으로만 바뀌어야 하므로 패치에 있으면 거부합니다.
    pub async fn update_session(&self, id: &str, patch: &Value) -> Result<Session, AppError> {
        if let Some(fields) = patch.as_object() {
            for key in ["status", "photos", "pin"] {
                if fields.contains_key(key) {
                    return Err(AppError::BadRequest(format!(
                        "Field '{}' cannot be changed through a session patch",
                        key
                    )));
                }
            }
        }

        self.sessions
            .update_validated(id, patch, validation::validate_session)
            .await?
            .ok_or_else(|| AppError::not_found("session", id))
    }

    /// 세션을 삭제하고 폴더 인덱스 항목도 제거합니다.
    pub async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.photo_lock.lock().await;
        if !self.sessions.remove(id).await? {
            return Err(AppError::not_found("session", id));
        }
        self.folders.delete_folder(id).await?;
        tracing::info!(session_id = %id, "Deleted session");
        Ok(())
    }

    /// 사진을 세션 끝에 추가하고 파일 이름을 폴더 인덱스에 기록합니다.
    ///
    /// 파일 이름이 세션의 다른 사진과 겹치면 세션 잠금 안에서 새 이름을 붙입니다.
    /// 반환값은 최종 이름이 들어간 사진입니다.
    pub async fn add_photo(&self, session_id: &str, photo: Photo) -> Result<Photo, AppError> {
        let _guard = self.photo_lock.lock().await;
        let mut added = None;
        self.sessions
            .modify(session_id, |session| {
                let existing: Vec<&str> =
                    session.photos.iter().map(|p| p.file_name.as_str()).collect();
                let mut photo = photo;
                photo.file_name = unique_file_name(&photo.file_name, &existing);
                added = Some(photo.clone());
                session.photos.push(photo);
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("session", session_id))?;

        let photo = added.ok_or_else(|| AppError::not_found("session", session_id))?;
        self.folders.add_file(session_id, &photo.file_name).await?;
        Ok(photo)
    }

    /// 세션에서 사진 한 장을 빼고, 빠진 사진을 돌려줍니다.
    pub async fn remove_photo(&self, session_id: &str, photo_id: &str) -> Result<Photo, AppError> {
        let _guard = self.photo_lock.lock().await;
        let mut removed = None;
        self.sessions
            .modify(session_id, |session| {
                let index = session
                    .photos
                    .iter()
                    .position(|p| p.id == photo_id)
                    .ok_or_else(|| AppError::not_found("photo", photo_id))?;
                removed = Some(session.photos.remove(index));
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("session", session_id))?;

        let photo = removed.ok_or_else(|| AppError::not_found("photo", photo_id))?;
        self.folders.remove_file(session_id, &photo.file_name).await?;
        Ok(photo)
    }

    /// 고객 입장 확인. PIN 형식이 틀리면 검증 에러, 값이 다르면 401입니다.
    pub async fn verify_pin(&self, session_id: &str, pin: &str) -> Result<Session, AppError> {
        let pin = pin.trim();
        if !validation::is_valid_pin(pin) {
            return Err(validation::ValidationError::new("PIN must be exactly 4 digits", "pin").into());
        }

        let session = self.get_session(session_id).await?;
        if session.pin != pin {
            tracing::warn!(session_id = %session_id, "Rejected session access with wrong PIN");
            return Err(AppError::Unauthorized("Invalid PIN".to_string()));
        }
        Ok(session)
    }

    /// 세션 상태를 앞으로만 옮깁니다 (`active → completed → printed`).
    pub async fn advance_session_status(
        &self,
        session_id: &str,
        next: SessionStatus,
    ) -> Result<Session, AppError> {
        self.sessions
            .modify(session_id, |session| {
                session.status = session.status.advance_to(next)?;
                Ok(())
            })
            .await?
            .ok_or_else(|| AppError::not_found("session", session_id))
    }

    /// 세션 폴더 구조 (원본/편집본/썸네일 경로 + 인덱스의 파일 목록)
    pub async fn folder_structure(&self, session_id: &str) -> Result<SessionFolderStructure, AppError> {
        let session = self.get_session(session_id).await?;
        Ok(SessionFolderStructure {
            session_id: session.id.clone(),
            session_name: session.name,
            original_photos: session.photos.len(),
            folders: SessionFolderPaths::for_session(&session.id),
            files: self.folders.files(&session.id).await?,
        })
    }

    /// 세션에 속한 주문들 (저장 순서)
    pub async fn orders_for_session(&self, session_id: &str) -> Result<Vec<Order>, AppError> {
        Ok(self
            .orders
            .list()
            .await?
            .into_iter()
            .filter(|o| o.session_id == session_id)
            .collect())
    }
}
