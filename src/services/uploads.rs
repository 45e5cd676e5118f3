//! # 사진 업로드 처리
//!
//! 원시 파일 + 대상 세션 ID를 받아 영속 `Photo` 레코드로 바꿉니다.
//!
//! ## 처리 흐름 (파일 하나)
//! ```text
//! 이미지 검증(타입 → 크기) ──실패──▶ Rejected (아무것도 쓰지 않음)
//!        │
//!        ▼
//! 파일 이름 생성 → object URL 등록 → 세션에 사진 추가 → 폴더 인덱스에 파일 이름 기록 ──▶ Uploaded
//! ```
//!
//! 최종 파일 이름은 `Store::add_photo`가 세션 잠금 안에서 확정합니다.
//! 같은 이름을 동시에 올려도 세션 안에서 겹치지 않습니다.
//!
//! 여러 파일을 올릴 때는 파일마다 결과를 하나씩 돌려줍니다. 한 파일이 실패해도 나머지는 계속 처리합니다.
//!
//! 업로드된 바이트는 디스크가 아니라 `ObjectUrls` 레지스트리(메모리)에만 있습니다.
//! 서버가 재시작되면 URL은 더 이상 열리지 않지만 사진 레코드는 남습니다.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::Store;
use crate::error::AppError;
use crate::models::Photo;
use crate::services::{ids, validation};

/// object URL이 붙는 경로 접두사 (`GET /api/v1/blobs/{id}`로 서빙)
pub const BLOB_URL_PREFIX: &str = "/api/v1/blobs";

/// 업로드된 파일 하나
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 사용자가 올린 원래 파일 이름
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// 메모리에 보관된 파일 내용
#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub data: Bytes,
}

/// object URL → 파일 내용 레지스트리
///
/// 브라우저의 `URL.createObjectURL`과 같은 역할입니다. 프로세스가 살아 있는 동안만 유효합니다.
#[derive(Clone, Default)]
pub struct ObjectUrls {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// 내용을 등록하고 새 URL(`/api/v1/blobs/<id>`)을 돌려줍니다.
    pub async fn create(&self, content_type: &str, data: Bytes) -> String {
        let id = ids::generate_id();
        self.blobs.write().await.insert(
            id.clone(),
            Blob {
                content_type: content_type.to_string(),
                data,
            },
        );
        format!("{}/{}", BLOB_URL_PREFIX, id)
    }

    /// blob ID로 내용을 찾습니다.
    pub async fn get(&self, id: &str) -> Option<Blob> {
        self.blobs.read().await.get(id).cloned()
    }

    /// URL이 가리키는 내용을 해제합니다. 이 레지스트리의 URL이 아니면 아무것도 하지 않습니다.
    pub async fn revoke(&self, url: &str) {
        if let Some(id) = blob_id(url) {
            self.blobs.write().await.remove(id);
        }
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

fn blob_id(url: &str) -> Option<&str> {
    url.strip_prefix(BLOB_URL_PREFIX)?.strip_prefix('/')
}

/// 파일 하나의 업로드 결과
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Uploaded {
        photo: Photo,
    },
    #[serde(rename_all = "camelCase")]
    Rejected {
        file_name: String,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
    },
}

impl UploadOutcome {
    pub fn photo(&self) -> Option<&Photo> {
        match self {
            UploadOutcome::Uploaded { photo } => Some(photo),
            UploadOutcome::Rejected { .. } => None,
        }
    }

    fn rejected(file: &UploadedFile, reason: impl Into<String>, field: Option<&'static str>) -> Self {
        UploadOutcome::Rejected {
            file_name: file.name.clone(),
            reason: reason.into(),
            field,
        }
    }
}

#[derive(Clone)]
pub struct UploadProcessor {
    store: Store,
    urls: ObjectUrls,
}

impl UploadProcessor {
    pub fn new(store: Store, urls: ObjectUrls) -> Self {
        Self { store, urls }
    }

    /// 파일 하나를 처리합니다.
    ///
    /// 검증 실패와 없는 세션은 `Rejected`로, 저장소 오류만 `Err`로 돌려줍니다.
    pub async fn process_upload(
        &self,
        session_id: &str,
        file: UploadedFile,
    ) -> Result<UploadOutcome, AppError> {
        if let Err(e) = validation::validate_image_file(&file.content_type, file.data.len() as u64) {
            tracing::debug!(file = %file.name, reason = %e.message, "Rejected upload");
            return Ok(UploadOutcome::rejected(&file, e.message, e.field));
        }

        if self.store.sessions.find_by_id(session_id).await?.is_none() {
            return Ok(UploadOutcome::rejected(&file, "Session not found", None));
        }

        let file_name = derive_file_name(&file.name, Utc::now().timestamp_millis(), &[]);
        let url = self.urls.create(&file.content_type, file.data.clone()).await;

        let photo = Photo {
            id: ids::generate_id(),
            session_id: session_id.to_string(),
            original_name: file.name.clone(),
            file_name,
            uploaded_at: Utc::now(),
            url: url.clone(),
            thumbnail_url: Some(url.clone()),
        };

        match self.store.add_photo(session_id, photo).await {
            Ok(photo) => {
                tracing::info!(session_id = %session_id, file = %photo.file_name, "Uploaded photo");
                Ok(UploadOutcome::Uploaded { photo })
            }
            // 확인과 추가 사이에 세션이 지워진 경우
            Err(AppError::NotFound(_)) => {
                self.urls.revoke(&url).await;
                Ok(UploadOutcome::rejected(&file, "Session not found", None))
            }
            Err(e) => {
                self.urls.revoke(&url).await;
                Err(e)
            }
        }
    }

    /// 파일들을 순서대로 처리하고 파일마다 결과를 하나씩 돌려줍니다.
    pub async fn process_multiple(
        &self,
        session_id: &str,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<UploadOutcome>, AppError> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.process_upload(session_id, file).await?);
        }
        Ok(outcomes)
    }
}

/// 저장용 파일 이름: `<영숫자만 남긴 원래 이름>_<밀리초>.<확장자>`
///
/// 확장자가 없으면 `jpg`, 이름에 영숫자가 하나도 없으면 `photo`를 씁니다.
/// 같은 세션 폴더에 이미 같은 이름이 있으면 타임스탬프를 1씩 올립니다.
pub fn derive_file_name(original: &str, millis: i64, existing: &[String]) -> String {
    let (stem, extension) = match original.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, ext),
        _ => (original, "jpg"),
    };
    let first_part = stem.split('.').next().unwrap_or_default();
    let mut base: String = first_part.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if base.is_empty() {
        base = "photo".to_string();
    }

    unique_file_name(&format!("{}_{}.{}", base, millis, extension), existing)
}

/// `candidate`가 `existing`에 없으면 그대로, 있으면 끝의 `_<숫자>`를 1씩 올려 비어 있는 이름을 찾습니다.
///
/// 끝에 숫자가 없으면 `_1`부터 붙입니다: `IMG_001.jpg` → `IMG_002.jpg`, `cover.jpg` → `cover_1.jpg`
pub fn unique_file_name<S: AsRef<str>>(candidate: &str, existing: &[S]) -> String {
    let taken = |name: &str| existing.iter().any(|f| f.as_ref() == name);
    if !taken(candidate) {
        return candidate.to_string();
    }

    let (stem, extension) = match candidate.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (candidate, None),
    };
    let (prefix, mut number, width) = match stem.rsplit_once('_') {
        Some((prefix, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            match digits.parse::<u64>() {
                Ok(n) => (prefix, n, digits.len()),
                Err(_) => (stem, 0, 1),
            }
        }
        _ => (stem, 0, 1),
    };

    loop {
        number += 1;
        let name = match extension {
            Some(ext) => format!("{}_{:0width$}.{}", prefix, number, ext, width = width),
            None => format!("{}_{:0width$}", prefix, number, width = width),
        };
        if !taken(&name) {
            return name;
        }
    }
}

/// 바이트 수를 사람이 읽는 단위로 바꿉니다 (1024 단위, 소수점 둘째 자리까지, 끝의 0은 생략).
///
/// `0 → "0 Bytes"`, `1536 → "1.5 KB"`, `10485760 → "10 MB"`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SessionIdStyle;
    use crate::models::CreateSessionRequest;

    const MIB: usize = 1024 * 1024;

    fn file(name: &str, content_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            content_type: content_type.to_string(),
            data: Bytes::from(vec![0u8; size]),
        }
    }

    async fn setup() -> (Store, UploadProcessor, String) {
        let store = Store::in_memory().await.unwrap();
        let session = store
            .create_session(
                CreateSessionRequest {
                    name: "Smith Family".into(),
                    location: "Beach Resort".into(),
                    photographer_id: "p1".into(),
                },
                SessionIdStyle::Generated,
            )
            .await
            .unwrap();
        let processor = UploadProcessor::new(store.clone(), ObjectUrls::new());
        (store, processor, session.id)
    }

    #[tokio::test]
    async fn pdf_is_rejected_for_its_type() {
        let (store, processor, session_id) = setup().await;
        let outcome = processor
            .process_upload(&session_id, file("doc.pdf", "application/pdf", 1024))
            .await
            .unwrap();
        match outcome {
            UploadOutcome::Rejected { field, .. } => assert_eq!(field, Some("type")),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(store.get_session(&session_id).await.unwrap().photos.is_empty());
    }

    #[tokio::test]
    async fn oversized_jpeg_is_rejected_for_its_size() {
        let (_store, processor, session_id) = setup().await;
        let outcome = processor
            .process_upload(&session_id, file("big.jpg", "image/jpeg", 11 * MIB))
            .await
            .unwrap();
        assert!(matches!(outcome, UploadOutcome::Rejected { field: Some("size"), .. }));
    }

    #[tokio::test]
    async fn valid_jpeg_becomes_a_photo_of_the_session() {
        let (store, processor, session_id) = setup().await;
        let outcome = processor
            .process_upload(&session_id, file("IMG 001.jpg", "image/jpeg", 9 * MIB))
            .await
            .unwrap();

        let photo = outcome.photo().cloned().unwrap();
        assert_eq!(photo.session_id, session_id);
        assert_eq!(photo.original_name, "IMG 001.jpg");
        assert!(photo.file_name.starts_with("IMG001_"));
        assert!(photo.file_name.ends_with(".jpg"));
        assert_eq!(photo.thumbnail_url.as_deref(), Some(photo.url.as_str()));

        let blob_id = photo.url.rsplit('/').next().unwrap();
        let blob = processor.urls.get(blob_id).await.unwrap();
        assert_eq!(blob.data.len(), 9 * MIB);

        assert_eq!(store.folders.files(&session_id).await.unwrap(), vec![photo.file_name]);
    }

    #[tokio::test]
    async fn batch_reports_each_file_and_keeps_going() {
        let (store, processor, session_id) = setup().await;
        let outcomes = processor
            .process_multiple(
                &session_id,
                vec![
                    file("a.jpg", "image/jpeg", 1024),
                    file("b.gif", "image/gif", 1024),
                    file("a.jpg", "image/png", 2048),
                ],
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].photo().is_some());
        assert!(outcomes[1].photo().is_none());
        assert!(outcomes[2].photo().is_some());

        // 같은 이름을 같은 밀리초에 올려도 파일 이름은 겹치지 않음
        let files = store.folders.files(&session_id).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_ne!(files[0], files[1]);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected_without_registering_bytes() {
        let (_store, processor, _) = setup().await;
        let outcome = processor
            .process_upload("missing", file("a.jpg", "image/jpeg", 1024))
            .await
            .unwrap();
        assert!(matches!(outcome, UploadOutcome::Rejected { .. }));
        assert_eq!(processor.urls.len().await, 0);
    }

    #[tokio::test]
    async fn revoked_urls_stop_resolving() {
        let urls = ObjectUrls::new();
        let url = urls.create("image/png", Bytes::from_static(b"png")).await;
        let id = url.rsplit('/').next().unwrap().to_string();
        assert!(urls.get(&id).await.is_some());

        urls.revoke(&url).await;
        assert!(urls.get(&id).await.is_none());
    }

    #[test]
    fn file_names_keep_alphanumerics_and_extension() {
        assert_eq!(derive_file_name("IMG_001.jpg", 1700, &[]), "IMG001_1700.jpg");
        assert_eq!(derive_file_name("beach day.png", 5, &[]), "beachday_5.png");
        assert_eq!(derive_file_name("noext", 5, &[]), "noext_5.jpg");
        assert_eq!(derive_file_name("@@.webp", 5, &[]), "photo_5.webp");
        assert_eq!(derive_file_name("a.b.jpeg", 5, &[]), "a_5.jpeg");
    }

    #[test]
    fn file_name_collisions_bump_the_stamp() {
        let existing = vec!["a_5.jpg".to_string(), "a_6.jpg".to_string()];
        assert_eq!(derive_file_name("a.jpg", 5, &existing), "a_7.jpg");
    }

    #[test]
    fn taken_names_get_the_next_free_suffix() {
        assert_eq!(unique_file_name("cover.jpg", &["x.jpg"]), "cover.jpg");
        assert_eq!(unique_file_name("cover.jpg", &["cover.jpg"]), "cover_1.jpg");
        assert_eq!(
            unique_file_name("IMG_001.jpg", &["IMG_001.jpg", "IMG_002.jpg"]),
            "IMG_003.jpg"
        );
        assert_eq!(unique_file_name("raw", &["raw"]), "raw_1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_same_name_uploads_keep_names_unique() {
        let (store, processor, session_id) = setup().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let processor = processor.clone();
            let session_id = session_id.clone();
            handles.push(tokio::spawn(async move {
                processor
                    .process_upload(&session_id, file("a.jpg", "image/jpeg", 16))
                    .await
                    .unwrap()
            }));
        }
        let mut uploaded = Vec::new();
        for handle in handles {
            uploaded.push(handle.await.unwrap().photo().cloned().unwrap());
        }

        let session = store.get_session(&session_id).await.unwrap();
        let mut names: Vec<String> = session.photos.iter().map(|p| p.file_name.clone()).collect();
        assert_eq!(store.folders.files(&session_id).await.unwrap(), names);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);

        // 돌려받은 사진도 저장된 이름과 같아야 합니다
        for photo in &uploaded {
            assert!(session.photos.contains(photo));
        }

        store.remove_photo(&session_id, &uploaded[0].id).await.unwrap();
        let session = store.get_session(&session_id).await.unwrap();
        let names: Vec<String> = session.photos.iter().map(|p| p.file_name.clone()).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(store.folders.files(&session_id).await.unwrap(), names);
    }

    #[test]
    fn sizes_use_base_1024() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
