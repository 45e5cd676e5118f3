//! # 컬렉션 저장소
//!
//! 논리 키 하나(예: `sessions`)에 엔티티 배열 전체를 JSON 문자열로 저장합니다.
//! 부분 쓰기나 인덱스는 없습니다. 모든 변경은 다음 순서를 따릅니다:
//!
//! ```text
//! [잠금] → 전체 읽기(load) → 메모리에서 변경 → 전체 덮어쓰기(save) → [잠금 해제]
//! ```
//!
//! 컬렉션마다 `tokio::sync::Mutex`를 하나씩 가지므로, 같은 컬렉션에 대한
//! 읽기-수정-쓰기는 직렬화됩니다 (동시 요청 간 lost update 방지).
//! 서로 다른 컬렉션 사이의 원자성은 없습니다.
//!
//! 저장된 JSON이 손상되었거나 키가 없으면 빈 컬렉션으로 취급합니다 (앱은 항상 부팅되어야 함).

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::services::validation::ValidationResult;

/// 컬렉션에 저장될 수 있는 엔티티
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// 엔티티 식별자
    fn id(&self) -> &str;

    /// `search()`가 대소문자 무시 부분 문자열로 비교할 필드들 (이름, ID 등)
    fn search_fields(&self) -> Vec<&str>;
}

/// 키의 원시 JSON 문자열을 읽습니다. 키가 없으면 `None`.
pub(crate) async fn read_key(pool: &SqlitePool, key: &str) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// 키의 값을 통째로 덮어씁니다 (없으면 새로 삽입).
pub(crate) async fn write_key(pool: &SqlitePool, key: &str, value: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE
        SET value = excluded.value,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_key(pool: &SqlitePool, key: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

/// 저장된 JSON을 파싱합니다. 실패하면 경고를 남기고 `None`을 돌려줍니다.
pub(crate) fn parse_or_warn<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored data is malformed, treating it as empty");
            None
        }
    }
}

/// 엔티티 `T`의 컬렉션 하나
///
/// `Clone`은 같은 키와 같은 잠금을 공유하는 핸들을 만듭니다.
pub struct Collection<T> {
    pool: SqlitePool,
    key: &'static str,
    lock: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            key: self.key,
            lock: Arc::clone(&self.lock),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(pool: SqlitePool, key: &'static str) -> Self {
        Self {
            pool,
            key,
            lock: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    /// 영속 키 이름 (예: "bundlePlans")
    pub fn key(&self) -> &'static str {
        self.key
    }

    async fn load(&self) -> Result<Vec<T>, AppError> {
        let Some(raw) = read_key(&self.pool, self.key).await? else {
            return Ok(Vec::new());
        };
        Ok(parse_or_warn(self.key, &raw).unwrap_or_default())
    }

    async fn save(&self, records: &[T]) -> Result<(), AppError> {
        let raw = serde_json::to_string(records)?;
        write_key(&self.pool, self.key, &raw).await
    }

    /// 모든 레코드를 저장 순서대로 반환합니다. 저장된 것이 없으면 빈 Vec.
    pub async fn list(&self) -> Result<Vec<T>, AppError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// 레코드를 끝에 추가하고 전체를 다시 저장합니다.
    ///
    /// ID 중복은 검사하지 않습니다. 같은 ID로 두 번 추가하면 두 레코드가 생깁니다.
    pub async fn add(&self, record: T) -> Result<T, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    /// 기존 레코드를 `check`로 검사한 뒤 통과하면 추가합니다. 검사와 추가는 같은 잠금 안에서 일어납니다.
    pub async fn add_checked<F>(&self, record: T, check: F) -> Result<T, AppError>
    where
        F: FnOnce(&[T]) -> Result<(), AppError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        check(&records)?;
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    /// ID가 같은 첫 번째 레코드를 찾습니다 (선형 탐색).
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, AppError> {
        Ok(self.list().await?.into_iter().find(|r| r.id() == id))
    }

    /// 이름/ID 필드에 대한 대소문자 무시 부분 문자열 검색
    ///
    /// 순위 없이 저장 순서를 그대로 유지합니다. 빈 검색어는 전체를 반환합니다.
    pub async fn search(&self, query: &str) -> Result<Vec<T>, AppError> {
        let needle = query.trim().to_lowercase();
        let records = self.list().await?;
        if needle.is_empty() {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .filter(|r| {
                r.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// 첫 번째 일치 레코드에 `patch`(JSON 객체)를 얕게 병합합니다.
    ///
    /// - `Ok(Some(updated))`: 병합 후 저장된 레코드
    /// - `Ok(None)`: 해당 ID가 없음 (아무것도 쓰지 않음)
    pub async fn update(&self, id: &str, patch: &Value) -> Result<Option<T>, AppError> {
        self.modify(id, |record| {
            *record = merge_patch(record, patch)?;
            Ok(())
        })
        .await
    }

    /// `update`와 같지만, 병합 결과가 `validate`를 통과할 때만 저장합니다.
    pub async fn update_validated<V>(
        &self,
        id: &str,
        patch: &Value,
        validate: V,
    ) -> Result<Option<T>, AppError>
    where
        V: FnOnce(&T) -> ValidationResult,
    {
        self.modify(id, |record| {
            let merged = merge_patch(record, patch)?;
            validate(&merged)?;
            *record = merged;
            Ok(())
        })
        .await
    }

    /// 잠금을 쥔 상태에서 첫 번째 일치 레코드를 클로저로 수정합니다.
    ///
    /// 클로저가 에러를 반환하면 아무것도 저장하지 않고 그 에러를 그대로 돌려줍니다.
    /// 상태 전이처럼 "검사 후 갱신"이 원자적이어야 하는 경우에 사용합니다.
    pub async fn modify<F>(&self, id: &str, f: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut T) -> Result<(), AppError>,
    {
        self.modify_checked(id, |record, _| f(record)).await
    }

    /// `modify`와 같지만 클로저가 수정 전 컬렉션 전체도 함께 받습니다.
    ///
    /// 이메일 중복처럼 다른 레코드와 비교하는 검사를 같은 잠금 안에서 할 때 씁니다.
    pub async fn modify_checked<F>(&self, id: &str, f: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut T, &[T]) -> Result<(), AppError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let mut updated = records[index].clone();
        f(&mut updated, &records)?;
        records[index] = updated.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    /// ID가 일치하는 모든 레코드를 제거합니다. 하나라도 지웠으면 `true`.
    pub async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    /// 컬렉션 전체를 주어진 레코드로 교체합니다 (백업 복원용).
    pub async fn replace_all(&self, records: &[T]) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.save(records).await
    }

    /// 키 자체를 삭제합니다.
    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        delete_key(&self.pool, self.key).await
    }

    /// 컬렉션이 비어 있을 때만 기본 레코드를 채웁니다. 채웠으면 `true`.
    ///
    /// 확인과 쓰기가 같은 잠금 안에서 일어나므로 두 번 호출해도 중복되지 않습니다.
    pub async fn seed_if_empty<F>(&self, defaults: F) -> Result<bool, AppError>
    where
        F: FnOnce() -> Vec<T>,
    {
        let _guard = self.lock.lock().await;
        if !self.load().await?.is_empty() {
            return Ok(false);
        }
        self.save(&defaults()).await?;
        Ok(true)
    }
}

/// 레코드를 JSON 객체로 바꾼 뒤 `patch`의 최상위 필드를 덮어쓰고 다시 `T`로 변환합니다.
///
/// `id` 필드는 바꿀 수 없습니다 (패치에 있어도 무시).
pub fn merge_patch<T: Record>(record: &T, patch: &Value) -> Result<T, AppError> {
    let Some(fields) = patch.as_object() else {
        return Err(AppError::BadRequest(
            "Patch must be a JSON object".to_string(),
        ));
    };

    let mut merged = serde_json::to_value(record)?;
    if let Some(target) = merged.as_object_mut() {
        for (key, value) in fields {
            if key == "id" {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
    }

    serde_json::from_value(merged)
        .map_err(|e| AppError::BadRequest(format!("Invalid patch: {}", e)))
}
