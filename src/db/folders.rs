//! # 세션 폴더 인덱스
//!
//! 세션 ID → 업로드된 파일 이름 목록의 보조 매핑입니다 (`sessionFolders` 키).
//! 사진 레코드를 다시 훑지 않고도 "이 세션에 어떤 파일이 있는가"에 답하기 위해 존재하며,
//! 세션의 사진 목록과 항상 같은 순서로 유지됩니다.
//!
//! 직렬화 형태는 연관 리스트입니다: `[["SESSION_ID", ["a_1.jpg", "b_2.jpg"]], ...]`
//!
//! 주의: 세션의 사진 목록 갱신과 이 인덱스 갱신은 서로 다른 두 번의 쓰기입니다.
//! 둘 사이에 프로세스가 죽으면 불일치가 남을 수 있습니다.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::collection::{delete_key, parse_or_warn, read_key, write_key};
use crate::db::keys;
use crate::error::AppError;

/// (세션 ID, 파일 이름 목록) 쌍의 목록
pub type FolderEntries = Vec<(String, Vec<String>)>;

#[derive(Clone)]
pub struct SessionFolders {
    pool: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl SessionFolders {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<FolderEntries, AppError> {
        let Some(raw) = read_key(&self.pool, keys::SESSION_FOLDERS).await? else {
            return Ok(Vec::new());
        };
        Ok(parse_or_warn(keys::SESSION_FOLDERS, &raw).unwrap_or_default())
    }

    async fn save(&self, entries: &FolderEntries) -> Result<(), AppError> {
        let raw = serde_json::to_string(entries)?;
        write_key(&self.pool, keys::SESSION_FOLDERS, &raw).await
    }

    /// 잠금을 쥔 채로 세션 항목 하나를 수정합니다.
    ///
    /// 항목이 없으면 `create`가 true일 때만 빈 목록으로 만들고, 아니면 아무것도 쓰지 않습니다.
    async fn edit<F>(&self, session_id: &str, create: bool, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        match entries.iter_mut().find(|(id, _)| id == session_id) {
            Some((_, files)) => f(files),
            None if create => {
                let mut files = Vec::new();
                f(&mut files);
                entries.push((session_id.to_string(), files));
            }
            None => {
                tracing::debug!(session_id, "No folder for session, skipping index update");
                return Ok(());
            }
        }
        self.save(&entries).await
    }

    /// 전체 인덱스
    pub async fn entries(&self) -> Result<FolderEntries, AppError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// 세션 폴더를 빈 목록으로 (재)생성합니다.
    pub async fn create_folder(&self, session_id: &str) -> Result<(), AppError> {
        self.edit(session_id, true, |files| files.clear()).await
    }

    /// 폴더가 있는 세션에만 파일 이름을 덧붙입니다. 삭제된 세션의 폴더를 되살리지 않습니다.
    pub async fn add_file(&self, session_id: &str, file_name: &str) -> Result<(), AppError> {
        self.edit(session_id, false, |files| files.push(file_name.to_string()))
            .await
    }

    /// 같은 이름이 여러 개 있어도 첫 번째 하나만 지웁니다.
    pub async fn remove_file(&self, session_id: &str, file_name: &str) -> Result<(), AppError> {
        self.edit(session_id, false, |files| {
            if let Some(index) = files.iter().position(|f| f == file_name) {
                files.remove(index);
            }
        })
        .await
    }

    /// 세션 폴더 항목을 통째로 삭제합니다. 없으면 아무것도 하지 않습니다.
    pub async fn delete_folder(&self, session_id: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|(id, _)| id != session_id);
        if entries.len() != before {
            self.save(&entries).await?;
        }
        Ok(())
    }

    /// 세션의 파일 이름 목록 (폴더가 없으면 빈 목록)
    pub async fn files(&self, session_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .find(|(id, _)| id == session_id)
            .map(|(_, files)| files)
            .unwrap_or_default())
    }

    pub async fn replace_all(&self, entries: &FolderEntries) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.save(entries).await
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        delete_key(&self.pool, keys::SESSION_FOLDERS).await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Store;

    #[tokio::test]
    async fn files_follow_add_and_remove() {
        let store = Store::in_memory().await.unwrap();
        let folders = &store.folders;

        folders.create_folder("S1").await.unwrap();
        folders.create_folder("S2").await.unwrap();
        folders.add_file("S1", "a_1.jpg").await.unwrap();
        folders.add_file("S1", "b_2.jpg").await.unwrap();
        folders.add_file("S2", "c_3.jpg").await.unwrap();
        assert_eq!(folders.files("S1").await.unwrap(), vec!["a_1.jpg", "b_2.jpg"]);

        folders.remove_file("S1", "a_1.jpg").await.unwrap();
        assert_eq!(folders.files("S1").await.unwrap(), vec!["b_2.jpg"]);

        folders.delete_folder("S1").await.unwrap();
        assert!(folders.files("S1").await.unwrap().is_empty());
        assert_eq!(folders.files("S2").await.unwrap(), vec!["c_3.jpg"]);
    }

    #[tokio::test]
    async fn index_is_stored_as_an_association_list() {
        let store = Store::in_memory().await.unwrap();
        store.folders.create_folder("S1").await.unwrap();
        store.folders.add_file("S1", "a_1.jpg").await.unwrap();

        let raw = crate::db::collection::read_key(store.pool(), "sessionFolders")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw, r#"[["S1",["a_1.jpg"]]]"#);
    }

    #[tokio::test]
    async fn remove_file_drops_a_single_duplicate() {
        let store = Store::in_memory().await.unwrap();
        let folders = &store.folders;
        folders.create_folder("S1").await.unwrap();
        folders.add_file("S1", "a.jpg").await.unwrap();
        folders.add_file("S1", "a.jpg").await.unwrap();

        folders.remove_file("S1", "a.jpg").await.unwrap();
        assert_eq!(folders.files("S1").await.unwrap(), vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn files_are_not_added_to_missing_folders() {
        let store = Store::in_memory().await.unwrap();
        store.folders.add_file("gone", "a.jpg").await.unwrap();
        store.folders.remove_file("gone", "a.jpg").await.unwrap();
        assert!(store.folders.entries().await.unwrap().is_empty());
    }
}
