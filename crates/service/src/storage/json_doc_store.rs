use std::{io::ErrorKind, path::{Path, PathBuf}, sync::Arc};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, warn};

use crate::errors::ServiceError;

/// Per-path write locks shared by every store instance in the process, so a
/// typed store and the raw pass-through never interleave on one file.
static WRITE_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

fn write_lock(path: &Path) -> Arc<Mutex<()>> {
    WRITE_LOCKS
        .entry(path.to_path_buf())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

type Check<T> = Arc<dyn Fn(&T) -> Result<(), ServiceError> + Send + Sync>;

/// Whole-document JSON file store.
///
/// - `get` reads the full file every call; a missing file is created with
///   the default, unparsable content is logged and masked by the default
///   (the file is left as is).
/// - `save` overwrites the whole document via `<file>.<id>.tmp` + rename.
///   Last writer wins.
#[derive(Clone)]
pub struct JsonDocStore<T> {
    file_path: PathBuf,
    entity: String,
    default: T,
    pretty: bool,
    check: Option<Check<T>>,
}

impl<T> JsonDocStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// No I/O happens until the first `get` or `save`.
    pub fn new<P: Into<PathBuf>>(entity: impl Into<String>, path: P, default: T) -> Self {
        Self { file_path: path.into(), entity: entity.into(), default, pretty: true, check: None }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Extra shape check run after deserializing on read and before writing
    /// on save.
    pub fn with_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), ServiceError> + Send + Sync + 'static,
    {
        self.check = Some(Arc::new(f));
        self
    }

    fn encode(&self, value: &T) -> Result<Vec<u8>, ServiceError> {
        let res = if self.pretty { serde_json::to_vec_pretty(value) } else { serde_json::to_vec(value) };
        res.map_err(|e| ServiceError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, ServiceError> {
        let value: T = serde_json::from_slice(bytes).map_err(|e| ServiceError::Validation(e.to_string()))?;
        if let Some(check) = &self.check {
            check(&value)?;
        }
        Ok(value)
    }

    /// Load the document, creating it with the default when absent.
    pub async fn get(&self) -> Result<T, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => Ok(self.decode_or_default(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => self.write_default_if_absent().await,
            Err(e) => {
                error!(entity = %self.entity, path = %self.file_path.display(), error = %e, "read failed");
                Err(ServiceError::Io(e.to_string()))
            }
        }
    }

    /// A `save` may land between the failed read and here, so the existence
    /// check is repeated under the write lock and a saved document wins.
    async fn write_default_if_absent(&self) -> Result<T, ServiceError> {
        let lock = write_lock(&self.file_path);
        let guard = lock.lock().await;

        match fs::try_exists(&self.file_path).await {
            Ok(true) => {
                drop(guard);
                return self.read_existing().await;
            }
            Ok(false) => {}
            Err(e) => return Err(self.io_failure("stat", e)),
        }
        debug!(entity = %self.entity, path = %self.file_path.display(), "document missing; writing default");
        self.write_locked(&self.default).await?;
        Ok(self.default.clone())
    }

    async fn read_existing(&self) -> Result<T, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(|e| {
            error!(entity = %self.entity, path = %self.file_path.display(), error = %e, "read failed");
            ServiceError::Io(e.to_string())
        })?;
        Ok(self.decode_or_default(&bytes))
    }

    fn decode_or_default(&self, bytes: &[u8]) -> T {
        match self.decode(bytes) {
            Ok(value) => {
                debug!(entity = %self.entity, path = %self.file_path.display(), bytes = bytes.len(), "document loaded");
                value
            }
            Err(e) => {
                error!(entity = %self.entity, path = %self.file_path.display(), error = %e, "unparsable document; serving default");
                self.default.clone()
            }
        }
    }

    /// Replace the whole document.
    pub async fn save(&self, value: &T) -> Result<(), ServiceError> {
        if let Some(check) = &self.check {
            check(value)?;
        }
        self.write(value).await
    }

    async fn write(&self, value: &T) -> Result<(), ServiceError> {
        let lock = write_lock(&self.file_path);
        let _guard = lock.lock().await;
        self.write_locked(value).await
    }

    /// Caller holds the path's write lock.
    async fn write_locked(&self, value: &T) -> Result<(), ServiceError> {
        let data = self.encode(value)?;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| self.io_failure("create_dir", e))?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &data).await.map_err(|e| self.io_failure("write", e))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            if fs::remove_file(&tmp).await.is_err() {
                warn!(path = %tmp.display(), "stale temp file left behind");
            }
            return Err(self.io_failure("rename", e));
        }
        debug!(entity = %self.entity, path = %self.file_path.display(), bytes = data.len(), "document saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.entity.clone());
        self.file_path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    fn io_failure(&self, op: &'static str, e: std::io::Error) -> ServiceError {
        error!(entity = %self.entity, path = %self.file_path.display(), op, error = %e, "write failed");
        ServiceError::Io(format!("{op} {}: {e}", self.file_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
    }

    fn tmp_file(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_doc_store_{}", uuid::Uuid::new_v4()))
            .join(format!("{tag}.json"))
    }

    #[tokio::test]
    async fn first_get_writes_default() -> Result<(), anyhow::Error> {
        let path = tmp_file("notes");
        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new());

        assert!(store.get().await?.is_empty());
        let on_disk = tokio::fs::read_to_string(&path).await?;
        assert_eq!(on_disk, "[]");

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_whole_document_pretty() -> Result<(), anyhow::Error> {
        let path = tmp_file("notes");
        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new());

        store.save(&vec![Note { id: 1, text: "a".into() }, Note { id: 2, text: "b".into() }]).await?;
        store.save(&vec![Note { id: 3, text: "c".into() }]).await?;

        let loaded = store.get().await?;
        assert_eq!(loaded, vec![Note { id: 3, text: "c".into() }]);

        let on_disk = tokio::fs::read_to_string(&path).await?;
        assert!(on_disk.contains("\n  {\n    \"id\": 3"), "not 2-space pretty: {on_disk}");

        // no temp files left in the directory
        let mut entries = tokio::fs::read_dir(path.parent().unwrap()).await?;
        let mut names = Vec::new();
        while let Some(e) = entries.next_entry().await? {
            names.push(e.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["notes.json".to_string()]);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_serves_default_and_is_left_untouched() -> Result<(), anyhow::Error> {
        let path = tmp_file("notes");
        tokio::fs::create_dir_all(path.parent().unwrap()).await?;
        tokio::fs::write(&path, b"{ not json").await?;

        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, vec![Note { id: 0, text: "d".into() }]);
        let loaded = store.get().await?;
        assert_eq!(loaded, vec![Note { id: 0, text: "d".into() }]);
        assert_eq!(tokio::fs::read(&path).await?, b"{ not json");

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn check_rejects_on_save_and_masks_on_read() -> Result<(), anyhow::Error> {
        let path = tmp_file("notes");
        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new()).with_check(|notes| {
            if notes.iter().any(|n| n.text.is_empty()) {
                return Err(ServiceError::Validation("empty text".into()));
            }
            Ok(())
        });

        let bad = vec![Note { id: 1, text: String::new() }];
        assert!(matches!(store.save(&bad).await, Err(ServiceError::Validation(_))));
        assert!(tokio::fs::metadata(&path).await.is_err());

        tokio::fs::create_dir_all(path.parent().unwrap()).await?;
        tokio::fs::write(&path, serde_json::to_vec(&bad)?).await?;
        assert!(store.get().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_saves_leave_one_intact_payload() -> Result<(), anyhow::Error> {
        let path = tmp_file("notes");
        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new());

        let big_a: Vec<Note> = (0..500).map(|i| Note { id: i, text: "a".repeat(64) }).collect();
        let big_b: Vec<Note> = (0..700).map(|i| Note { id: i, text: "b".repeat(64) }).collect();

        let mut tasks = Vec::new();
        for round in 0..8 {
            let s = store.clone();
            let payload = if round % 2 == 0 { big_a.clone() } else { big_b.clone() };
            tasks.push(tokio::spawn(async move { s.save(&payload).await }));
        }
        for t in tasks {
            t.await??;
        }

        let loaded = store.get().await?;
        assert!(loaded == big_a || loaded == big_b);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn first_read_never_clobbers_a_racing_save() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("json_doc_store_race_{}", uuid::Uuid::new_v4()));
        for round in 0..200u32 {
            let path = root.join(format!("notes_{round}.json"));
            let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new());
            let saved = vec![Note { id: round, text: "saved".into() }];

            let reader = {
                let s = store.clone();
                tokio::spawn(async move { s.get().await })
            };
            let writer = {
                let (s, v) = (store.clone(), saved.clone());
                tokio::spawn(async move { s.save(&v).await })
            };
            let first = reader.await??;
            writer.await??;

            assert!(first.is_empty() || first == saved, "round {round}: {first:?}");
            assert_eq!(store.get().await?, saved, "round {round}: save was overwritten by the default");
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_path_is_an_io_error() -> Result<(), anyhow::Error> {
        // a directory where the file should be: read fails with something other than NotFound
        let path = tmp_file("notes");
        tokio::fs::create_dir_all(&path).await?;
        let store = JsonDocStore::<Vec<Note>>::new("notes", &path, Vec::new());

        assert!(matches!(store.get().await, Err(ServiceError::Io(_))));
        assert!(matches!(store.save(&Vec::new()).await, Err(ServiceError::Io(_))));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
