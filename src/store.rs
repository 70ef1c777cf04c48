use std::{fs, io, path::Path, path::PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::models::Db;

// A missing file is an empty store.
pub fn load_db(path: &Path) -> Result<Db, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Db::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// Write to a temp file and rename over the old one.
pub fn save_db(path: &Path, db: &Db) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = serde_json::to_string_pretty(db).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, text).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// JSON file store shared by the HTTP handlers.
///
/// Every read-modify-write runs under one lock so concurrent applies of a
/// schedule cannot interleave their timeline writes.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn read(&self) -> Result<Db, StoreError> {
        let _guard = self.lock.lock().await;
        load_db(&self.path)
    }

    /// Load, apply `f`, and save only if `f` succeeded.
    pub async fn update<T, E>(&self, f: impl FnOnce(&mut Db) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut db = load_db(&self.path)?;
        let out = f(&mut db)?;
        save_db(&self.path, &db)?;
        debug!(path = %self.path.display(), "saved store");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn missing_file_loads_empty_db() {
        let dir = tempfile::tempdir().unwrap();
        let db = load_db(&dir.path().join("nope.json")).unwrap();
        assert!(db.plans.is_empty());
        assert_eq!(db.settings.working_hours_start, "09:00");
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");

        let mut db = Db::default();
        db.settings.max_minutes_per_day = 123;
        save_db(&path, &db).unwrap();

        assert_eq!(load_db(&path).unwrap().settings.max_minutes_per_day, 123);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_db(&path), Err(StoreError::Json { .. })));
    }

    #[tokio::test]
    async fn failed_update_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("db.json"));

        let res: Result<(), AppError> = store
            .update(|db| {
                db.settings.skip_weekends = false;
                Err(AppError::bad_request("nope"))
            })
            .await;
        assert!(res.is_err());
        assert!(store.read().await.unwrap().settings.skip_weekends);

        store
            .update(|db| {
                db.settings.skip_weekends = false;
                Ok::<_, AppError>(())
            })
            .await
            .unwrap();
        assert!(!store.read().await.unwrap().settings.skip_weekends);
    }
}
