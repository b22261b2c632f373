use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::errors::{AppError, AppResult};

/// Persistence slot for the bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&self, token: &str) -> AppResult<()>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AppResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.trim_end_matches(['\r', '\n']).to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::storage(format!(
                "failed to read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::storage(format!("failed to create {}: {err}", parent.display()))
            })?;
        }

        fs::write(&self.path, token).map_err(|err| {
            AppError::storage(format!("failed to write {}: {err}", self.path.display()))
        })
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::storage(format!(
                "failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, token: &str) -> AppResult<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        self.slot.lock().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);
        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // second clear is a no-op
        store.clear().unwrap();
    }

    #[test]
    fn file_store_strips_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "tok\n").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn memory_store() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.load().unwrap().as_deref(), Some("t"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
