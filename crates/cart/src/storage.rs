//! Durable key/value storage for serialized carts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cart storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value store holding one JSON-encoded cart per key.
pub trait CartStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> CartStorage for Arc<S>
where
    S: CartStorage + ?Sized,
{
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage for tests/dev. Share it through an `Arc` to simulate a
/// restart with a second ledger.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value (for inspection in tests).
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.read().ok()?.get(key).cloned()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        map.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per cart under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// ASCII letters, digits and `-` are kept; every other byte of the key,
    /// `_` included, is written as `_XX` hex so distinct keys never share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut file = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file.push(char::from(byte));
            } else {
                file.push_str(&format!("_{byte:02X}"));
            }
        }
        file.push_str(".json");
        self.dir.join(file)
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io)?;

        // Write-then-rename so a crash never leaves a half-written cart.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io)?;
        std::fs::rename(&tmp, &path).map_err(io)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("plantstore-cart-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert!(storage.load("cart").unwrap().is_none());
        storage.save("cart", "[]").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[]"));
        storage.remove("cart").unwrap();
        assert!(storage.raw("cart").is_none());
    }

    #[test]
    fn file_storage_persists_between_instances() {
        let dir = scratch_dir();
        FileStorage::new(&dir).save("cart-user-1", "[1]").unwrap();

        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.load("cart-user-1").unwrap().as_deref(), Some("[1]"));
        assert!(reopened.load("cart-user-2").unwrap().is_none());

        reopened.remove("cart-user-1").unwrap();
        reopened.remove("cart-user-1").unwrap();
        assert!(reopened.load("cart-user-1").unwrap().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn file_names_are_sanitized() {
        let storage = FileStorage::new("/tmp/carts");
        assert_eq!(
            storage.path_for("../cart:1"),
            PathBuf::from("/tmp/carts/_2E_2E_2Fcart_3A1.json")
        );
        assert_eq!(storage.path_for("cart-user-4"), PathBuf::from("/tmp/carts/cart-user-4.json"));
    }

    #[test]
    fn distinct_keys_get_distinct_files() {
        let storage = FileStorage::new("/tmp/carts");
        assert_ne!(storage.path_for("cart:1"), storage.path_for("cart_1"));
        assert_eq!(storage.path_for("cart_1"), PathBuf::from("/tmp/carts/cart_5F1.json"));
    }
}
