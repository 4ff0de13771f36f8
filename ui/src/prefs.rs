//! Flags persisted on the device between sessions.
//!
//! The only one today is whether the user dismissed the install prompt. It
//! never expires.

use std::{cell::RefCell, collections::HashMap};

pub const INSTALL_PROMPT_DISMISSED_KEY: &str = "installPromptDismissed";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Local storage is not available")]
    Unavailable,
    #[error("Failed to access preferences file")]
    Io(#[from] std::io::Error),
    #[error("Preferences file is corrupt")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage with the shape of the browser's localStorage.
pub trait FlagStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process. Used in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl FlagStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{FlagStorage, StorageError};

    /// The window's localStorage.
    #[derive(Debug, Default)]
    pub struct BrowserStorage;

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }

    impl FlagStorage for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            local_storage()?
                .get_item(key)
                .map_err(|_| StorageError::Unavailable)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            local_storage()?
                .set_item(key, value)
                .map_err(|_| StorageError::Unavailable)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            local_storage()?
                .remove_item(key)
                .map_err(|_| StorageError::Unavailable)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{FlagStorage, StorageError};
    use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

    /// A JSON object of string values in a single file, rewritten whole on
    /// every change.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
            match std::fs::read(&self.path) {
                Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Ok(BTreeMap::new())
                }
                Err(e) => Err(e.into()),
            }
        }

        fn write(
            &self,
            items: &BTreeMap<String, String>,
        ) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.path, serde_json::to_vec_pretty(items)?)?;
            Ok(())
        }
    }

    impl FlagStorage for FileStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.read()?.remove(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut items = self.read()?;
            items.insert(key.to_string(), value.to_string());
            self.write(&items)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            let mut items = self.read()?;
            if items.remove(key).is_some() {
                self.write(&items)?;
            }
            Ok(())
        }
    }
}

/// Typed access to the persisted flags.
pub struct Preferences<S> {
    storage: S,
}

impl<S: FlagStorage> Preferences<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Unreadable storage counts as "not dismissed", so the worst case is
    /// showing the prompt again.
    pub fn install_prompt_dismissed(&self) -> bool {
        match self.storage.get_item(INSTALL_PROMPT_DISMISSED_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!("failed to read install prompt flag: {e}");
                false
            }
        }
    }

    pub fn dismiss_install_prompt(&self) -> Result<(), StorageError> {
        self.storage.set_item(INSTALL_PROMPT_DISMISSED_KEY, "true")
    }

    pub fn reset_install_prompt(&self) -> Result<(), StorageError> {
        self.storage.remove_item(INSTALL_PROMPT_DISMISSED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_shown_until_dismissed() {
        let prefs = Preferences::new(MemoryStorage::default());
        assert!(!prefs.install_prompt_dismissed());
        prefs.dismiss_install_prompt().unwrap();
        assert!(prefs.install_prompt_dismissed());
        prefs.reset_install_prompt().unwrap();
        assert!(!prefs.install_prompt_dismissed());
    }

    #[test]
    fn flag_survives_a_new_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        Preferences::new(FileStorage::new(&path))
            .dismiss_install_prompt()
            .unwrap();

        let reopened = Preferences::new(FileStorage::new(&path));
        assert!(reopened.install_prompt_dismissed());
    }

    #[test]
    fn corrupt_file_reads_as_not_dismissed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let prefs = Preferences::new(FileStorage::new(&path));
        assert!(!prefs.install_prompt_dismissed());
        assert!(matches!(
            prefs.dismiss_install_prompt(),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn other_keys_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("prefs.json"));
        storage.set_item("theme", "dark").unwrap();

        let prefs = Preferences::new(storage.clone());
        prefs.dismiss_install_prompt().unwrap();
        prefs.reset_install_prompt().unwrap();

        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
    }
}
