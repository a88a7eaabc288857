//! File-backed storage

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{KeyValueStorage, StorageError};

/// Stores each key as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        debug!(key, path = %path.display(), "stored value");

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_key_reads_as_none() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get("qf_cart_v2")?, None);

        Ok(())
    }

    #[test]
    fn set_creates_directory_and_file() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.set("qf_cart_v2", "[]")?;

        assert_eq!(storage.get("qf_cart_v2")?, Some("[]".to_string()));
        assert!(dir.path().join("nested").join("qf_cart_v2.json").exists());

        Ok(())
    }

    #[test]
    fn keys_are_sanitised_into_file_names() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.set("../escape", "x")?;

        assert!(dir.path().join("___escape.json").exists());

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.set("k", "v")?;
        storage.remove("k")?;
        storage.remove("k")?;

        assert_eq!(storage.get("k")?, None);

        Ok(())
    }
}
