use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::repository::traits::{KeyValueStore, StoreKey};

pub const DEFAULT_DIR_NAME: &str = ".ecotrack";

/// One JSON document per key, stored as `<key>.json` under `base_dir`.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;

        Ok(FileKeyValueStore { base_dir: path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.base_dir.join(format!("{}.json", key.as_str()))
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Could not read {}", path.display()))?;
        Ok(Some(content))
    }

    fn put(&self, key: StoreKey, value: &str) -> Result<()> {
        // Write to a sibling file first so a failed write never truncates the old document.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp).with_context(|| format!("Could not create {}", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path).with_context(|| format!("Could not replace {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ecotrack-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = temp_dir();
        let store = FileKeyValueStore::new(Some(dir.clone())).unwrap();
        assert!(dir.exists());
        assert_eq!(store.get(StoreKey::Footprints).unwrap(), None);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_put_then_get() {
        let dir = temp_dir();
        let store = FileKeyValueStore::new(Some(dir.clone())).unwrap();
        store.put(StoreKey::Challenges, "[]").unwrap();
        store.put(StoreKey::Challenges, "[1]").unwrap();

        assert_eq!(store.get(StoreKey::Challenges).unwrap(), Some("[1]".to_string()));
        assert!(dir.join("challenges.json").exists());
        assert!(!dir.join("challenges.json.tmp").exists());

        let reopened = FileKeyValueStore::new(Some(dir.clone())).unwrap();
        assert_eq!(reopened.get(StoreKey::Challenges).unwrap(), Some("[1]".to_string()));
        fs::remove_dir_all(dir).ok();
    }
}
