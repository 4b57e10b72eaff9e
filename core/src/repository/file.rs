use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::config::resolve_data_dir;
use crate::repository::traits::KeyValueStore;

const FILE_EXTENSION: &str = "json";

/// Stores each key as `<key>.json` inside one directory.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)?;
        Ok(FileKeyValueStore { base_dir: path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("Invalid storage key: '{}'", key));
        }
        Ok(self.base_dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
