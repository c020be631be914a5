use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::{ChatError, Result};

/// Directory-backed store: one `<key>.json` file per key
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Ok(Self {
            dir: Self::expand_tilde(dir.as_ref())?,
        })
    }

    /// Expand ~ to home directory
    fn expand_tilde(path: &Path) -> Result<PathBuf> {
        let path_str = path.to_string_lossy();
        if path_str == "~" || path_str.starts_with("~/") {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .map_err(|_| ChatError::Storage("home directory not set".to_string()))?;
            Ok(PathBuf::from(home).join(path_str.trim_start_matches('~').trim_start_matches('/')))
        } else {
            Ok(path.to_path_buf())
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
