//! File-backed tab storage.
//!
//! Each tab gets its own directory under the storage root and each key is one
//! file inside it, so tabs never see each other's values.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;
use tokio::fs;

use super::TabStorage;
use crate::error::StorageError;

/// Regex for valid tab ids and keys: alphanumeric, dash, underscore only
const NAME_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// Maximum name length
const MAX_NAME_LENGTH: usize = 64;

/// Tab storage rooted at `<root>/<tab_id>/`.
pub struct FileTabStorage {
    tab_dir: PathBuf,
    name_regex: Regex,
}

impl FileTabStorage {
    /// Open (creating if needed) the storage of one tab.
    pub fn new(root: PathBuf, tab_id: &str) -> Result<Self, StorageError> {
        let name_regex = Regex::new(NAME_PATTERN)
            .map_err(|e| StorageError::Unavailable(format!("name pattern: {}", e)))?;
        validate_name(&name_regex, tab_id)?;

        let tab_dir = root.join(tab_id);
        std::fs::create_dir_all(&tab_dir)
            .map_err(|e| StorageError::DirectoryAccess(format!("{}: {}", tab_dir.display(), e)))?;

        Ok(Self {
            tab_dir,
            name_regex,
        })
    }

    pub fn tab_dir(&self) -> &Path {
        &self.tab_dir
    }

    fn get_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_name(&self.name_regex, key)?;
        Ok(self.tab_dir.join(format!("{}.json", key)))
    }
}

fn validate_name(regex: &Regex, name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("Name cannot be empty".to_string()));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(StorageError::InvalidName(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }

    if !regex.is_match(name) {
        return Err(StorageError::InvalidName(format!(
            "Name '{}' contains invalid characters. Only alphanumeric, dash, and underscore allowed.",
            name
        )));
    }

    Ok(())
}

#[async_trait]
impl TabStorage for FileTabStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.get_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.get_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
