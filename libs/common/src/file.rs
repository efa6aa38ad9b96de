//! JSON file storage for the client session
//!
//! All entries live in one JSON object. Every write replaces the whole
//! document through a temporary file and a rename, so a multi-entry update
//! is either fully on disk or not at all.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::debug;

use crate::{
    error::{StorageError, StorageResult},
    storage::SessionStorage,
};

type Document = BTreeMap<String, String>;

/// Session storage persisted to a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a storage handle for the given file; the file is created on first write
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StorageResult<Document> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, document: &Document) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp_path = self.temp_path()?;

        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(json.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).await?;
        debug!("Session file written to {}", self.path.display());

        Ok(())
    }

    fn temp_path(&self) -> StorageResult<PathBuf> {
        let file_name = self.path.file_name().ok_or_else(|| {
            StorageError::Configuration(format!(
                "Storage path has no file name: {}",
                self.path.display()
            ))
        })?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let document = self.load().await?;
        Ok(document.get(key).cloned())
    }

    async fn set_entries(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        for (key, value) in entries {
            document.insert((*key).to_string(), (*value).to_string());
        }

        self.save(&document).await
    }

    async fn remove_entries(&self, keys: &[&str]) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let before = document.len();
        for key in keys {
            document.remove(*key);
        }

        if document.len() == before {
            return Ok(());
        }

        if document.is_empty() {
            return match fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        self.save(&document).await
    }
}
