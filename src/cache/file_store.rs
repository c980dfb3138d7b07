//! Disk-backed store persisting cache entries as JSON files
//!
//! Layout: `<cache_dir>/<collection>/<encoded key>.json`, one entry per file.
//! Keys are percent-encoded so any string maps to a safe file name.

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::store::{CacheEntry, Store, StoreError};
use super::Collection;

/// Extension for committed entry files
const ENTRY_EXTENSION: &str = "json";

/// Stores cache entries under an XDG-compliant cache directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where collection subdirectories live
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG cache directory
    ///
    /// Uses `~/.cache/sportsleagues/` on Linux, or the equivalent on other platforms.
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "sportsleagues")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.cache_dir.join(collection.as_str())
    }

    /// Returns the path to the file holding `key`
    fn entry_path(&self, collection: Collection, key: &str) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.{}", encode_key(key), ENTRY_EXTENSION))
    }

    fn read_entry(path: &Path) -> Result<Option<CacheEntry>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Store for FileStore {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Self::read_entry(&self.entry_path(collection, key))
    }

    fn put(&self, entry: &CacheEntry) -> Result<(), StoreError> {
        fs::create_dir_all(self.collection_dir(entry.collection))?;

        let path = self.entry_path(entry.collection, &entry.key);
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(entry)?;

        // Rename over the old file so readers never see a half-written entry
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.entry_path(collection, key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        match fs::remove_dir_all(self.collection_dir(collection)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn entries(&self, collection: Collection) -> Result<Vec<CacheEntry>, StoreError> {
        let dir = match fs::read_dir(self.collection_dir(collection)) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for dir_entry in dir {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(Some(entry)) => entries.push(entry),
                // Deleted by a concurrent sweep since the directory was listed
                Ok(None) => {}
                Err(StoreError::Corrupt(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping corrupt cache file");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }
}

/// Percent-encodes everything except ASCII alphanumerics, `-` and `_`
///
/// The empty key encodes to a lone `%`, which no other key can produce.
fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return "%".to_string();
    }
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
