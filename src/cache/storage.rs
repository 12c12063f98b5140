//! Storage backends for the response cache
//!
//! The cache store is built on a small key-value abstraction so the backing
//! can be swapped without touching cache or repository logic: an in-memory
//! map for ephemeral sessions, or JSON files in the XDG cache directory for
//! persistence across runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// These never escape the cache layer: the store logs them as warnings and
/// degrades to a miss or no-op.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Underlying I/O failed (missing directory, permissions, disk full)
    #[error("cache storage I/O failed: {0}")]
    Storage(#[from] io::Error),

    /// A stored entry could not be encoded or decoded
    #[error("cache entry codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Key-value surface the cache store writes JSON-encoded entries through.
///
/// Keys arrive already namespaced by the store; values are serialized entry
/// records.
pub trait CacheStorage: Send {
    /// Returns the raw value for a key, or `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Inserts or overwrites a key
    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removes a key; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), CacheError>;

    /// Lists every stored key
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Volatile backend holding entries in a plain map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Persistent backend storing one JSON file per key.
///
/// Cache keys contain characters that are not safe in file names (`:` in
/// particular), so each key is escaped into a reversible file name before it
/// touches the filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a file backend rooted at the given directory.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(escape_key(key))
    }
}

impl CacheStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut keys = Vec::new();
        for item in dir {
            let name = item?.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                if let Some(key) = unescape_key(stem) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}

/// Escapes a cache key into a filesystem-safe file name.
///
/// Alphanumerics, `-`, `_` and `.` pass through; every other byte becomes a
/// `%XX` hex escape, which keeps distinct keys mapped to distinct names.
fn escape_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                name.push(byte as char);
            }
            _ => {
                name.push('%');
                name.push_str(&format!("{byte:02X}"));
            }
        }
    }
    name.push_str(".json");
    name
}

/// Reverses [`escape_key`]; returns `None` for file names that are not valid
/// escapes (foreign files in the cache directory).
fn unescape_key(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut chars = stem.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hi = chars.next()?;
            let lo = chars.next()?;
            let value = u8::from_str_radix(&format!("{hi}{lo}"), 16).ok()?;
            bytes.push(value);
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();

        storage.write("key1", "value1").unwrap();
        assert_eq!(storage.read("key1").unwrap().as_deref(), Some("value1"));

        storage.remove("key1").unwrap();
        assert_eq!(storage.read("key1").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_remove_missing_is_ok() {
        let mut storage = MemoryStorage::new();
        assert!(storage.remove("nope").is_ok());
    }

    #[test]
    fn test_memory_storage_keys() {
        let mut storage = MemoryStorage::new();
        storage.write("a", "1").unwrap();
        storage.write("b", "2").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut storage = FileStorage::new(temp_dir.path().to_path_buf());

        storage.write("sw-cache:endpoint:vehicles", "{\"x\":1}").unwrap();
        assert_eq!(
            storage.read("sw-cache:endpoint:vehicles").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
    }

    #[test]
    fn test_file_storage_read_missing_returns_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        assert_eq!(storage.read("missing").unwrap(), None);
    }

    #[test]
    fn test_file_storage_keys_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut storage = FileStorage::new(temp_dir.path().to_path_buf());
        storage.write("sw-cache:a:1", "one").unwrap();
        storage.write("sw-cache:b:2", "two").unwrap();

        let reopened = FileStorage::new(temp_dir.path().to_path_buf());
        let mut keys = reopened.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["sw-cache:a:1", "sw-cache:b:2"]);
    }

    #[test]
    fn test_file_storage_keys_on_missing_dir_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let storage = FileStorage::new(temp_dir.path().join("never-created"));
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_key_escaping_is_reversible() {
        let keys = [
            "sw-cache:endpoint:characters:page:1:limit:20",
            "term with spaces/and/slashes",
            "unicode-✶-key",
            "%already%escaped%",
        ];

        for key in keys {
            let name = escape_key(key);
            assert!(!name.contains(':'), "Escaped name must be filesystem-safe");
            assert!(!name.contains('/'), "Escaped name must be filesystem-safe");
            let stem = name.strip_suffix(".json").unwrap();
            assert_eq!(unescape_key(stem).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_distinct_keys_map_to_distinct_files() {
        assert_ne!(escape_key("a:b"), escape_key("a_b"));
        assert_ne!(escape_key("a%3Ab"), escape_key("a:b"));
    }
}
