use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::ClientError;

/// Client-local key/value storage holding the persisted session
///
/// Writes come from serial user actions, so last writer wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    /// Remove every entry at once
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
        Ok(())
    }
}

/// JSON file under the config directory (`storage.json`)
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self {
            path: dir.join("storage.json"),
            write_lock: Mutex::new(()),
        })
    }

    /// Store in the configured (or default) config directory
    pub fn open_default() -> Result<Self, ClientError> {
        Self::new(get_config_dir()?)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| ClientError::storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(entries)
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::storage(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::warn!("ignoring unreadable session storage: {}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn clear(&self) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

pub fn get_config_dir() -> Result<PathBuf, ClientError> {
    let config_dir = if let Some(custom_dir) = &crate::config::config().storage.config_dir {
        custom_dir.clone()
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| ClientError::storage("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("smart-hr")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
