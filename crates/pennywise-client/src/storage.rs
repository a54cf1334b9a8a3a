//! Durable key-value slots for the client session.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::SessionError;

/// Slot holding the raw session token.
pub const TOKEN_SLOT: &str = "token";
/// Slot holding the serialized account snapshot.
pub const USER_SLOT: &str = "user";

pub trait SessionStorage: Send + Sync + 'static {
    fn get(&self, slot: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, slot: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, slot: &str) -> Result<(), SessionError>;
}

impl<S: SessionStorage> SessionStorage for std::sync::Arc<S> {
    fn get(&self, slot: &str) -> Result<Option<String>, SessionError> {
        (**self).get(slot)
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), SessionError> {
        (**self).set(slot, value)
    }

    fn remove(&self, slot: &str) -> Result<(), SessionError> {
        (**self).remove(slot)
    }
}

/// Slots that live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, slot: &str) -> Result<Option<String>, SessionError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), SessionError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), SessionError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(slot);
        Ok(())
    }
}

/// Slots persisted as one JSON object in a file, surviving restarts.
///
/// A missing file reads as empty. The file is rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, slots: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(slots)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, slot: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(slot))
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read()?;
        slots.insert(slot.to_string(), value.to_string());
        self.write(&slots)
    }

    fn remove(&self, slot: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read()?;
        if slots.remove(slot).is_some() {
            self.write(&slots)?;
        }
        Ok(())
    }
}
