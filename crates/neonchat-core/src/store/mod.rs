//! Transcript persistence
//!
//! The transcript lives under one fixed key in a flat key/value backend.
//! `TranscriptStore` owns the serialization and the best-effort policy;
//! backends only move strings.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::message::Transcript;

/// Flat string key/value backend (browser `localStorage`, a directory, memory)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Serializes the whole transcript under a single key
pub struct TranscriptStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl TranscriptStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Replace the stored transcript. Failures are logged and swallowed.
    pub fn save(&self, transcript: &Transcript) {
        if let Err(e) = self.try_save(transcript) {
            log::warn!("Failed to save chat history under '{}': {}", self.key, e);
        }
    }

    fn try_save(&self, transcript: &Transcript) -> Result<()> {
        let json = serde_json::to_string(transcript)?;
        self.backend.set(&self.key, &json)
    }

    /// Read the stored transcript.
    ///
    /// Absent, unreadable and corrupt data all come back as `None`.
    pub fn load(&self) -> Option<Transcript> {
        let saved = match self.backend.get(&self.key) {
            Ok(Some(saved)) => saved,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read chat history under '{}': {}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str::<Transcript>(&saved) {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                log::warn!("Failed to load chat history: {}", e);
                None
            }
        }
    }

    /// Remove the stored transcript. Failures are logged and swallowed.
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            log::warn!("Failed to remove chat history under '{}': {}", self.key, e);
        }
    }
}
