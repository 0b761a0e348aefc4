//! Configuration types for the session core

use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Session core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Relay (STUN/TURN) servers handed to the player factory
    pub relay_servers: Vec<RelayServerConfig>,

    /// Durable store path; in-memory storage when None
    pub storage_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay_servers: vec![RelayServerConfig::default()],
            storage_path: None,
        }
    }
}

impl SessionConfig {
    /// Open the backing key-value store for this configuration
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        match &self.storage_path {
            Some(path) => Ok(Arc::new(JsonFileStore::open(path)?)),
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

/// One relay server entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayServerConfig {
    /// Server URLs (stun:// or turn://)
    pub urls: Vec<String>,

    /// Username for TURN authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Credential for TURN authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl Default for RelayServerConfig {
    fn default() -> Self {
        Self {
            urls: vec!["stun:stun.l.google.com:19302".to_string()],
            username: None,
            credential: None,
        }
    }
}
