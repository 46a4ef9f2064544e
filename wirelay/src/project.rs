//! Project document types.
//!
//! Persistence itself belongs to the surrounding application; the library
//! only defines the document shape and its (de)serialization so that every
//! model field, including the creation-order arenas that derived numbering
//! hangs off, survives a save/load round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Result, WirelayError};
use crate::system::CircuitSystem;

fn default_schema_version() -> String {
    "1.0".to_string()
}

/// Metadata about a saved project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,

    /// Stable project identity, assigned at creation.
    pub id: Uuid,

    /// Schema version for forward compatibility.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            id: Uuid::new_v4(),
            schema_version: default_schema_version(),
            created: now,
            modified: now,
        }
    }
}

/// A complete project: metadata plus the full entity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub metadata: ProjectMetadata,
    pub system: CircuitSystem,
}

impl ProjectDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ProjectMetadata::new(name),
            system: CircuitSystem::new(),
        }
    }

    /// Serialize to pretty JSON and write to `path`, bumping the modified
    /// timestamp.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.metadata.modified = Utc::now();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WirelayError::Parse(e.to_string()))?;
        std::fs::write(path, json)?;
        tracing::debug!("project saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| WirelayError::Parse(e.to_string()))
    }
}
