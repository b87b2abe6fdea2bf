use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::DuebellError;

/// Default location of the mapping file, relative to the working directory.
pub const DEFAULT_MAPPING_FILE: &str = "user_mapping.json";

/// Tracker user id -> chat user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdentityMapping(HashMap<String, String>);

impl IdentityMapping {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    /// Parse a JSON object keyed by tracker user id.
    ///
    /// Values are taken as they are: strings verbatim, numbers by their
    /// JSON text. Entries that cannot name a chat user (null, booleans,
    /// arrays, objects, empty strings) are dropped on their own; the rest
    /// of the mapping is kept.
    pub fn from_json_str(s: &str) -> Result<Self, DuebellError> {
        let raw: HashMap<String, Value> = serde_json::from_str(s)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(id) if !id.is_empty() => Some((key, id)),
                Value::Number(n) => Some((key, n.to_string())),
                other => {
                    warn!("ignoring mapping entry {key:?}: unusable value {other}");
                    None
                }
            })
            .collect())
    }

    pub fn chat_id_for(&self, external_id: &str) -> Option<&str> {
        self.0.get(external_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for IdentityMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read the mapping file. `Ok(None)` when the file does not exist.
pub fn read_mapping(path: &Path) -> Result<Option<IdentityMapping>, DuebellError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    IdentityMapping::from_json_str(&content).map(Some)
}

/// Load the mapping file, downgrading every failure to "no mapping".
pub fn load_mapping(path: &Path) -> Option<IdentityMapping> {
    match read_mapping(path) {
        Ok(Some(mapping)) => {
            info!(
                "loaded {} identity mappings from {}",
                mapping.len(),
                path.display()
            );
            Some(mapping)
        }
        Ok(None) => {
            info!(
                "mapping file {} not found, assignees will be shown by name",
                path.display()
            );
            None
        }
        Err(e) => {
            error!("failed to load mapping file {}: {e}", path.display());
            None
        }
    }
}
