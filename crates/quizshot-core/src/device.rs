//! Stable per-install device identity.
//!
//! The backend keys submissions and record lookups on an opaque per-install
//! identifier. The first run generates one and persists it to the state
//! directory; later runs read it back. An explicit override (from
//! configuration) bypasses the state file entirely.

use std::fs;
use std::io;
use std::path::Path;

use uuid::Uuid;

const DEVICE_ID_FILE: &str = "device_id";

/// Opaque per-install identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceIdentity {
    id: String,
}

impl DeviceIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Resolve the identity: override if given, else the persisted value,
    /// else a freshly generated UUID written to `state_dir/device_id`.
    pub fn load_or_create(state_dir: &Path, override_id: Option<&str>) -> io::Result<Self> {
        if let Some(id) = override_id {
            let id = id.trim();
            if !id.is_empty() {
                return Ok(Self::new(id));
            }
        }

        let path = state_dir.join(DEVICE_ID_FILE);
        if let Ok(existing) = fs::read_to_string(&path) {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(Self::new(existing));
            }
        }

        let id = Uuid::new_v4().to_string();
        fs::create_dir_all(state_dir)?;
        fs::write(&path, &id)?;
        Ok(Self::new(id))
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
