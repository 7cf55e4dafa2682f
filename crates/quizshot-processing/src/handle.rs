//! Owned references to image bytes at rest.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// Opaque reference to encoded image bytes on disk, with declared pixel
/// dimensions.
///
/// A handle produced by a pipeline stage owns its backing temp file and
/// deletes it on drop; a handle over a caller-supplied path leaves the file
/// alone. Handles move stage to stage and are never mutated: each stage
/// supersedes its input with a new handle, so discarding an attempt is just
/// dropping the chain.
#[derive(Debug)]
pub struct ImageHandle {
    path: PathBuf,
    width: u32,
    height: u32,
    // Keeps the backing temp file alive for stage-produced handles.
    _temp: Option<TempPath>,
}

impl ImageHandle {
    /// Wrap an existing file without taking ownership of it.
    pub fn from_path(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            _temp: None,
        }
    }

    /// Write encoded image bytes to a fresh temp file and own it.
    pub fn from_encoded_bytes(bytes: &[u8], width: u32, height: u32) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("quizshot-")
            .suffix(".jpg")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        let temp = file.into_temp_path();
        Ok(Self {
            path: temp.to_path_buf(),
            width,
            height,
            _temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Declared width/height ratio.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Size of the encoded bytes at rest.
    pub fn size_bytes(&self) -> io::Result<u64> {
        std::fs::metadata(&self.path).map(|m| m.len())
    }

    /// Read the encoded bytes.
    pub async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}
