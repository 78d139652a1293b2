//! Per-star temporary clip storage
//!
//! The assembled voice clip is the only mutable on-disk state this pipeline
//! owns. It is keyed by star id, overwritten on re-selection, and consumed
//! exactly once by the embedding step. The store is passed by reference so
//! tests can point it at a scratch directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::CloningError;

/// Keyed store for per-star assembled voice clips
pub struct ClipStore {
    /// Root directory for clip files
    root: PathBuf,
}

impl ClipStore {
    /// Create a store rooted at the platform cache directory
    pub fn new() -> Result<Self, CloningError> {
        let dirs = ProjectDirs::from("com", "starvoice", "Starvoice").ok_or_else(|| {
            CloningError::ClipDirectoryError("could not determine cache directory".to_string())
        })?;

        Ok(Self {
            root: dirs.cache_dir().join("clips"),
        })
    }

    /// Create a store rooted at a custom directory
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the clip path for a star id
    pub fn clip_path(&self, star_id: &str) -> PathBuf {
        self.root.join(format!("{}_combined_voice_file.wav", star_id))
    }

    /// Write a clip for a star, overwriting any stale prior clip
    pub fn write(&self, star_id: &str, wav_bytes: &[u8]) -> Result<PathBuf, CloningError> {
        let path = self.clip_path(star_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, wav_bytes)?;

        debug!(star_id = %star_id, bytes = wav_bytes.len(), path = %path.display(), "wrote voice clip");
        Ok(path)
    }

    /// Check whether a clip exists for a star
    pub fn exists(&self, star_id: &str) -> bool {
        self.clip_path(star_id).exists()
    }

    /// Remove the clip for a star.
    ///
    /// A clip missing at removal time indicates an earlier silent failure
    /// and is surfaced as `CleanupFailed` rather than ignored.
    pub fn remove(&self, star_id: &str) -> Result<(), CloningError> {
        let path = self.clip_path(star_id);
        if !path.exists() {
            return Err(CloningError::CleanupFailed(format!(
                "clip not found: {}",
                path.display()
            )));
        }

        fs::remove_file(&path)
            .map_err(|e| CloningError::CleanupFailed(format!("{}: {}", path.display(), e)))?;

        debug!(star_id = %star_id, "removed voice clip");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ClipStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ClipStore::with_root(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_clip_path_is_keyed_by_star_id() {
        let (_dir, store) = temp_store();

        let path = store.clip_path("42");

        assert!(path.ends_with("42_combined_voice_file.wav"));
    }

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let (_dir, store) = temp_store();

        store.write("7", b"first").unwrap();
        let path = store.write("7", b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_remove_deletes_the_clip() {
        let (_dir, store) = temp_store();

        store.write("7", b"clip").unwrap();
        store.remove("7").unwrap();

        assert!(!store.exists("7"));
    }

    #[test]
    fn test_remove_missing_clip_is_an_error() {
        let (_dir, store) = temp_store();

        assert!(matches!(
            store.remove("missing"),
            Err(CloningError::CleanupFailed(_))
        ));
    }
}
