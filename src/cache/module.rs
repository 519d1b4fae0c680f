//! Layout module cache.
//!
//! An artifact holds the syntax-checked source of a layout and is named
//! after its content hash. Artifacts are only trusted after their content
//! hashes back to that name: a file planted or corrupted in the cache
//! directory is discarded and rewritten. Writes go through a temporary file
//! and an atomic rename, so concurrent writers of the same hash produce
//! identical bytes and the last rename wins.

use dashmap::DashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::ContentHash;
use crate::debug;
use crate::layout::LayoutError;

/// Hash → artifact path memo, shared by every transform in the process.
#[derive(Debug)]
pub struct ModuleCache {
    dir: PathBuf,
    artifacts: DashMap<ContentHash, PathBuf>,
}

impl ModuleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            artifacts: DashMap::new(),
        }
    }

    /// `<os temp dir>/veneer`
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("veneer")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the artifact for `hash` (whether or not it exists).
    pub fn artifact_path(&self, hash: ContentHash) -> PathBuf {
        self.dir.join(format!("layout-{}.lua", hash.to_hex()))
    }

    /// Return the module for `hash`, calling `compile` only when no
    /// verified artifact exists on disk.
    ///
    /// `compile` must return bytes whose [`ContentHash::of_module`] is `hash`;
    /// anything else is rejected before it reaches the disk.
    pub fn get_or_compile(
        &self,
        hash: ContentHash,
        compile: impl FnOnce() -> Result<Vec<u8>, LayoutError>,
    ) -> Result<Vec<u8>, LayoutError> {
        let memo = self.artifacts.get(&hash).map(|p| p.value().clone());
        let path = memo.unwrap_or_else(|| self.artifact_path(hash));

        if let Some(module) = read_verified(&path, hash) {
            debug!("cache"; "hit {}", hash);
            self.artifacts.insert(hash, path);
            return Ok(module);
        }

        let module = compile()?;
        if ContentHash::of_module(&module) != hash {
            return Err(LayoutError::Cache {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "compiled module does not match its content hash",
                ),
            });
        }

        self.write_atomic(&path, &module)?;
        debug!("cache"; "stored {}", path.display());
        self.artifacts.insert(hash, path);
        Ok(module)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), LayoutError> {
        let cache_err = |source| LayoutError::Cache {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(cache_err)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(cache_err)?;
        tmp.write_all(bytes).map_err(cache_err)?;
        tmp.persist(path).map_err(|e| cache_err(e.error))?;
        Ok(())
    }

    /// Number of memoized artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

/// Artifact content, if present and hashing back to `hash`.
fn read_verified(path: &Path, hash: ContentHash) -> Option<Vec<u8>> {
    let bytes = fs::read(path).ok()?;
    if ContentHash::of_module(&bytes) == hash {
        Some(bytes)
    } else {
        debug!("cache"; "discarding {}: content does not match its name", path.display());
        None
    }
}
