//! Product photo storage
//!
//! Photos live as content-addressed files next to the database instead of
//! inside product rows. A product only stores the blake3 hex digest.
//!
//! Files are written to a temporary name and renamed into place, so a
//! `<hash>.img` is either complete or absent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{DomainError, DomainResult, ImageRef};

const IMAGE_EXT: &str = "img";
const TEMP_EXT: &str = "tmp";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    /// Held while product rows and image files change together
    gate: Arc<Mutex<()>>,
}

impl ImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Exclusive access for a row write plus the file changes that go with it
    ///
    /// Reference checks and removals made under the guard cannot interleave
    /// with another product write.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Store `bytes`, returning their content hash
    ///
    /// Saving identical bytes twice yields the same reference and one file.
    pub async fn save(&self, bytes: &[u8]) -> DomainResult<ImageRef> {
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("Image is empty".to_string()));
        }

        let hash = blake3::hash(bytes).to_hex().to_string();
        let path = self.path_for(&hash);

        // A file of the wrong size is left over from an interrupted write
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.len() == bytes.len() as u64 => return Ok(ImageRef(hash)),
            Ok(meta) => log::warn!("Rewriting damaged image {} ({} bytes on disk)", hash, meta.len()),
            Err(_) => {}
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to create image dir: {}", e)))?;

        let temp = self.dir.join(format!(
            "{}.{}-{}.{}",
            hash,
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed),
            TEMP_EXT
        ));
        if let Err(e) = tokio::fs::write(&temp, bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(DomainError::Internal(format!("Failed to write image: {}", e)));
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(DomainError::Internal(format!("Failed to store image: {}", e)));
        }

        log::debug!("Stored image {} ({} bytes)", hash, bytes.len());
        Ok(ImageRef(hash))
    }

    pub async fn load(&self, image: &ImageRef) -> DomainResult<Vec<u8>> {
        validate(image)?;
        match tokio::fs::read(self.path_for(image.as_str())).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::NotFound(format!("Image {}", image.as_str())))
            }
            Err(e) => Err(DomainError::Internal(e.to_string())),
        }
    }

    /// Remove one image; a missing file is not an error
    pub async fn remove(&self, image: &ImageRef) -> DomainResult<()> {
        validate(image)?;
        match tokio::fs::remove_file(self.path_for(image.as_str())).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(e.to_string())),
        }
    }

    /// Delete every stored image whose hash is not in `referenced`, along
    /// with temporary files of unfinished writes
    ///
    /// Call with the guard from [`ImageStore::lock`] held, or before any
    /// product writes start.
    pub async fn remove_unreferenced(&self, referenced: &HashSet<String>) -> DomainResult<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(DomainError::Internal(e.to_string())),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
        {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(IMAGE_EXT) => {}
                Some(TEMP_EXT) => {
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        log::warn!("Failed to remove partial image {}: {}", path.display(), e);
                    }
                    continue;
                }
                _ => continue,
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if referenced.contains(stem) {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Failed to remove orphaned image {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            log::info!("Removed {} orphaned image(s)", removed);
        }
        Ok(removed)
    }

    fn path_for(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", hash, IMAGE_EXT))
    }
}

/// Refs come from the database; refuse anything that could escape the dir
fn validate(image: &ImageRef) -> DomainResult<()> {
    let hash = image.as_str();
    if hash.len() == 64 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!("Invalid image reference: {}", hash)))
    }
}
