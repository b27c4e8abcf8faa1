//! Photo loading for the product form
//!
//! Camera and photo library pickers are collaborators behind `PhotoSource`.
//! Loading runs in the background and writes into the form's draft only if
//! the form is still open when the bytes arrive.

use async_trait::async_trait;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::{DomainError, DomainResult, ProductDraft};

/// Something that can hand over at most one image
///
/// `Ok(None)` means the user backed out without picking anything.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch(&self) -> DomainResult<Option<Vec<u8>>>;
}

/// Shared, mutable form state
pub type SharedDraft = Arc<Mutex<ProductDraft>>;

/// Load a photo in the background and store it in `draft`
///
/// Only a weak handle is held while loading: if the form was closed the
/// result is dropped. On failure the draft keeps whatever image it had.
pub fn spawn_photo_load(draft: &SharedDraft, source: Arc<dyn PhotoSource>) -> JoinHandle<()> {
    let draft: Weak<Mutex<ProductDraft>> = Arc::downgrade(draft);

    tokio::spawn(async move {
        let bytes = match source.fetch().await {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => return,
            Err(e) => {
                log::warn!("Photo load failed: {}", e);
                return;
            }
        };

        match draft.upgrade() {
            Some(draft) => {
                draft.lock().await.image = Some(bytes);
            }
            None => log::debug!("Form closed before photo arrived, discarding"),
        }
    })
}

/// Photo handed over as base64, optionally wrapped in a data URL
/// (`data:image/png;base64,...`)
pub struct DataUrlPhotoSource {
    payload: String,
}

impl DataUrlPhotoSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn decode(&self) -> DomainResult<Option<Vec<u8>>> {
        let data = match self.payload.split_once(',') {
            Some((_, data)) => data,
            None => self.payload.as_str(),
        };
        let data = data.trim();
        if data.is_empty() {
            return Ok(None);
        }

        let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, data)
            .map_err(|e| DomainError::InvalidInput(format!("Failed to decode base64: {}", e)))?;
        Ok(Some(bytes))
    }
}

#[async_trait]
impl PhotoSource for DataUrlPhotoSource {
    async fn fetch(&self) -> DomainResult<Option<Vec<u8>>> {
        self.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    #[async_trait]
    impl PhotoSource for Unavailable {
        async fn fetch(&self) -> DomainResult<Option<Vec<u8>>> {
            Err(DomainError::Unavailable("Camera not available".to_string()))
        }
    }

    fn draft() -> SharedDraft {
        Arc::new(Mutex::new(ProductDraft::new("Milk", "Dairy Farmers")))
    }

    #[test]
    fn test_decode_plain_and_data_url() {
        assert_eq!(DataUrlPhotoSource::new("aGk=").decode().unwrap(), Some(b"hi".to_vec()));
        assert_eq!(
            DataUrlPhotoSource::new("data:image/png;base64,aGk=").decode().unwrap(),
            Some(b"hi".to_vec())
        );
        assert_eq!(DataUrlPhotoSource::new("").decode().unwrap(), None);
        assert!(DataUrlPhotoSource::new("***").decode().is_err());
    }

    #[tokio::test]
    async fn test_photo_lands_in_open_draft() {
        let draft = draft();
        spawn_photo_load(&draft, Arc::new(DataUrlPhotoSource::new("aGk="))).await.unwrap();
        assert_eq!(draft.lock().await.image, Some(b"hi".to_vec()));
    }

    #[tokio::test]
    async fn test_closed_draft_discards_photo() {
        let draft = draft();
        let weak = Arc::downgrade(&draft);
        let handle = spawn_photo_load(&draft, Arc::new(DataUrlPhotoSource::new("aGk=")));
        drop(draft);
        handle.await.unwrap();
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_existing_image() {
        let draft = draft();
        draft.lock().await.image = Some(vec![1, 2, 3]);

        spawn_photo_load(&draft, Arc::new(Unavailable)).await.unwrap();
        assert_eq!(draft.lock().await.image, Some(vec![1, 2, 3]));

        spawn_photo_load(&draft, Arc::new(DataUrlPhotoSource::new(""))).await.unwrap();
        assert_eq!(draft.lock().await.image, Some(vec![1, 2, 3]));
    }
}
