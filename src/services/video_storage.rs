use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::capture::{MediaObject, WEBM_CONTENT_TYPE};
use crate::error::{Error, Result};

/// EBML header every WebM container starts with.
const WEBM_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];
const VIDEO_PREFIX: &str = "uploads/videos/";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Persists the recording and returns its public URL.
    async fn put(&self, media: &MediaObject) -> Result<String>;

    async fn delete(&self, url: &str) -> Result<()>;
}

/// Stores recordings on local disk under `<uploads>/videos`. Every `put` gets
/// its own file, so deleting one submission's video never touches another's.
#[derive(Clone, Debug)]
pub struct LocalVideoStore {
    dir: PathBuf,
    public_base: String,
}

impl LocalVideoStore {
    pub fn new(uploads_dir: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            dir: uploads_dir.into().join("videos"),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}{}", self.public_base, VIDEO_PREFIX, name)
    }

    fn name_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(&self.public_base)?
            .trim_start_matches('/')
            .strip_prefix(VIDEO_PREFIX)?;
        let safe = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.');
        safe.then_some(name)
    }
}

fn check_recording(media: &MediaObject) -> Result<()> {
    if media.is_empty() {
        return Err(Error::BadRequest("Recorded video is empty".into()));
    }
    // parameters such as `;codecs=vp8,opus` are allowed
    let content_type = media.content_type();
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if !essence.eq_ignore_ascii_case(WEBM_CONTENT_TYPE) {
        return Err(Error::BadRequest(format!(
            "Content type {} is not allowed for the demo video",
            content_type
        )));
    }
    if !media.bytes().starts_with(&WEBM_MAGIC) {
        return Err(Error::BadRequest("Invalid WebM file content".into()));
    }
    Ok(())
}

#[async_trait]
impl VideoStore for LocalVideoStore {
    async fn put(&self, media: &MediaObject) -> Result<String> {
        check_recording(media)?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            tracing::error!("Failed to create video directory: {}", e);
            Error::Internal(format!("Failed to save video: {}", e))
        })?;

        let name = format!("{}.webm", Uuid::new_v4().simple());
        let path = self.dir.join(&name);
        fs::write(&path, media.bytes()).await.map_err(|e| {
            tracing::error!("Failed to write video file: {}", e);
            Error::Internal(format!("Failed to save video: {}", e))
        })?;

        tracing::info!(file = %name, size = media.len(), digest = %media.digest(), "stored demo video");
        Ok(self.url_for(&name))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let Some(name) = self.name_from_url(url) else {
            return Err(Error::BadRequest(format!("Not a stored video: {}", url)));
        };
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webm(payload: &[u8]) -> MediaObject {
        let mut data = WEBM_MAGIC.to_vec();
        data.extend_from_slice(payload);
        MediaObject::webm(data)
    }

    fn path_for(dir: &std::path::Path, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap();
        dir.join("videos").join(name)
    }

    #[tokio::test]
    async fn stores_under_public_url_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVideoStore::new(dir.path(), "http://localhost:8080/");
        let media = webm(b"frames");

        let url = store.put(&media).await.unwrap();
        assert!(url.starts_with("http://localhost:8080/uploads/videos/"));
        assert!(url.ends_with(".webm"));
        let path = path_for(dir.path(), &url);
        assert_eq!(std::fs::read(&path).unwrap(), media.bytes().to_vec());

        store.delete(&url).await.unwrap();
        assert!(!path.exists());
        // already gone
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_empty_and_non_webm_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVideoStore::new(dir.path(), "http://localhost:8080");

        let empty = MediaObject::webm(Vec::new());
        assert!(matches!(store.put(&empty).await, Err(Error::BadRequest(_))));

        let fake = MediaObject::webm(b"%PDF-1.7".to_vec());
        assert!(matches!(store.put(&fake).await, Err(Error::BadRequest(_))));

        let text = MediaObject::new(b"hello".to_vec(), "text/plain");
        assert!(matches!(store.put(&text).await, Err(Error::BadRequest(_))));

        let mp4 = MediaObject::new(webm(b"frames").bytes().to_vec(), "video/mp4");
        assert!(matches!(store.put(&mp4).await, Err(Error::BadRequest(_))));

        let with_codecs = MediaObject::new(webm(b"frames").bytes().to_vec(), "video/webm;codecs=vp8,opus");
        assert!(store.put(&with_codecs).await.is_ok());
    }

    #[tokio::test]
    async fn identical_recordings_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVideoStore::new(dir.path(), "http://localhost:8080");
        let media = webm(b"same frames");

        let first = store.put(&media).await.unwrap();
        let second = store.put(&media).await.unwrap();
        assert_ne!(first, second);

        store.delete(&second).await.unwrap();
        assert!(path_for(dir.path(), &first).exists());
        assert!(!path_for(dir.path(), &second).exists());
    }

    #[tokio::test]
    async fn refuses_paths_outside_the_video_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVideoStore::new(dir.path(), "http://localhost:8080");
        let err = store
            .delete("http://localhost:8080/uploads/videos/../secrets")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
