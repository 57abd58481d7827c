//! Filesystem-backed storage for revision images.
//!
//! Images live under a configured root with a fixed layout: the original
//! upload in `source/` and a square derivative in `128x128/`. Filenames are
//! computed by the caller from the meta slug, working language and revision
//! id, so they are deterministic per revision.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;

pub const SOURCE_DIR: &str = "source";
pub const THUMBNAIL_DIR: &str = "128x128";
const THUMBNAIL_EDGE: u32 = 128;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("invalid image filename")]
    InvalidFilename,
    #[error("payload is not a supported image")]
    UnsupportedImage,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("thumbnail generation failed")]
    Thumbnail {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// A decoded image upload: the original filename's extension plus the raw
/// bytes.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub extension: String,
    pub data: Bytes,
}

/// Metadata describing a stored image.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub checksum: String,
    pub size_bytes: i64,
}

/// Produces the square derivative for a stored source image.
///
/// Scaling internals are deliberately behind this seam; the store only
/// guarantees the folder layout and the source asset.
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn generate(&self, source: &Path, destination: &Path) -> Result<(), ImageStoreError>;
}

/// Lanczos downscaling to a square crop, run off the async runtime.
#[derive(Debug, Default)]
pub struct LanczosThumbnailer;

#[async_trait]
impl ThumbnailGenerator for LanczosThumbnailer {
    async fn generate(&self, source: &Path, destination: &Path) -> Result<(), ImageStoreError> {
        let source = source.to_path_buf();
        let destination = destination.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let img = image::open(&source).map_err(boxed_thumbnail_error)?;
            let thumb = img.resize_to_fill(
                THUMBNAIL_EDGE,
                THUMBNAIL_EDGE,
                image::imageops::FilterType::Lanczos3,
            );
            thumb.save(&destination).map_err(boxed_thumbnail_error)
        })
        .await
        .map_err(|err| ImageStoreError::Thumbnail {
            source: Box::new(err),
        })?
    }
}

fn boxed_thumbnail_error(err: image::ImageError) -> ImageStoreError {
    ImageStoreError::Thumbnail {
        source: Box::new(err),
    }
}

pub struct ImageStore {
    root: PathBuf,
    thumbnailer: Arc<dyn ThumbnailGenerator>,
}

impl ImageStore {
    /// Create a store rooted at `root`. No directories are touched until
    /// [`ImageStore::ensure_layout`] runs.
    pub fn new(root: PathBuf, thumbnailer: Arc<dyn ThumbnailGenerator>) -> Self {
        Self { root, thumbnailer }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the `source` and `128x128` folders. Safe to call from
    /// concurrent requests; existing folders are left untouched.
    pub async fn ensure_layout(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(self.root.join(SOURCE_DIR)).await?;
        fs::create_dir_all(self.root.join(THUMBNAIL_DIR)).await?;
        Ok(())
    }

    /// Store the payload under `source/{filename}` and generate its square
    /// derivative under `128x128/{filename}`.
    pub async fn attach(
        &self,
        filename: &str,
        payload: &ImagePayload,
    ) -> Result<StoredImage, ImageStoreError> {
        validate_filename(filename)?;
        imagesize::blob_size(&payload.data).map_err(|_| ImageStoreError::UnsupportedImage)?;

        self.ensure_layout().await?;

        let source_path = self.root.join(SOURCE_DIR).join(filename);
        fs::write(&source_path, &payload.data).await?;

        let thumb_path = self.root.join(THUMBNAIL_DIR).join(filename);
        self.thumbnailer.generate(&source_path, &thumb_path).await?;

        let digest = Sha256::digest(&payload.data);
        Ok(StoredImage {
            checksum: hex::encode(digest),
            size_bytes: payload.data.len() as i64,
        })
    }
}

fn validate_filename(filename: &str) -> Result<(), ImageStoreError> {
    let well_formed = !filename.is_empty()
        && !filename.starts_with('.')
        && filename
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(ImageStoreError::InvalidFilename)
    }
}
