use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::join_all;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use url::Url;

use super::store::{atomic_write, read_non_empty};
use crate::api::{RecipeError, Transport};

/// Subdirectory of the cache directory that holds image blobs.
pub const IMAGE_DIR: &str = "images";

/// Longest file name used verbatim; filesystems cap names at 255 bytes.
const MAX_FILE_NAME_LEN: usize = 200;

/// Encoded URL prefix kept in front of the hash for over-long names.
const HASHED_NAME_PREFIX_LEN: usize = 100;

/// Disk cache for recipe photos, keyed by image URL.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store images under `cache_dir/images`.
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(IMAGE_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the image for `url`: the percent-encoded URL, or for
    /// long URLs a prefix of it followed by the URL's SHA-256.
    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(file_name_for(url))
    }

    pub fn load(&self, url: &Url) -> Result<Option<Vec<u8>>> {
        read_non_empty(&self.path_for(url))
    }

    pub fn save(&self, url: &Url, bytes: &[u8]) -> Result<()> {
        atomic_write(&self.path_for(url), bytes)
    }

    pub fn contains(&self, url: &Url) -> bool {
        matches!(self.load(url), Ok(Some(_)))
    }

    /// Remove every cached image.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", self.dir.display()))
            }
        }
    }

    /// Return the cached image for `url`, downloading and caching it on a miss.
    pub async fn fetch<T: Transport + ?Sized>(
        &self,
        url: &Url,
        transport: &T,
    ) -> std::result::Result<Vec<u8>, RecipeError> {
        match self.load(url) {
            Ok(Some(bytes)) => {
                debug!(url = %url, "Image cache hit");
                return Ok(bytes);
            }
            Ok(None) => {}
            Err(e) => debug!(url = %url, error = %e, "Unreadable cached image, refetching"),
        }

        let response = transport
            .fetch(url)
            .await
            .map_err(|e| RecipeError::Unknown(e.to_string()))?;

        if response.status != 200 {
            return Err(RecipeError::from_status(response.status));
        }
        if response.body.is_empty() {
            return Err(RecipeError::InvalidData(format!("empty image body from {}", url)));
        }

        if let Err(e) = self.save(url, &response.body) {
            warn!(url = %url, error = %e, "Failed to cache image");
        }
        Ok(response.body)
    }

    /// Download every image not already cached. Returns how many of `urls`
    /// are cached afterwards; failures are logged and skipped.
    pub async fn prefetch<T: Transport + ?Sized>(&self, urls: &[Url], transport: &T) -> usize {
        let futures = urls.iter().map(|url| async move {
            match self.fetch(url, transport).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to prefetch image");
                    false
                }
            }
        });

        join_all(futures).await.into_iter().filter(|ok| *ok).count()
    }
}

fn file_name_for(url: &Url) -> String {
    let encoded = urlencoding::encode(url.as_str());
    if encoded.len() <= MAX_FILE_NAME_LEN {
        return encoded.into_owned();
    }
    // Percent-encoding leaves only ASCII, so byte slicing is safe
    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
    format!("{}-{}", &encoded[..HASHED_NAME_PREFIX_LEN], digest)
}
