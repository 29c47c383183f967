//! Cache-or-network orchestration for the recipe list.

use anyhow::Result;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{HttpTransport, RecipeError, Transport};
use crate::cache::image::IMAGE_DIR;
use crate::cache::{ImageCache, SnapshotStore};
use crate::config::Config;
use crate::decode::decode;
use crate::models::Recipe;

/// Fetches recipes, preferring the local snapshot when asked to.
///
/// Holds no state between calls other than what the store has on disk, so
/// several managers over different stores can coexist.
pub struct RecipeManager<T: Transport = HttpTransport> {
    transport: T,
    store: SnapshotStore,
    images: ImageCache,
}

impl RecipeManager<HttpTransport> {
    /// Build a manager with an HTTP transport and the configured cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::with_timeout(config.request_timeout())?;
        let cache_dir = config.cache_dir()?;
        Ok(Self::new(transport, SnapshotStore::in_dir(&cache_dir))
            .with_image_cache(ImageCache::in_dir(&cache_dir)))
    }
}

impl<T: Transport> RecipeManager<T> {
    /// The image cache defaults to an `images` directory next to the snapshot.
    pub fn new(transport: T, store: SnapshotStore) -> Self {
        let images = store
            .path()
            .parent()
            .map(ImageCache::in_dir)
            .unwrap_or_else(|| ImageCache::new(IMAGE_DIR.into()));
        Self {
            transport,
            store,
            images,
        }
    }

    pub fn with_image_cache(mut self, images: ImageCache) -> Self {
        self.images = images;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Return the recipe list from `endpoint`.
    ///
    /// With `use_cache`, a readable non-empty snapshot is returned without
    /// touching the network, and a successful fetch replaces the snapshot.
    /// Without it, the network is always used and nothing is persisted.
    pub async fn get_recipes(
        &self,
        endpoint: &str,
        use_cache: bool,
    ) -> std::result::Result<Vec<Recipe>, RecipeError> {
        if use_cache {
            if let Some(recipes) = self.load_cached_recipes() {
                debug!(count = recipes.len(), "Serving recipes from cache");
                return Ok(recipes);
            }
            debug!("No usable cache, loading from network");
        }

        self.fetch_from_network(endpoint, use_cache).await
    }

    /// Fetch a fresh list, ignoring the snapshot, and replace the snapshot
    /// only if the fetch and decode succeed.
    ///
    /// On failure the previous snapshot is left as it was, so the list is
    /// still available offline.
    pub async fn refresh_recipes(
        &self,
        endpoint: &str,
    ) -> std::result::Result<Vec<Recipe>, RecipeError> {
        self.fetch_from_network(endpoint, true).await
    }

    async fn fetch_from_network(
        &self,
        endpoint: &str,
        persist: bool,
    ) -> std::result::Result<Vec<Recipe>, RecipeError> {
        let url = Url::parse(endpoint).map_err(|e| {
            RecipeError::InvalidUrl(format!("{}: {}", endpoint, e))
        })?;

        let response = self.transport.fetch(&url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Recipe request failed");
            RecipeError::Unknown(e.to_string())
        })?;

        if response.status != 200 {
            warn!(url = %url, status = response.status, "Recipe request returned error status");
            return Err(RecipeError::from_status(response.status));
        }

        let recipes = decode(&response.body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to decode recipe response");
            RecipeError::InvalidData(e.to_string())
        })?;

        if persist {
            // Persist the wire bytes, not the repaired form; repair runs on every load
            if let Err(e) = self.store.save(&response.body) {
                warn!(error = %e, "Failed to save recipe snapshot");
            }
        }

        info!(count = recipes.len(), "Fetched recipes");
        Ok(recipes)
    }

    /// Decode the snapshot without any network access.
    ///
    /// Missing, empty, unreadable, corrupt, or zero-recipe snapshots all
    /// come back as `None`.
    pub fn load_cached_recipes(&self) -> Option<Vec<Recipe>> {
        let bytes = match self.store.load() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "Failed to read recipe snapshot");
                return None;
            }
        };

        match decode(&bytes) {
            Ok(recipes) if !recipes.is_empty() => Some(recipes),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "Failed to decode recipe snapshot");
                None
            }
        }
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn cache_age(&self) -> String {
        self.store.age_display()
    }

    /// Download the small photo of every recipe that has one.
    pub async fn prefetch_images(&self, recipes: &[Recipe]) -> usize {
        let urls: Vec<Url> = recipes
            .iter()
            .filter_map(|r| r.photo_url_small.clone())
            .collect();
        self.images.prefetch(&urls, &self.transport).await
    }
}
