//! Image Preload Module
//!
//! Presence cache of images already loaded into memory. Entries never expire;
//! they live until `clear` or process end.

mod loader;

pub use loader::HttpImageLoader;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::ImageError;

// == Loaded Image ==
/// Image bytes held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub src: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// == Image Loader ==
/// Fetches an image by source string.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, src: &str) -> Result<LoadedImage, ImageError>;
}

// == Image Cache ==
/// Preloads images once and hands out shared handles.
pub struct ImageCache<L> {
    loader: L,
    images: RwLock<HashMap<String, Arc<LoadedImage>>>,
}

impl<L: ImageLoader> ImageCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            images: RwLock::new(HashMap::new()),
        }
    }

    // == Preload ==
    /// Loads `src` unless it is already cached.
    pub async fn preload(&self, src: &str) -> Result<(), ImageError> {
        if self.images.read().await.contains_key(src) {
            return Ok(());
        }

        let image = self.loader.load(src).await?;
        debug!(src = %src, bytes = image.bytes.len(), "Image preloaded");
        self.images
            .write()
            .await
            .insert(src.to_string(), Arc::new(image));
        Ok(())
    }

    // == Preload Multiple ==
    /// Loads all sources concurrently. Fails as a whole on the first error;
    /// images that finished loading before it stay cached.
    pub async fn preload_multiple<I, T>(&self, sources: I) -> Result<(), ImageError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let sources: Vec<T> = sources.into_iter().collect();
        try_join_all(sources.iter().map(|src| self.preload(src.as_ref()))).await?;
        Ok(())
    }

    pub async fn has(&self, src: &str) -> bool {
        self.images.read().await.contains_key(src)
    }

    pub async fn get(&self, src: &str) -> Option<Arc<LoadedImage>> {
        self.images.read().await.get(src).cloned()
    }

    pub async fn clear(&self) {
        self.images.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }
}
