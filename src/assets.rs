use image::RgbaImage;
/// Named asset access and bitmap decoding
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{BoxSceneError, BoxSceneResult};

/// Decoded RGBA8 image
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn decode(bytes: &[u8]) -> BoxSceneResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| BoxSceneError::AssetLoading(format!("Failed to decode image: {}", e)))?;
        Ok(Self::from_rgba(img.to_rgba8()))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

/// Reads assets by name from a packaged asset directory
pub struct AssetManager {
    root: PathBuf,
    bitmaps: HashMap<String, Arc<Bitmap>>,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bitmaps: HashMap::new(),
        }
    }

    /// Raw bytes of the asset at `name`, relative to the asset root
    pub async fn open(&self, name: &str) -> BoxSceneResult<Vec<u8>> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|e| {
            BoxSceneError::AssetLoading(format!("Failed to open asset {}: {}", path.display(), e))
        })
    }

    /// Decoded bitmap for `name`, or `None` if it cannot be read or decoded.
    /// Callers are expected to continue without a texture.
    pub async fn load_bitmap(&mut self, name: &str) -> Option<Arc<Bitmap>> {
        if let Some(bitmap) = self.bitmaps.get(name) {
            return Some(Arc::clone(bitmap));
        }

        let bitmap = match self.open(name).await.and_then(|bytes| Bitmap::decode(&bytes)) {
            Ok(bitmap) => Arc::new(bitmap),
            Err(e) => {
                log::warn!("Could not load bitmap '{}': {}", name, e);
                return None;
            }
        };

        let (width, height) = bitmap.dimensions();
        log::info!("Loaded bitmap: {} ({}x{})", name, width, height);

        self.bitmaps.insert(name.to_string(), Arc::clone(&bitmap));
        Some(bitmap)
    }

    /// Drop cached bitmaps nobody else holds
    pub fn cleanup_unused_assets(&mut self) {
        self.bitmaps.retain(|name, bitmap| {
            let keep = Arc::strong_count(bitmap) > 1;
            if !keep {
                log::debug!("Cleaned up unused bitmap: {}", name);
            }
            keep
        });
    }

    pub fn cache_stats(&self) -> usize {
        self.bitmaps.len()
    }
}
