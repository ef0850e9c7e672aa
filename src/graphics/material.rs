/// Materials assigned to submeshes, and the factory that prepares them
use glam::Vec4;
use std::sync::Arc;

use crate::{BoxSceneError, BoxSceneResult, assets::Bitmap};

/// Linear RGBA color
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color(pub Vec4);

impl Color {
    pub const WHITE: Color = Color(Vec4::ONE);
    pub const BLACK: Color = Color(Vec4::new(0.0, 0.0, 0.0, 1.0));

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(Vec4::new(r, g, b, a))
    }

    /// Decode a packed `0xAARRGGBB` color
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }
}

/// A bitmap accepted as a texture source
#[derive(Debug, Clone)]
pub struct Texture {
    bitmap: Arc<Bitmap>,
}

impl Texture {
    pub fn from_bitmap(bitmap: Arc<Bitmap>, max_dimension: u32) -> BoxSceneResult<Self> {
        let (width, height) = bitmap.dimensions();
        if width == 0 || height == 0 {
            return Err(BoxSceneError::AssetLoading(format!(
                "texture source is empty: {}x{}",
                width, height
            )));
        }
        if width > max_dimension || height > max_dimension {
            return Err(BoxSceneError::AssetLoading(format!(
                "texture source {}x{} exceeds max dimension {}",
                width, height, max_dimension
            )));
        }
        Ok(Self { bitmap })
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

#[derive(Debug, Clone)]
pub enum MaterialSource {
    Color(Color),
    Texture(Texture),
}

#[derive(Debug, Clone)]
pub struct Material {
    pub source: MaterialSource,
    pub transparent: bool,
}

/// Materials are shared between faces
pub type MaterialRef = Arc<Material>;

impl Material {
    pub fn with_color(color: Color) -> Self {
        Self {
            source: MaterialSource::Color(color),
            transparent: true,
        }
    }

    pub fn with_texture(texture: Texture) -> Self {
        Self {
            source: MaterialSource::Texture(texture),
            transparent: true,
        }
    }

    pub fn texture(&self) -> Option<&Texture> {
        match &self.source {
            MaterialSource::Texture(texture) => Some(texture),
            MaterialSource::Color(_) => None,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self.source {
            MaterialSource::Color(color) => Some(color),
            MaterialSource::Texture(_) => None,
        }
    }
}

/// Prepares materials against the limits of the target device
#[derive(Debug, Clone, Copy)]
pub struct MaterialFactory {
    max_texture_dimension: u32,
}

impl Default for MaterialFactory {
    fn default() -> Self {
        Self::new(wgpu::Limits::default().max_texture_dimension_2d)
    }
}

impl MaterialFactory {
    pub fn new(max_texture_dimension: u32) -> Self {
        Self {
            max_texture_dimension,
        }
    }

    pub fn for_device(device: &wgpu::Device) -> Self {
        Self::new(device.limits().max_texture_dimension_2d)
    }

    pub async fn make_transparent_with_color(&self, color: Color) -> BoxSceneResult<MaterialRef> {
        Ok(Arc::new(Material::with_color(color)))
    }

    pub async fn make_texture(&self, bitmap: Arc<Bitmap>) -> BoxSceneResult<Texture> {
        Texture::from_bitmap(bitmap, self.max_texture_dimension)
    }

    pub async fn make_transparent_with_texture(
        &self,
        texture: Texture,
    ) -> BoxSceneResult<MaterialRef> {
        Ok(Arc::new(Material::with_texture(texture)))
    }

    /// Textured material when a bitmap is present, otherwise an untextured
    /// material of `fallback` color
    pub async fn make_transparent_with_optional_texture(
        &self,
        bitmap: Option<Arc<Bitmap>>,
        fallback: Color,
    ) -> BoxSceneResult<MaterialRef> {
        match bitmap {
            Some(bitmap) => {
                let texture = self.make_texture(bitmap).await?;
                self.make_transparent_with_texture(texture).await
            }
            None => {
                log::warn!("No texture source available, using untextured material");
                self.make_transparent_with_color(fallback).await
            }
        }
    }
}

/// Materials for each side of a box, named from the viewer's side
#[derive(Debug, Clone)]
pub struct BoxMaterials {
    pub bottom: MaterialRef,
    pub left: MaterialRef,
    pub front: MaterialRef,
    pub back: MaterialRef,
    pub right: MaterialRef,
    pub top: MaterialRef,
}

impl BoxMaterials {
    /// Order expected by `box_definition`. Slot 2 is the +Z face, which is the
    /// one a default -Z-looking camera sees, so `front` goes there.
    pub fn into_face_order(self) -> [MaterialRef; 6] {
        [
            self.bottom,
            self.left,
            self.front,
            self.back,
            self.right,
            self.top,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn bitmap(width: u32, height: u32) -> Arc<Bitmap> {
        Arc::new(Bitmap::from_rgba(image::RgbaImage::new(width, height)))
    }

    #[test]
    fn test_color_from_argb() {
        assert_eq!(Color::from_argb(0xFFFFFFFF), Color::WHITE);
        assert_eq!(Color::from_argb(0xFF000000), Color::BLACK);

        let red = Color::from_argb(0x80FF0000);
        assert_eq!(red.0.x, 1.0);
        assert_eq!(red.0.y, 0.0);
        assert!((red.0.w - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_texture_rejects_empty_and_oversized() {
        assert!(Texture::from_bitmap(bitmap(4, 4), 8).is_ok());
        assert!(matches!(
            Texture::from_bitmap(bitmap(0, 4), 8),
            Err(BoxSceneError::AssetLoading(_))
        ));
        assert!(matches!(
            Texture::from_bitmap(bitmap(16, 4), 8),
            Err(BoxSceneError::AssetLoading(_))
        ));
    }

    #[test]
    fn test_missing_bitmap_falls_back_to_color() {
        let factory = MaterialFactory::default();
        let material =
            block_on(factory.make_transparent_with_optional_texture(None, Color::WHITE)).unwrap();
        assert_eq!(material.color(), Some(Color::WHITE));
        assert!(material.texture().is_none());
        assert!(material.transparent);
    }

    #[test]
    fn test_present_bitmap_is_textured() {
        let factory = MaterialFactory::new(64);
        let material = block_on(
            factory.make_transparent_with_optional_texture(Some(bitmap(2, 3)), Color::WHITE),
        )
        .unwrap();
        let texture = material.texture().unwrap();
        assert_eq!(texture.bitmap().dimensions(), (2, 3));
    }

    #[test]
    fn test_box_materials_face_order() {
        let make = |v: f32| Arc::new(Material::with_color(Color::new(v, 0.0, 0.0, 1.0)));
        let materials = BoxMaterials {
            bottom: make(0.0),
            left: make(1.0),
            front: make(2.0),
            back: make(3.0),
            right: make(4.0),
            top: make(5.0),
        };

        let ordered = materials.into_face_order();
        for (i, material) in ordered.iter().enumerate() {
            assert_eq!(material.color().unwrap().0.x, i as f32);
        }
    }
}
