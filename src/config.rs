/// Scene configuration loaded from a RON file
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{BoxSceneError, BoxSceneResult, graphics::Color};

/// Physical canvas the box represents. Only the ratios matter: the box is
/// always one unit tall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 5.0,
            height: 8.0,
            thickness: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub asset_root: PathBuf,
    /// Image painted on the face toward the viewer
    pub front_texture: String,
    /// Packed `0xAARRGGBB` for the bottom, left, right and top faces
    pub side_color: u32,
    /// Packed `0xAARRGGBB` for the face away from the viewer
    pub back_color: u32,
    pub canvas: CanvasConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            front_texture: "giraffe.jpg".to_string(),
            side_color: 0xFFFFFFFF,
            back_color: 0xFF000000,
            canvas: CanvasConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> BoxSceneResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        log::info!("Loaded scene config: {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> BoxSceneResult<Self> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BoxSceneResult<()> {
        let CanvasConfig {
            width,
            height,
            thickness,
        } = self.canvas;
        if !(width > 0.0 && height > 0.0 && thickness > 0.0) {
            return Err(BoxSceneError::Config(format!(
                "canvas dimensions must be positive, got {} x {} x {}",
                width, height, thickness
            )));
        }
        Ok(())
    }

    pub fn side_color(&self) -> Color {
        Color::from_argb(self.side_color)
    }

    pub fn back_color(&self) -> Color {
        Color::from_argb(self.back_color)
    }

    pub fn layout(&self) -> BoxLayout {
        BoxLayout::from_canvas(&self.canvas)
    }
}

/// Box size and placement derived from a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub extent: Vec3,
    /// Mesh center in node space. The box's min corner sits at the node origin.
    pub center: Vec3,
    /// Node offset that moves the box center back to the scene origin
    pub node_position: Vec3,
}

impl BoxLayout {
    pub fn from_canvas(canvas: &CanvasConfig) -> Self {
        let extent = Vec3::new(
            canvas.width / canvas.height,
            1.0,
            canvas.thickness / canvas.height,
        );
        let half_extent = extent * 0.5;
        Self {
            extent,
            center: half_extent,
            node_position: -half_extent,
        }
    }
}
