pub mod app;
pub mod assets;
pub mod config;
pub mod graphics;
pub mod renderer;
pub mod tasks;

pub use app::{BoxNode, BoxSceneApp};

#[derive(thiserror::Error, Debug)]
pub enum BoxSceneError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Error creating renderable: {0}")]
    CompileFailure(String),
    #[error("Graphics error: {0}")]
    Graphics(String),
    #[error("Asset loading error: {0}")]
    AssetLoading(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BoxSceneResult<T> = Result<T, BoxSceneError>;
