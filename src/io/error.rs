use std::path::PathBuf;
use thiserror::Error;

/// Failures at the I/O boundary: reading configuration and models, writing images.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to load OBJ '{path}': {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to write image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("'{0}' contains no triangles")]
    EmptyMesh(PathBuf),

    #[error("invalid shadow plane: {0}")]
    InvalidPlane(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
