//! Asset access: built-in meshes by name and textures by name.
//!
//! Both caches load lazily and keep what they load for the lifetime of the owner.
//! Renderers consume meshes by name and textures by handle, never by raw file paths.
//!
//! # Layout
//! Textures live under `<asset_dir>/patches/<name>.png`.

mod mesh;
mod texture;

pub use mesh::{COLOR_COMPONENTS, Mesh, MeshCache, POSITION_COMPONENTS};
pub use texture::{PathTextureLoader, ResourceManager, TextureLoader};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("texture not found: {}", .0.display())]
    TextureNotFound(PathBuf),
}

pub fn crate_info() -> &'static str {
    "notdoom-assets v0.1.0"
}
