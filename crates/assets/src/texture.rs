use notdoom_ecs::TextureHandle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::AssetError;

/// Turns an image file into a backend texture.
///
/// Decoding and upload belong to the graphics backend; the manager only
/// deals in paths and handles.
pub trait TextureLoader {
    fn load(&mut self, path: &Path) -> Result<TextureHandle, AssetError>;
}

/// Headless loader: checks that the file exists and hands out sequential handles.
#[derive(Debug, Default)]
pub struct PathTextureLoader {
    next: u64,
    loaded: Vec<PathBuf>,
}

impl PathTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths loaded so far, in handle order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl TextureLoader for PathTextureLoader {
    fn load(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(AssetError::TextureNotFound(path.to_path_buf())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::TextureNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        }
        let handle = TextureHandle(self.next);
        self.next += 1;
        self.loaded.push(path.to_path_buf());
        Ok(handle)
    }
}

/// Caches textures by name for the lifetime of the manager.
///
/// A texture called `name` lives at `<asset_dir>/patches/<name>.png`.
#[derive(Debug)]
pub struct ResourceManager<L> {
    asset_dir: PathBuf,
    loader: L,
    textures: HashMap<String, TextureHandle>,
}

impl<L: TextureLoader> ResourceManager<L> {
    pub fn new(asset_dir: impl Into<PathBuf>, loader: L) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            loader,
            textures: HashMap::new(),
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn texture_path(&self, name: &str) -> PathBuf {
        self.asset_dir.join("patches").join(format!("{name}.png"))
    }

    /// Handle for `name`, loading it on the first request.
    ///
    /// Failed loads are not cached, so a later call retries.
    pub fn get_texture(&mut self, name: &str) -> Result<TextureHandle, AssetError> {
        if let Some(handle) = self.textures.get(name) {
            return Ok(*handle);
        }
        let path = self.texture_path(name);
        let handle = self.loader.load(&path).inspect_err(|err| {
            tracing::error!(texture = name, %err, "could not load texture");
        })?;
        tracing::debug!(texture = name, path = %path.display(), ?handle, "texture loaded");
        self.textures.insert(name.to_owned(), handle);
        Ok(handle)
    }

    pub fn cached(&self) -> usize {
        self.textures.len()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn asset_dir_with(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("patches")).unwrap();
        for name in names {
            fs::write(dir.path().join("patches").join(format!("{name}.png")), b"png").unwrap();
        }
        dir
    }

    #[test]
    fn texture_path_layout() {
        let manager = ResourceManager::new("/data/assets", PathTextureLoader::new());
        assert_eq!(
            manager.texture_path("brick"),
            PathBuf::from("/data/assets/patches/brick.png")
        );
    }

    #[test]
    fn loads_once_and_caches() {
        let dir = asset_dir_with(&["brick", "wood"]);
        let mut manager = ResourceManager::new(dir.path(), PathTextureLoader::new());
        let brick = manager.get_texture("brick").unwrap();
        let wood = manager.get_texture("wood").unwrap();
        assert_ne!(brick, wood);
        assert_eq!(manager.get_texture("brick").unwrap(), brick);
        assert_eq!(manager.cached(), 2);
        assert_eq!(manager.loader().loaded().len(), 2);
    }

    #[test]
    fn missing_texture_is_an_error() {
        let dir = asset_dir_with(&[]);
        let mut manager = ResourceManager::new(dir.path(), PathTextureLoader::new());
        let err = manager.get_texture("aqpanl03").unwrap_err();
        assert!(matches!(err, AssetError::TextureNotFound(_)));
        assert_eq!(manager.cached(), 0);
    }
}
