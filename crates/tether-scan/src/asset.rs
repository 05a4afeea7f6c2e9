use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ScanError, ScanResult};
use crate::graph::SceneGraph;
use crate::view::SceneView;

/// Opens assets that live outside the active scene.
pub trait AssetLoader {
    type Asset: SceneView;

    /// Load an asset by identifier. Returns `Ok(None)` if no such asset exists.
    fn load(&self, identifier: &str) -> ScanResult<Option<Self::Asset>>;
}

/// Loads `<dir>/<identifier>.json` scene descriptions as assets.
#[derive(Clone, Debug)]
pub struct DirectoryAssetLoader {
    dir: PathBuf,
}

impl DirectoryAssetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetLoader for DirectoryAssetLoader {
    type Asset = SceneGraph;

    fn load(&self, identifier: &str) -> ScanResult<Option<SceneGraph>> {
        if identifier.is_empty() || identifier.contains(['/', '\\']) || identifier.starts_with('.') {
            return Err(ScanError::AssetNotFound(identifier.into()));
        }
        let path = self.dir.join(format!("{identifier}.json"));
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!(asset = identifier, path = %path.display(), "loaded asset");
        SceneGraph::from_json(&json).map(Some)
    }
}

/// Loader for hosts with no asset access at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    type Asset = SceneGraph;

    fn load(&self, _identifier: &str) -> ScanResult<Option<SceneGraph>> {
        Ok(None)
    }
}
