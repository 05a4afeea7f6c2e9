use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tether_store::{resolve_hooks_path, StoreConfig};

/// Name of the configuration file in the project root.
pub const CONFIG_FILE: &str = "tether.toml";

/// Project configuration, read from `tether.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Hooks directory, relative to the project root unless absolute.
    pub hooks_path: PathBuf,
    pub store: StoreConfig,
    pub scan: ScanConfig,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            hooks_path: PathBuf::from("hooks"),
            store: StoreConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory of asset scene descriptions. Without it the host is
    /// treated as runtime-only and asset scans are skipped with a warning.
    pub assets_dir: Option<PathBuf>,
}

impl TetherConfig {
    /// Load `tether.toml` from the project root, or defaults if absent.
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Absolute hooks directory for this project.
    pub fn hooks_dir(&self, project_root: &Path) -> PathBuf {
        resolve_hooks_path(project_root, &self.hooks_path)
    }

    /// Assets directory resolved against the project root.
    pub fn assets_dir(&self, project_root: &Path) -> Option<PathBuf> {
        self.scan
            .assets_dir
            .as_deref()
            .map(|dir| resolve_hooks_path(project_root, dir))
    }
}

#[cfg(test)]
mod tests {
    use tether_store::{LockScope, ReplaceStrategy};

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TetherConfig::load(dir.path()).unwrap();
        assert_eq!(config, TetherConfig::default());
        assert_eq!(config.hooks_dir(dir.path()), dir.path().join("hooks"));
        assert!(config.assets_dir(dir.path()).is_none());
    }

    #[test]
    fn parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
hooks_path = "state/hooks"

[store]
replace = "delete_then_rename"
lock_scope = "per_directory"
pretty = true

[scan]
assets_dir = "assets"
"#,
        )
        .unwrap();

        let config = TetherConfig::load(dir.path()).unwrap();
        assert_eq!(config.hooks_dir(dir.path()), dir.path().join("state/hooks"));
        assert_eq!(config.store.replace, ReplaceStrategy::DeleteThenRename);
        assert_eq!(config.store.lock_scope, LockScope::PerDirectory);
        assert!(config.store.pretty);
        assert_eq!(config.assets_dir(dir.path()), Some(dir.path().join("assets")));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "hooks_path = [").unwrap();
        assert!(TetherConfig::load(dir.path()).is_err());
    }
}
