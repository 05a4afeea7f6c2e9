use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Flush/sync strategy for record writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` the temp file before it is renamed into place.
    #[default]
    EveryWrite,
    /// Rely on OS page-cache buffering.
    OsDefault,
}

/// How the temp file replaces an existing record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceStrategy {
    /// Rename over the existing file in one step.
    #[default]
    AtomicReplace,
    /// Remove the existing file, then rename. For filesystems that refuse
    /// rename-over-existing. A crash between the two steps leaves the record
    /// absent with the new content stranded in an orphaned temp file.
    DeleteThenRename,
}

/// Granularity of the lock held around the replace step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockScope {
    /// One lock for every store in the process.
    #[default]
    Global,
    /// One lock per category directory.
    PerDirectory,
}

/// Configuration for a [`HookStore`](crate::HookStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub sync_mode: SyncMode,
    pub replace: ReplaceStrategy,
    pub lock_scope: LockScope,
    /// Write records as indented JSON.
    pub pretty: bool,
}

/// Resolve a configured hooks path against the host's project root.
///
/// Absolute hooks paths are returned unchanged.
pub fn resolve_hooks_path(project_root: &Path, hooks_path: &Path) -> PathBuf {
    if hooks_path.is_absolute() {
        hooks_path.to_path_buf()
    } else {
        project_root.join(hooks_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.sync_mode, SyncMode::EveryWrite);
        assert_eq!(c.replace, ReplaceStrategy::AtomicReplace);
        assert_eq!(c.lock_scope, LockScope::Global);
        assert!(!c.pretty);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: StoreConfig =
            serde_json::from_str(r#"{"replace":"delete_then_rename"}"#).unwrap();
        assert_eq!(c.replace, ReplaceStrategy::DeleteThenRename);
        assert_eq!(c.lock_scope, LockScope::Global);
    }

    #[test]
    fn relative_hooks_path_joins_project_root() {
        let resolved = resolve_hooks_path(Path::new("/projects/game"), Path::new("hooks"));
        assert_eq!(resolved, PathBuf::from("/projects/game/hooks"));
    }

    #[test]
    fn absolute_hooks_path_is_kept() {
        let resolved = resolve_hooks_path(Path::new("/projects/game"), Path::new("/var/hooks"));
        assert_eq!(resolved, PathBuf::from("/var/hooks"));
    }
}
