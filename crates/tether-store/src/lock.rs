//! Process-wide locks guarding the replace step of a write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::LockScope;

type Registry = Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::default)
}

/// Acquire the replace lock for `dir` under the given scope.
///
/// `Global` maps every directory to the same key, so all stores in the
/// process share one lock.
pub(crate) async fn acquire(scope: LockScope, dir: &Path) -> OwnedMutexGuard<()> {
    let key = match scope {
        LockScope::Global => PathBuf::new(),
        LockScope::PerDirectory => dir.to_path_buf(),
    };
    let lock = registry()
        .lock()
        .expect("lock registry poisoned")
        .entry(key)
        .or_default()
        .clone();
    lock.lock_owned().await
}
