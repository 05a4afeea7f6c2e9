use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::category::{validate_segment, Category};
use crate::config::{ReplaceStrategy, StoreConfig, SyncMode};
use crate::error::{StoreError, StoreResult};
use crate::lock;

/// Suffix shared by every in-flight temp file.
const TEMP_SUFFIX: &str = ".tmp";

/// Longest prefix of the record name kept in a temp file name, so any name
/// that fits on disk also fits with the uuid and suffix appended.
const TEMP_STEM_MAX: usize = 64;

/// Durable, category-keyed record store rooted at a hooks directory.
///
/// Each `(category, filename)` pair maps to `<root>/<category>/<filename>`.
/// Writes go to a uniquely named temp file in the same directory and are
/// renamed into place, so readers observe either the previous record or the
/// new one, never a partial file.
#[derive(Clone, Debug)]
pub struct HookStore {
    root: PathBuf,
    config: StoreConfig,
}

impl HookStore {
    /// A store handle at `root` that touches nothing on disk. Category
    /// directories are created on first write; reads of a missing tree see
    /// absent records.
    pub fn new(root: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Open a store at `root`, creating the root and every fixed category
    /// directory.
    pub async fn open(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        let root = root.into();
        for category in Category::FIXED {
            fs::create_dir_all(root.join(category.as_str())).await?;
        }
        debug!(root = %root.display(), "opened hook store");
        Ok(Self { root, config })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Directory backing a category.
    pub fn category_dir(&self, category: &Category) -> StoreResult<PathBuf> {
        category.validate()?;
        Ok(self.root.join(category.as_str()))
    }

    /// Final on-disk path of a record.
    pub fn path_for(&self, category: &Category, filename: &str) -> StoreResult<PathBuf> {
        validate_segment(filename)?;
        Ok(self.category_dir(category)?.join(filename))
    }

    // ---- Writes ----

    /// Serialize `value` as JSON and persist it atomically.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        category: &Category,
        filename: &str,
        value: &T,
    ) -> StoreResult<()> {
        let encoded = if self.config.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        let encoded = encoded.map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.write_bytes(category, filename, &encoded).await
    }

    /// Persist raw bytes atomically.
    ///
    /// On failure the temp file is removed and the record is left exactly as
    /// it was before the call.
    pub async fn write_bytes(
        &self,
        category: &Category,
        filename: &str,
        data: &[u8],
    ) -> StoreResult<()> {
        let final_path = self.path_for(category, filename)?;
        let dir = self.category_dir(category)?;
        fs::create_dir_all(&dir).await?;

        let temp_path = dir.join(temp_name(filename));
        let result = self.commit(&dir, &temp_path, &final_path, data).await;

        if result.is_err() {
            match fs::remove_file(&temp_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    temp = %temp_path.display(),
                    error = %e,
                    "failed to remove temp file after aborted write"
                ),
            }
        }
        result
    }

    async fn commit(
        &self,
        dir: &Path,
        temp_path: &Path,
        final_path: &Path,
        data: &[u8],
    ) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        if self.config.sync_mode == SyncMode::EveryWrite {
            file.sync_all().await?;
        }
        drop(file);

        let _guard = lock::acquire(self.config.lock_scope, dir).await;
        if self.config.replace == ReplaceStrategy::DeleteThenRename
            && fs::try_exists(final_path).await?
        {
            fs::remove_file(final_path).await?;
        }
        fs::rename(temp_path, final_path).await?;
        if self.config.sync_mode == SyncMode::EveryWrite {
            sync_dir(dir).await?;
        }

        debug!(path = %final_path.display(), len = data.len(), "record committed");
        Ok(())
    }

    // ---- Reads ----

    /// Read and decode a record. Returns `Ok(None)` if it does not exist.
    pub async fn read<T: DeserializeOwned>(
        &self,
        category: &Category,
        filename: &str,
    ) -> StoreResult<Option<T>> {
        let Some(bytes) = self.read_bytes(category, filename).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path: self.root.join(category.as_str()).join(filename),
                reason: e.to_string(),
            })
    }

    /// Read the raw bytes of a record. Returns `Ok(None)` if it does not exist.
    pub async fn read_bytes(
        &self,
        category: &Category,
        filename: &str,
    ) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(category, filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a record exists without decoding it.
    pub async fn exists(&self, category: &Category, filename: &str) -> StoreResult<bool> {
        let path = self.path_for(category, filename)?;
        Ok(fs::try_exists(&path).await?)
    }

    // ---- Maintenance ----

    /// Delete a record. Returns `true` if it existed.
    pub async fn delete(&self, category: &Category, filename: &str) -> StoreResult<bool> {
        let path = self.path_for(category, filename)?;
        let _guard = lock::acquire(self.config.lock_scope, &self.category_dir(category)?).await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Sorted record names in a category. Temp files are excluded; a
    /// category with no directory yet is empty.
    pub async fn list(&self, category: &Category) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .scan_dir(category)
            .await?
            .into_iter()
            .filter(|name| !is_temp_name(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Temp files left behind by interrupted writes in a category.
    ///
    /// Under [`ReplaceStrategy::DeleteThenRename`] an orphan may hold the
    /// only copy of a record whose write was cut off between the two steps.
    pub async fn orphans(&self, category: &Category) -> StoreResult<Vec<PathBuf>> {
        let dir = self.category_dir(category)?;
        let mut orphans: Vec<PathBuf> = self
            .scan_dir(category)
            .await?
            .into_iter()
            .filter(|name| is_temp_name(name))
            .map(|name| dir.join(name))
            .collect();
        orphans.sort();
        Ok(orphans)
    }

    /// Remove orphaned temp files from every category directory. Returns the
    /// number removed.
    ///
    /// Only safe while no write is in flight: an active writer's temp file is
    /// indistinguishable from an orphan.
    pub async fn sweep_orphans(&self) -> StoreResult<usize> {
        let mut removed = 0;
        for category in self.categories().await? {
            for path in self.orphans(&category).await? {
                match fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        debug!(removed, "swept orphaned temp files");
        Ok(removed)
    }

    /// Every category with a directory under the root, fixed ones first.
    pub async fn categories(&self) -> StoreResult<Vec<Category>> {
        let mut custom = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Category::FIXED.to_vec()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            match name.parse::<Category>() {
                Ok(category) if !category.is_fixed() => custom.push(category),
                _ => {}
            }
        }
        custom.sort();
        let mut categories = Category::FIXED.to_vec();
        categories.extend(custom);
        Ok(categories)
    }

    async fn scan_dir(&self, category: &Category) -> StoreResult<Vec<String>> {
        let dir = self.category_dir(category)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
        Ok(names)
    }
}

/// `.{stem}.{uuid}.tmp`, where `stem` is the record name cut to at most
/// [`TEMP_STEM_MAX`] bytes on a char boundary.
fn temp_name(filename: &str) -> String {
    let mut end = filename.len().min(TEMP_STEM_MAX);
    while !filename.is_char_boundary(end) {
        end -= 1;
    }
    format!(".{}.{}{TEMP_SUFFIX}", &filename[..end], Uuid::now_v7().simple())
}

/// Persist the directory entry created by a rename.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> StoreResult<()> {
    fs::File::open(dir).await?.sync_all().await?;
    Ok(())
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> StoreResult<()> {
    Ok(())
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}
