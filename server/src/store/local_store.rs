//! Local filesystem content store implementation.
//!
//! Each key is kept as a single regular file `<key>.bin` directly under
//! the store root. Writes go through a uniquely named temp file in the
//! same directory and become visible in one `rename`, so a crash mid-put
//! can leave behind a temp file but never a half-written item. Temp files
//! from interrupted writes are swept when the store is opened.

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info, warn};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;
use crate::store::{ContentStore, ItemContent};

/// Extension of committed item files.
const ITEM_SUFFIX: &str = ".bin";
/// Infix marking in-progress writes; anything containing it is uncommitted.
const TMP_INFIX: &str = ".tmp.";

/// Content store backed by a directory of one file per key.
pub struct LocalFileStore {
    root: PathBuf,
    // Distinguishes temp files of concurrent writers sharing one process.
    tmp_counter: AtomicU64,
}

impl LocalFileStore {
    /// Opens the store rooted at `root`, creating the directory if needed.
    ///
    /// Leftover temp files are removed here. They belong to writes that
    /// never committed, so removing them cannot lose visible data.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let swept = sweep_stale_tmp(&root)?;
        if swept > 0 {
            warn!(
                "removed {} stale temp file(s) under {}",
                swept,
                root.display()
            );
        }

        info!("local content store ready at {}", root.display());
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Path of the committed file for `key`.
    fn item_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{ITEM_SUFFIX}"))
    }

    /// Fresh temp path for a write targeting `key`, in the same directory
    /// as the final file so the commit rename never crosses filesystems.
    fn next_tmp_path(&self, key: &str) -> PathBuf {
        let id = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!("{key}{TMP_INFIX}{id}"))
    }

    /// Syncs the root directory so a committed rename or unlink survives
    /// power loss. Failure downgrades durability, not correctness, so it
    /// is logged rather than propagated.
    async fn sync_root(&self) {
        match File::open(&self.root).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    warn!("directory sync failed for {}: {}", self.root.display(), err);
                }
            }
            Err(err) => {
                warn!("directory open failed for {}: {}", self.root.display(), err);
            }
        }
    }
}

fn sweep_stale_tmp(root: &Path) -> io::Result<usize> {
    let mut swept = 0;
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.contains(TMP_INFIX) {
            std::fs::remove_file(entry.path())?;
            swept += 1;
        }
    }
    Ok(swept)
}

#[async_trait]
impl ContentStore for LocalFileStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(fs::try_exists(self.item_path(key)).await?)
    }

    async fn put(&self, key: &str, content: Bytes) -> Result<(), StoreError> {
        let tmp = self.next_tmp_path(key);

        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp)
            .await?;

        if let Err(err) = write_and_sync(&mut file, &content).await {
            drop(file);
            let _ = fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        drop(file);

        // Commit: on POSIX this atomically replaces any existing item file.
        if let Err(err) = fs::rename(&tmp, self.item_path(key)).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        self.sync_root().await;

        debug!("stored {} bytes under key {}", content.len(), key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<ItemContent, StoreError> {
        let file = match File::open(self.item_path(key)).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StoreError::Missing),
            Err(err) => return Err(err.into()),
        };

        // The open handle pins this version of the content; a concurrent
        // put or remove renames or unlinks the directory entry without
        // disturbing bytes already open for reading.
        let len = file.metadata().await?.len();
        debug!("opened key {} for reading ({} bytes)", key, len);
        Ok(ItemContent::from_file(file, len))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.item_path(key)).await {
            Ok(()) => {
                self.sync_root().await;
                debug!("removed key {}", key);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::Missing),
            Err(err) => Err(err.into()),
        }
    }
}

async fn write_and_sync(file: &mut File, content: &[u8]) -> io::Result<()> {
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}
