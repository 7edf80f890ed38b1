//! # Content Module
//!
//! Named image assets. Files are queued up front, decoded concurrently, and become
//! visible only once every queued load has finished.

use crate::rendering::{Bitmap, ImageHandle};
use crate::{PixelFwError, PixelFwResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// A file waiting to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedImage {
    name: String,
    path: PathBuf,
}

/// Outcome of a [`ContentHandler::load_all`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Files decoded and registered
    pub loaded: usize,
    /// Files that could not be read or decoded
    pub failed: usize,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.loaded + self.failed
    }
}

/// Asset table plus the queue of files still to be loaded.
///
/// # Examples
///
/// ```
/// use pixelfw::{Bitmap, ContentHandler, Rgba};
///
/// let mut content = ContentHandler::new();
/// content.insert("dot", Bitmap::filled(1, 1, Rgba::WHITE));
/// assert!(content.contains("dot"));
/// assert!(content.image("missing").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ContentHandler {
    queue: Vec<QueuedImage>,
    assets: HashMap<String, ImageHandle>,
    base_dir: Option<PathBuf>,
}

impl ContentHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths passed to [`ContentHandler::add_image`] against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Queues an image file to be loaded under `name`.
    pub fn add_image(&mut self, name: impl Into<String>, path: impl AsRef<Path>) {
        let path = self.resolve(path.as_ref());
        self.queue.push(QueuedImage {
            name: name.into(),
            path,
        });
    }

    /// Registers an already decoded image, replacing any asset with the same name.
    pub fn insert(&mut self, name: impl Into<String>, bitmap: Bitmap) -> ImageHandle {
        let handle = Arc::new(bitmap);
        self.assets.insert(name.into(), Arc::clone(&handle));
        handle
    }

    /// Number of queued files not yet loaded.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Loads every queued file concurrently and returns once all of them have finished.
    ///
    /// A failed file is logged and counted; its name simply stays absent from the table.
    pub async fn load_all(&mut self) -> LoadReport {
        let queue = std::mem::take(&mut self.queue);
        let mut tasks = JoinSet::new();
        for file in queue {
            tasks.spawn_blocking(move || {
                let result = Bitmap::open(&file.path);
                (file, result)
            });
        }

        let mut report = LoadReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((file, Ok(bitmap))) => {
                    log::debug!(
                        "Loaded '{}' ({}x{}) from {}",
                        file.name,
                        bitmap.width(),
                        bitmap.height(),
                        file.path.display()
                    );
                    self.assets.insert(file.name, Arc::new(bitmap));
                    report.loaded += 1;
                }
                Ok((file, Err(e))) => {
                    log::warn!(
                        "Failed to load '{}' from {}: {}",
                        file.name,
                        file.path.display(),
                        e
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    log::warn!("Asset load task did not complete: {}", e);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "Content loaded: {} ok, {} failed",
            report.loaded,
            report.failed
        );
        report
    }

    /// Runs [`ContentHandler::load_all`] on a private current-thread runtime.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn load_all_blocking(&mut self) -> PixelFwResult<LoadReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(runtime.block_on(self.load_all()))
    }

    pub fn get(&self, name: &str) -> Option<ImageHandle> {
        self.assets.get(name).cloned()
    }

    /// Looks up an asset, failing with [`PixelFwError::AssetMissing`] when it never loaded.
    pub fn image(&self, name: &str) -> PixelFwResult<ImageHandle> {
        self.get(name)
            .ok_or_else(|| PixelFwError::AssetMissing(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Number of loaded assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
