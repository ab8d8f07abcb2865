//! # File I/O Module
//!
//! Loads reference datasets from disk.
//!
//! - **Shared locking**: the file is read under a shared OS lock (via fs2),
//!   so a tool rewriting the dataset with an exclusive lock is never read
//!   half-written. The lock is released as soon as the read completes.
//! - **Validation**: every loaded dataset goes through the same shape checks
//!   as the shipped one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use span_core::file_io::{load_dataset, DatasetSource};
//! use std::path::Path;
//!
//! let dataset = load_dataset(Path::new("span-tables.json")).unwrap();
//! println!("{} v{}", dataset.meta.title, dataset.meta.version);
//!
//! // Or let configuration decide
//! let dataset = DatasetSource::Embedded.load().unwrap();
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use fs2::FileExt;
use tracing::info;

use crate::dataset::ReferenceDataset;
use crate::embedded::default_dataset;
use crate::errors::{SpanError, SpanResult};

/// Shared lock on an open dataset file, released when dropped.
struct SharedLock {
    file: File,
}

impl SharedLock {
    /// Open `path` and take a non-blocking shared lock.
    fn acquire(path: &Path) -> SpanResult<Self> {
        let file = File::open(path)
            .map_err(|e| SpanError::file_error("open", path.display().to_string(), e.to_string()))?;
        lock_shared(&file, path)?;
        Ok(SharedLock { file })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn lock_shared(file: &File, path: &Path) -> SpanResult<()> {
    FileExt::try_lock_shared(file)
        .map_err(|_| SpanError::file_locked(path.display().to_string()))
}

#[cfg(target_arch = "wasm32")]
fn lock_shared(_file: &File, _path: &Path) -> SpanResult<()> {
    Ok(())
}

impl Drop for SharedLock {
    fn drop(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        let _ = FileExt::unlock(&self.file);
    }
}

/// Load and validate a dataset file.
///
/// # Errors
///
/// * `SpanError::FileError` - the file can't be opened or read
/// * `SpanError::FileLocked` - another process holds an exclusive lock
/// * `SpanError::SerializationError` - the file isn't a dataset document
/// * `SpanError::MalformedDataset` - a capacity table doesn't match its shape
pub fn load_dataset(path: &Path) -> SpanResult<ReferenceDataset> {
    let mut contents = String::new();
    {
        let mut lock = SharedLock::acquire(path)?;
        lock.file
            .read_to_string(&mut contents)
            .map_err(|e| SpanError::file_error("read", path.display().to_string(), e.to_string()))?;
    }

    let dataset = ReferenceDataset::from_json_str(&contents)?;
    info!(
        path = %path.display(),
        version = %dataset.meta.version,
        elements = dataset.structural_elements.len(),
        "loaded reference dataset"
    );
    Ok(dataset)
}

/// Where the reference dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatasetSource {
    /// The document compiled into the crate
    #[default]
    Embedded,
    File(PathBuf),
}

impl DatasetSource {
    pub fn load(&self) -> SpanResult<ReferenceDataset> {
        match self {
            DatasetSource::Embedded => default_dataset().cloned(),
            DatasetSource::File(path) => load_dataset(path),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Embedded => f.write_str("embedded dataset"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
