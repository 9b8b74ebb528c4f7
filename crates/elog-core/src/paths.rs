//! Documents directory resolution
//!
//! The log file lives in the application's documents directory. Where that
//! is depends on the platform (or on the host, when embedded), so it is
//! resolved through the [`DocumentsResolver`] trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{LogError, LogResult};

/// Resolves the directory the log file is placed in
///
/// Implementations:
/// - `PlatformDocuments`: the user's documents directory (the default)
/// - `FixedDirectory`: a directory chosen by the host
#[async_trait]
pub trait DocumentsResolver: Send + Sync {
    /// Get the documents directory
    async fn documents_path(&self) -> LogResult<PathBuf>;
}

/// The platform documents directory
///
/// Uses `~/Documents` (or the XDG / Known Folder equivalent). Falls back to
/// the home directory when the platform has no documents directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDocuments;

impl PlatformDocuments {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentsResolver for PlatformDocuments {
    async fn documents_path(&self) -> LogResult<PathBuf> {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| LogError::documents_unavailable("no documents or home directory for this user"))
    }
}

/// A fixed directory supplied by the host
#[derive(Debug, Clone)]
pub struct FixedDirectory {
    path: PathBuf,
}

impl FixedDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentsResolver for FixedDirectory {
    async fn documents_path(&self) -> LogResult<PathBuf> {
        if self.path.as_os_str().is_empty() {
            return Err(LogError::documents_unavailable("empty directory path"));
        }
        Ok(self.path.clone())
    }
}

/// Join the log file name onto the resolved documents directory
pub async fn resolve_log_file_path(
    resolver: &dyn DocumentsResolver,
    log_file_name: &str,
) -> LogResult<PathBuf> {
    let dir = resolver.documents_path().await?;
    Ok(dir.join(log_file_name))
}
